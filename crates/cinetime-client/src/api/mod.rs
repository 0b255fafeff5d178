//! One function per backend endpoint, grouped by resource. Each takes the
//! shared [`ApiClient`](crate::http::ApiClient) and returns typed models.

pub mod ai;
pub mod auth;
pub mod episodes;
pub mod media;
pub mod password;
pub mod watchlist;

/// Percent-encode a value used as a single path segment
pub(crate) fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
