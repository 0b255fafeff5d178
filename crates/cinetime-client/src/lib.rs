pub mod api;
pub mod client;
pub mod error;
pub mod http;
pub mod traits;

pub use api::media::{normalize, MediaDetails, RawCatalogEntry, ReportPeriod, TimeWindow};
pub use client::CinetimeClient;
pub use error::ApiError;
pub use http::{ApiClient, Envelope};
pub use traits::{AssistantApi, AuthApi, CatalogApi, EpisodeApi, WatchlistApi};
