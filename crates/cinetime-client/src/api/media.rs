use crate::error::ApiError;
use crate::http::{ApiClient, Envelope};
use cinetime_models::{MediaKind, SearchResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Catalog entry as the backend relays it. Movies and shows use different
/// field names, which [`normalize`] folds into one [`SearchResult`].
#[derive(Debug, Clone, Deserialize)]
pub struct RawCatalogEntry {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u64>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Fold a raw entry into a [`SearchResult`].
///
/// Kind resolution order: `forced`, then `type`, then `media_type`, then
/// "has a title means movie, otherwise tv".
pub fn normalize(entry: RawCatalogEntry, forced: Option<MediaKind>) -> SearchResult {
    let has_title = non_empty(entry.title.clone()).is_some();
    let kind = forced
        .or_else(|| entry.kind.as_deref().and_then(|k| k.parse().ok()))
        .or_else(|| entry.media_type.as_deref().and_then(|k| k.parse().ok()))
        .unwrap_or(if has_title { MediaKind::Movie } else { MediaKind::Tv });

    SearchResult {
        id: entry.id,
        title: non_empty(entry.title)
            .or_else(|| non_empty(entry.name))
            .unwrap_or_else(|| "Unknown".to_string()),
        overview: entry.overview.unwrap_or_default(),
        poster_path: non_empty(entry.poster_path),
        backdrop_path: non_empty(entry.backdrop_path),
        release_date: non_empty(entry.release_date)
            .or_else(|| non_empty(entry.first_air_date))
            .unwrap_or_default(),
        vote_average: entry.vote_average.unwrap_or(0.0),
        vote_count: entry.vote_count.unwrap_or(0),
        kind,
        genre_ids: entry.genre_ids,
    }
}

pub fn normalize_all(entries: Vec<RawCatalogEntry>, forced: Option<MediaKind>) -> Vec<SearchResult> {
    entries.into_iter().map(|e| normalize(e, forced)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeWindow {
    Day,
    #[default]
    Week,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    #[default]
    All,
    Week,
    Month,
    Year,
}

impl ReportPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportPeriod::All => "all",
            ReportPeriod::Week => "week",
            ReportPeriod::Month => "month",
            ReportPeriod::Year => "year",
        }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(ReportPeriod::All),
            "week" => Ok(ReportPeriod::Week),
            "month" => Ok(ReportPeriod::Month),
            "year" => Ok(ReportPeriod::Year),
            _ => Err(format!("Invalid report period: {}. Use 'all', 'week', 'month' or 'year'", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// Details of one catalog title
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaDetails {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub number_of_seasons: Option<u32>,
    #[serde(default)]
    pub number_of_episodes: Option<u32>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genres: Vec<Genre>,
}

impl MediaDetails {
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("Unknown")
    }

    pub fn display_date(&self) -> Option<&str> {
        self.release_date.as_deref().or(self.first_air_date.as_deref())
    }
}

pub async fn search(client: &ApiClient, query: &str, page: u32) -> Result<Vec<SearchResult>, ApiError> {
    let params = [("query", query.to_string()), ("page", page.to_string())];
    let response: Envelope<Vec<RawCatalogEntry>> = client.get_json("/media/search", &params).await?;
    let results = normalize_all(response.data.unwrap_or_default(), None);
    debug!(operation = "catalog_search", query, count = results.len(), "Search completed");
    Ok(results)
}

pub async fn details(client: &ApiClient, kind: MediaKind, tmdb_id: u64) -> Result<MediaDetails, ApiError> {
    if tmdb_id == 0 {
        return Err(ApiError::InvalidRequest("TMDB ID and type are required".to_string()));
    }
    debug!(operation = "catalog_details", kind = %kind, tmdb_id, "Fetching details");
    let path = format!("/media/details/{}/{}", kind.as_str(), tmdb_id);
    let response: Envelope<MediaDetails> = client.get_json(&path, &[]).await?;
    response.into_data("media details")
}

pub async fn trending(client: &ApiClient, page: u32, window: TimeWindow) -> Result<Vec<SearchResult>, ApiError> {
    let params = [("page", page.to_string()), ("timeWindow", window.as_str().to_string())];
    let response: Envelope<Vec<RawCatalogEntry>> = client.get_json("/media/trending", &params).await?;
    Ok(normalize_all(response.data.unwrap_or_default(), None))
}

/// Popular movies; the endpoint only returns movies so the kind is forced
pub async fn popular(client: &ApiClient, page: u32) -> Result<Vec<SearchResult>, ApiError> {
    let params = [("page", page.to_string())];
    let response: Envelope<Vec<RawCatalogEntry>> = client.get_json("/media/popular", &params).await?;
    Ok(normalize_all(response.data.unwrap_or_default(), Some(MediaKind::Movie)))
}

pub async fn report(client: &ApiClient, period: ReportPeriod) -> Result<Vec<u8>, ApiError> {
    client
        .get_bytes("/media/report", &[("period", period.as_str().to_string())])
        .await
}
