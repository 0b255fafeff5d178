use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use crate::status::EpisodeStatus;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TvEpisode {
    #[serde(rename = "_id")]
    pub id: String,
    pub season_number: u32,
    pub episode_number: u32,
    #[serde(default)]
    pub episode_title: String,
    #[serde(default)]
    pub air_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default)]
    pub runtime: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub still_path: Option<String>,
    #[serde(default)]
    pub watch_status: EpisodeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watched_at: Option<DateTime<Utc>>,
}

/// Payload of `GET /media/tv/:id/episodes`. The store keys seasons by their
/// number rendered as a string.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShowEpisodes {
    #[serde(default)]
    pub episodes_by_season: Option<HashMap<String, Vec<TvEpisode>>>,
}

impl ShowEpisodes {
    /// Episodes stored for `season`, `None` when the store returned no
    /// season structure at all.
    pub fn season(&self, season: u32) -> Option<&[TvEpisode]> {
        self.episodes_by_season
            .as_ref()
            .map(|seasons| seasons.get(&season.to_string()).map(Vec::as_slice).unwrap_or(&[]))
    }
}

/// Body of `PUT /media/episodes/:id/status`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeStatusUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watch_status: Option<EpisodeStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct SeasonProgress {
    pub watched: u32,
    pub total: u32,
    pub percentage: f64,
}

impl SeasonProgress {
    pub fn from_episodes(episodes: &[TvEpisode]) -> Self {
        let total = episodes.len() as u32;
        let watched = episodes
            .iter()
            .filter(|ep| ep.watch_status == EpisodeStatus::Watched)
            .count() as u32;
        let percentage = if total > 0 {
            watched as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        Self { watched, total, percentage }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeSummary {
    #[serde(rename = "totalTVShows")]
    pub total_tv_shows: u32,
    pub total_episodes: u32,
    pub watched_episodes: u32,
    pub skipped_episodes: u32,
    pub total_watched: u32,
    pub total_watch_time: u32,
    pub completion_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShowProgress {
    pub tmdb_id: u64,
    pub title: String,
    pub total_episodes: u32,
    pub watched_episodes: u32,
    pub skipped_episodes: u32,
    pub total_watched: u32,
    pub watch_time: u32,
    pub completion_percentage: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeStatistics {
    #[serde(default)]
    pub summary: EpisodeSummary,
    #[serde(default, rename = "byTVShow")]
    pub by_tv_show: Vec<ShowProgress>,
    #[serde(default)]
    pub recent_watched: Vec<TvEpisode>,
}
