use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate over a watchlist. Either returned by the backend or recomputed
/// locally from the in-memory list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistStats {
    pub total_items: u32,
    /// Minutes of completed items
    pub total_watch_time: u32,
    #[serde(default)]
    pub total_watch_time_formatted: String,
    #[serde(default)]
    pub movie_stats: KindStats,
    #[serde(default)]
    pub tv_stats: KindStats,
    #[serde(default)]
    pub by_status: Vec<StatusBucket>,
    #[serde(default)]
    pub by_type: Vec<TypeBucket>,
    #[serde(default)]
    pub planned_count: u32,
    #[serde(default)]
    pub watching_count: u32,
    #[serde(default)]
    pub completed_count: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KindStats {
    pub total: u32,
    pub completed: u32,
    pub watch_time: u32,
    #[serde(default)]
    pub watch_time_formatted: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusBucket {
    pub status: String,
    pub count: u32,
    pub time: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypeBucket {
    #[serde(rename = "type")]
    pub kind: String,
    pub count: u32,
}

/// Where a stats figure came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatsSource {
    /// Fetched from `GET /media/watchlist/stats`
    Authoritative,
    /// Recomputed from the locally held list
    Derived,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatsSnapshot {
    pub source: StatsSource,
    pub stats: WatchlistStats,
    pub computed_at: DateTime<Utc>,
}

impl StatsSnapshot {
    pub fn new(source: StatsSource, stats: WatchlistStats) -> Self {
        Self { source, stats, computed_at: Utc::now() }
    }

    pub fn is_authoritative(&self) -> bool {
        self.source == StatsSource::Authoritative
    }

    /// Status counts add up to the total and no kind reports more completed
    /// time than the overall completed time.
    pub fn is_consistent(&self) -> bool {
        let s = &self.stats;
        let status_sum = s.planned_count + s.watching_count + s.completed_count;
        status_sum == s.total_items
            && s.movie_stats.watch_time + s.tv_stats.watch_time <= s.total_watch_time
            && s.movie_stats.completed <= s.movie_stats.total
            && s.tv_stats.completed <= s.tv_stats.total
    }
}
