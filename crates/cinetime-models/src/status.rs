use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle stage of a tracked title
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WatchStatus {
    /// Want to watch
    Planned,
    /// Currently watching
    Watching,
    /// Finished watching (counts towards watch time)
    Completed,
}

impl WatchStatus {
    pub const ALL: [WatchStatus; 3] = [WatchStatus::Planned, WatchStatus::Watching, WatchStatus::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            WatchStatus::Planned => "planned",
            WatchStatus::Watching => "watching",
            WatchStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "planned" => Ok(WatchStatus::Planned),
            "watching" => Ok(WatchStatus::Watching),
            "completed" => Ok(WatchStatus::Completed),
            _ => Err(format!("Invalid watch status: {}. Use 'planned', 'watching' or 'completed'", s)),
        }
    }
}

/// Per-episode status, independent of the parent show's status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum EpisodeStatus {
    #[default]
    Unwatched,
    Watched,
    Skipped,
}

impl EpisodeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EpisodeStatus::Unwatched => "unwatched",
            EpisodeStatus::Watched => "watched",
            EpisodeStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for EpisodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EpisodeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unwatched" => Ok(EpisodeStatus::Unwatched),
            "watched" => Ok(EpisodeStatus::Watched),
            "skipped" => Ok(EpisodeStatus::Skipped),
            _ => Err(format!("Invalid episode status: {}. Use 'unwatched', 'watched' or 'skipped'", s)),
        }
    }
}
