pub mod chat;
pub mod episode;
pub mod media;
pub mod search;
pub mod stats;
pub mod status;
pub mod user;
pub mod watchlist;

pub use chat::{Author, ChatMessage, Recommendation, RecommendationResponse};
pub use episode::{EpisodeStatistics, EpisodeStatusUpdate, EpisodeSummary, SeasonProgress, ShowEpisodes, ShowProgress, TvEpisode};
pub use media::{MediaFilter, MediaKind};
pub use search::SearchResult;
pub use stats::{KindStats, StatsSnapshot, StatsSource, StatusBucket, TypeBucket, WatchlistStats};
pub use status::{EpisodeStatus, WatchStatus};
pub use user::{AuthTokens, PasswordChange, ProfileUpdate, Registration, User};
pub use watchlist::{NewWatchlistItem, Pagination, StatusUpdate, WatchlistItem, WatchlistPage};
