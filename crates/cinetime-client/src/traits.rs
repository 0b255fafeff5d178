use crate::api::media::{MediaDetails, ReportPeriod, TimeWindow};
use crate::error::ApiError;
use async_trait::async_trait;
use cinetime_models::{
    AuthTokens, EpisodeStatistics, EpisodeStatus, EpisodeStatusUpdate, MediaFilter, MediaKind, NewWatchlistItem, PasswordChange,
    ProfileUpdate, RecommendationResponse, Registration, SearchResult, ShowEpisodes, StatusUpdate, User, WatchStatus,
    WatchlistItem, WatchlistPage, WatchlistStats,
};
use futures::future::join_all;

/// Account, session and password-reset endpoints
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Attach (or detach) the bearer token used by every later call
    fn set_access_token(&self, token: Option<String>);

    async fn register(&self, registration: &Registration) -> Result<String, ApiError>;
    async fn verify_otp(&self, email: &str, otp: &str) -> Result<String, ApiError>;
    async fn login(&self, email: &str, password: &str) -> Result<AuthTokens, ApiError>;
    async fn current_user(&self) -> Result<User, ApiError>;
    async fn update_profile(&self, profile: &ProfileUpdate) -> Result<String, ApiError>;
    async fn change_password(&self, change: &PasswordChange) -> Result<String, ApiError>;
    async fn delete_account(&self, password: &str) -> Result<String, ApiError>;

    async fn request_password_reset(&self, email: &str) -> Result<String, ApiError>;
    async fn verify_reset_token(&self, token: &str) -> Result<String, ApiError>;
    async fn reset_password(&self, token: &str, password: &str) -> Result<String, ApiError>;
}

#[async_trait]
pub trait WatchlistApi: Send + Sync {
    async fn add(&self, item: &NewWatchlistItem) -> Result<Option<WatchlistItem>, ApiError>;
    async fn list(&self, page: u32, status: Option<WatchStatus>) -> Result<WatchlistPage, ApiError>;
    async fn update_status(&self, item_id: &str, update: &StatusUpdate) -> Result<(), ApiError>;
    async fn remove(&self, item_id: &str) -> Result<(), ApiError>;
    async fn stats(&self) -> Result<WatchlistStats, ApiError>;
}

#[async_trait]
pub trait EpisodeApi: Send + Sync {
    async fn show_episodes(&self, tmdb_id: u64, season: Option<u32>) -> Result<ShowEpisodes, ApiError>;
    async fn fetch_season(&self, tmdb_id: u64, season: u32) -> Result<(), ApiError>;
    async fn update_episode_status(&self, episode_id: &str, update: &EpisodeStatusUpdate) -> Result<(), ApiError>;
    async fn episode_statistics(&self) -> Result<EpisodeStatistics, ApiError>;

    /// Mark several episodes watched concurrently; one result per id, in order
    async fn mark_watched(&self, episode_ids: &[String]) -> Vec<Result<(), ApiError>> {
        let update = EpisodeStatusUpdate {
            watch_status: Some(EpisodeStatus::Watched),
            rating: None,
        };
        join_all(episode_ids.iter().map(|id| self.update_episode_status(id, &update))).await
    }
}

#[async_trait]
pub trait AssistantApi: Send + Sync {
    async fn chat(&self, message: &str) -> Result<RecommendationResponse, ApiError>;
    async fn keyword_search(&self, keywords: &[String], scope: MediaFilter) -> Result<Vec<SearchResult>, ApiError>;
}

#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn search(&self, query: &str, page: u32) -> Result<Vec<SearchResult>, ApiError>;
    async fn trending(&self, page: u32, window: TimeWindow) -> Result<Vec<SearchResult>, ApiError>;
    async fn popular(&self, page: u32) -> Result<Vec<SearchResult>, ApiError>;
    async fn details(&self, kind: MediaKind, tmdb_id: u64) -> Result<MediaDetails, ApiError>;
    async fn report(&self, period: ReportPeriod) -> Result<Vec<u8>, ApiError>;
}
