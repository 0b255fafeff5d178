use crate::api::{self, media::{MediaDetails, ReportPeriod, TimeWindow}};
use crate::error::ApiError;
use crate::http::ApiClient;
use crate::traits::{AssistantApi, AuthApi, CatalogApi, EpisodeApi, WatchlistApi};
use async_trait::async_trait;
use cinetime_config::ApiConfig;
use cinetime_models::{
    AuthTokens, EpisodeStatistics, EpisodeStatusUpdate, MediaFilter, MediaKind, NewWatchlistItem, PasswordChange,
    ProfileUpdate, RecommendationResponse, Registration, SearchResult, ShowEpisodes, StatusUpdate, User, WatchStatus,
    WatchlistItem, WatchlistPage, WatchlistStats,
};
use std::sync::Arc;

/// The backend client. Cheap to clone; all clones share one connection pool
/// and one bearer token.
#[derive(Clone)]
pub struct CinetimeClient {
    http: Arc<ApiClient>,
}

impl CinetimeClient {
    pub fn new(http: ApiClient) -> Self {
        Self { http: Arc::new(http) }
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Ok(Self::new(ApiClient::from_config(config)?))
    }

    pub fn http(&self) -> &ApiClient {
        &self.http
    }
}

#[async_trait]
impl AuthApi for CinetimeClient {
    fn set_access_token(&self, token: Option<String>) {
        self.http.set_token(token);
    }

    async fn register(&self, registration: &Registration) -> Result<String, ApiError> {
        api::auth::register(&self.http, registration).await
    }

    async fn verify_otp(&self, email: &str, otp: &str) -> Result<String, ApiError> {
        api::auth::verify_otp(&self.http, email, otp).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthTokens, ApiError> {
        api::auth::login(&self.http, email, password).await
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        api::auth::me(&self.http).await
    }

    async fn update_profile(&self, profile: &ProfileUpdate) -> Result<String, ApiError> {
        api::auth::update_profile(&self.http, profile).await
    }

    async fn change_password(&self, change: &PasswordChange) -> Result<String, ApiError> {
        api::auth::change_password(&self.http, change).await
    }

    async fn delete_account(&self, password: &str) -> Result<String, ApiError> {
        api::auth::delete_account(&self.http, password).await
    }

    async fn request_password_reset(&self, email: &str) -> Result<String, ApiError> {
        api::password::request_reset(&self.http, email).await
    }

    async fn verify_reset_token(&self, token: &str) -> Result<String, ApiError> {
        api::password::verify_token(&self.http, token).await
    }

    async fn reset_password(&self, token: &str, password: &str) -> Result<String, ApiError> {
        api::password::reset(&self.http, token, password).await
    }
}

#[async_trait]
impl WatchlistApi for CinetimeClient {
    async fn add(&self, item: &NewWatchlistItem) -> Result<Option<WatchlistItem>, ApiError> {
        api::watchlist::add(&self.http, item).await
    }

    async fn list(&self, page: u32, status: Option<WatchStatus>) -> Result<WatchlistPage, ApiError> {
        api::watchlist::list(&self.http, page, status).await
    }

    async fn update_status(&self, item_id: &str, update: &StatusUpdate) -> Result<(), ApiError> {
        api::watchlist::update_status(&self.http, item_id, update).await
    }

    async fn remove(&self, item_id: &str) -> Result<(), ApiError> {
        api::watchlist::remove(&self.http, item_id).await
    }

    async fn stats(&self) -> Result<WatchlistStats, ApiError> {
        api::watchlist::stats(&self.http).await
    }
}

#[async_trait]
impl EpisodeApi for CinetimeClient {
    async fn show_episodes(&self, tmdb_id: u64, season: Option<u32>) -> Result<ShowEpisodes, ApiError> {
        api::episodes::show_episodes(&self.http, tmdb_id, season).await
    }

    async fn fetch_season(&self, tmdb_id: u64, season: u32) -> Result<(), ApiError> {
        api::episodes::fetch_season(&self.http, tmdb_id, season).await
    }

    async fn update_episode_status(&self, episode_id: &str, update: &EpisodeStatusUpdate) -> Result<(), ApiError> {
        api::episodes::update_status(&self.http, episode_id, update).await
    }

    async fn episode_statistics(&self) -> Result<EpisodeStatistics, ApiError> {
        api::episodes::statistics(&self.http).await
    }
}

#[async_trait]
impl AssistantApi for CinetimeClient {
    async fn chat(&self, message: &str) -> Result<RecommendationResponse, ApiError> {
        api::ai::chat(&self.http, message).await
    }

    async fn keyword_search(&self, keywords: &[String], scope: MediaFilter) -> Result<Vec<SearchResult>, ApiError> {
        api::ai::search(&self.http, keywords, scope).await
    }
}

#[async_trait]
impl CatalogApi for CinetimeClient {
    async fn search(&self, query: &str, page: u32) -> Result<Vec<SearchResult>, ApiError> {
        api::media::search(&self.http, query, page).await
    }

    async fn trending(&self, page: u32, window: TimeWindow) -> Result<Vec<SearchResult>, ApiError> {
        api::media::trending(&self.http, page, window).await
    }

    async fn popular(&self, page: u32) -> Result<Vec<SearchResult>, ApiError> {
        api::media::popular(&self.http, page).await
    }

    async fn details(&self, kind: MediaKind, tmdb_id: u64) -> Result<MediaDetails, ApiError> {
        api::media::details(&self.http, kind, tmdb_id).await
    }

    async fn report(&self, period: ReportPeriod) -> Result<Vec<u8>, ApiError> {
        api::media::report(&self.http, period).await
    }
}
