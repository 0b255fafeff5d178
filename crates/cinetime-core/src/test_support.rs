//! In-memory fakes of the API traits shared by the unit tests

use async_trait::async_trait;
use cinetime_client::{
    ApiError, AssistantApi, AuthApi, CatalogApi, EpisodeApi, MediaDetails, ReportPeriod, TimeWindow, WatchlistApi,
};
use cinetime_models::{
    AuthTokens, EpisodeStatistics, EpisodeStatus, EpisodeStatusUpdate, MediaFilter, MediaKind, NewWatchlistItem,
    PasswordChange, ProfileUpdate, Recommendation, RecommendationResponse, Registration, SearchResult, ShowEpisodes,
    StatusUpdate, TvEpisode, User, WatchStatus, WatchlistItem, WatchlistPage, WatchlistStats,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::stats::derive_stats;

pub fn item(id: &str, kind: MediaKind, status: WatchStatus, minutes: u32) -> WatchlistItem {
    WatchlistItem {
        id: id.to_string(),
        tmdb_id: id.parse().unwrap_or(1),
        title: format!("Title {}", id),
        kind,
        poster_path: None,
        release_date: None,
        watch_status: status,
        rating: None,
        watch_time_minutes: minutes,
        created_at: None,
        updated_at: None,
    }
}

pub fn episode(id: &str, season: u32, number: u32, status: EpisodeStatus) -> TvEpisode {
    TvEpisode {
        id: id.to_string(),
        season_number: season,
        episode_number: number,
        episode_title: format!("Episode {}", number),
        air_date: None,
        overview: None,
        runtime: 45,
        still_path: None,
        watch_status: status,
        rating: None,
        watched_at: None,
    }
}

pub fn season_payload(season: u32, episodes: Vec<TvEpisode>) -> ShowEpisodes {
    let mut seasons = HashMap::new();
    seasons.insert(season.to_string(), episodes);
    ShowEpisodes { episodes_by_season: Some(seasons) }
}

pub fn user(roles: &[&str]) -> User {
    User {
        id: "u1".to_string(),
        firstname: "Ada".to_string(),
        lastname: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        roles: roles.iter().map(|r| r.to_string()).collect(),
        approved: None,
    }
}

pub fn result(id: u64, kind: MediaKind) -> SearchResult {
    SearchResult {
        id,
        title: format!("Result {}", id),
        overview: String::new(),
        poster_path: None,
        backdrop_path: None,
        release_date: "2001-01-01".to_string(),
        vote_average: 7.0,
        vote_count: 10,
        kind,
        genre_ids: vec![],
    }
}

pub fn recommendation(title: &str, kind: MediaKind, keywords: &[&str]) -> Recommendation {
    Recommendation {
        title: title.to_string(),
        kind,
        reason: "fits".to_string(),
        year: None,
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    }
}

pub fn server_error() -> ApiError {
    ApiError::Server { status: 500, message: Some("boom".to_string()) }
}

pub fn not_found() -> ApiError {
    ApiError::NotFound { message: None }
}

/// Lets a test hold a fake call open and observe state while it is in flight
#[derive(Default)]
pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

impl Gate {
    async fn pass(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }
}

#[derive(Default)]
pub struct FakeWatchlist {
    items: Mutex<Vec<WatchlistItem>>,
    calls: Mutex<Vec<String>>,
    fail_update: AtomicBool,
    fail_stats: AtomicBool,
    fail_list: AtomicBool,
    pub update_gate: Option<Arc<Gate>>,
    list_gates: Mutex<VecDeque<Arc<Gate>>>,
}

impl FakeWatchlist {
    pub fn new(items: Vec<WatchlistItem>) -> Self {
        Self { items: Mutex::new(items), ..Default::default() }
    }

    pub fn with_update_gate(items: Vec<WatchlistItem>, gate: Arc<Gate>) -> Self {
        Self { items: Mutex::new(items), update_gate: Some(gate), ..Default::default() }
    }

    /// The next list call answers with the items as they are now, but only
    /// once the gate is released
    pub fn gate_next_list(&self, gate: Arc<Gate>) {
        self.list_gates.lock().unwrap().push_back(gate);
    }

    pub fn fail_update(&self, fail: bool) {
        self.fail_update.store(fail, Ordering::SeqCst);
    }

    pub fn fail_stats(&self, fail: bool) {
        self.fail_stats.store(fail, Ordering::SeqCst);
    }

    pub fn fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == call).count()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }
}

#[async_trait]
impl WatchlistApi for FakeWatchlist {
    async fn add(&self, new_item: &NewWatchlistItem) -> Result<Option<WatchlistItem>, ApiError> {
        self.record("add");
        let mut created = item(&new_item.tmdb_id.to_string(), new_item.kind, WatchStatus::Planned, 0);
        created.title = new_item.title.clone();
        self.items.lock().unwrap().push(created.clone());
        Ok(Some(created))
    }

    async fn list(&self, _page: u32, status: Option<WatchStatus>) -> Result<WatchlistPage, ApiError> {
        self.record("list");
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(server_error());
        }
        let data = self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|i| status.map_or(true, |s| i.watch_status == s))
            .cloned()
            .collect();
        let gate = self.list_gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            gate.pass().await;
        }
        Ok(WatchlistPage { data, pagination: None })
    }

    async fn update_status(&self, item_id: &str, update: &StatusUpdate) -> Result<(), ApiError> {
        self.record("update_status");
        if let Some(gate) = &self.update_gate {
            gate.pass().await;
        }
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(ApiError::BadRequest { status: 422, message: Some("Invalid status".to_string()) });
        }
        let mut items = self.items.lock().unwrap();
        if let Some(stored) = items.iter_mut().find(|i| i.id == item_id) {
            if let Some(status) = update.watch_status {
                stored.watch_status = status;
            }
            if let Some(rating) = update.rating {
                stored.rating = Some(rating);
            }
        }
        Ok(())
    }

    async fn remove(&self, item_id: &str) -> Result<(), ApiError> {
        self.record("remove");
        self.items.lock().unwrap().retain(|i| i.id != item_id);
        Ok(())
    }

    async fn stats(&self) -> Result<WatchlistStats, ApiError> {
        self.record("stats");
        if self.fail_stats.load(Ordering::SeqCst) {
            return Err(server_error());
        }
        Ok(derive_stats(&self.items.lock().unwrap()))
    }
}

/// Store answers are popped in order; once exhausted the store is empty
#[derive(Default)]
pub struct FakeEpisodes {
    store: Mutex<VecDeque<Result<ShowEpisodes, ApiError>>>,
    pub store_calls: AtomicUsize,
    pub fetch_calls: AtomicUsize,
    fail_fetch: AtomicBool,
    fail_updates: AtomicBool,
    pub updates: Mutex<Vec<(String, Option<EpisodeStatus>)>>,
}

impl FakeEpisodes {
    pub fn with_store(answers: Vec<Result<ShowEpisodes, ApiError>>) -> Self {
        Self { store: Mutex::new(answers.into()), ..Default::default() }
    }

    pub fn fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    pub fn store_calls(&self) -> usize {
        self.store_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EpisodeApi for FakeEpisodes {
    async fn show_episodes(&self, _tmdb_id: u64, _season: Option<u32>) -> Result<ShowEpisodes, ApiError> {
        self.store_calls.fetch_add(1, Ordering::SeqCst);
        self.store.lock().unwrap().pop_front().unwrap_or_else(|| Ok(ShowEpisodes::default()))
    }

    async fn fetch_season(&self, _tmdb_id: u64, _season: u32) -> Result<(), ApiError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(server_error());
        }
        Ok(())
    }

    async fn update_episode_status(&self, episode_id: &str, update: &EpisodeStatusUpdate) -> Result<(), ApiError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(server_error());
        }
        self.updates.lock().unwrap().push((episode_id.to_string(), update.watch_status));
        Ok(())
    }

    async fn episode_statistics(&self) -> Result<EpisodeStatistics, ApiError> {
        Err(not_found())
    }
}

#[derive(Default)]
pub struct FakeAuth {
    pub user: Mutex<Option<User>>,
    pub reject_token: AtomicBool,
    pub fail_me: AtomicBool,
    pub token: Mutex<Option<String>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeAuth {
    pub fn with_user(user: User) -> Self {
        Self { user: Mutex::new(Some(user)), ..Default::default() }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn attached_token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }
}

#[async_trait]
impl AuthApi for FakeAuth {
    fn set_access_token(&self, token: Option<String>) {
        *self.token.lock().unwrap() = token;
    }

    async fn register(&self, _registration: &Registration) -> Result<String, ApiError> {
        self.record("register");
        Ok("Registration successful".to_string())
    }

    async fn verify_otp(&self, _email: &str, _otp: &str) -> Result<String, ApiError> {
        self.record("verify_otp");
        Ok("Account verified".to_string())
    }

    async fn login(&self, _email: &str, password: &str) -> Result<AuthTokens, ApiError> {
        self.record("login");
        if password == "wrong" {
            return Err(ApiError::Unauthorized { message: Some("Invalid credentials".to_string()) });
        }
        Ok(AuthTokens { access_token: "access-1".to_string(), refresh_token: Some("refresh-1".to_string()) })
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        self.record("me");
        if self.reject_token.load(Ordering::SeqCst) {
            return Err(ApiError::Unauthorized { message: None });
        }
        if self.fail_me.load(Ordering::SeqCst) {
            return Err(server_error());
        }
        self.user.lock().unwrap().clone().ok_or(ApiError::Unauthorized { message: None })
    }

    async fn update_profile(&self, profile: &ProfileUpdate) -> Result<String, ApiError> {
        self.record("update_profile");
        if let Some(user) = self.user.lock().unwrap().as_mut() {
            user.firstname = profile.firstname.clone();
            user.lastname = profile.lastname.clone();
        }
        Ok("Profile updated".to_string())
    }

    async fn change_password(&self, change: &PasswordChange) -> Result<String, ApiError> {
        self.record("change_password");
        if change.current_password == "wrong" {
            return Err(ApiError::BadRequest { status: 400, message: Some("Current password is incorrect".to_string()) });
        }
        Ok("Password changed".to_string())
    }

    async fn delete_account(&self, _password: &str) -> Result<String, ApiError> {
        self.record("delete_account");
        Ok("Account deleted".to_string())
    }

    async fn request_password_reset(&self, _email: &str) -> Result<String, ApiError> {
        self.record("request_password_reset");
        Err(server_error())
    }

    async fn verify_reset_token(&self, token: &str) -> Result<String, ApiError> {
        self.record("verify_reset_token");
        if token == "expired" {
            return Err(ApiError::BadRequest { status: 400, message: None });
        }
        Ok("ada@example.com".to_string())
    }

    async fn reset_password(&self, _token: &str, _password: &str) -> Result<String, ApiError> {
        self.record("reset_password");
        Ok("Password reset successful".to_string())
    }
}

#[derive(Default)]
pub struct FakeAssistant {
    pub reply: Mutex<Option<RecommendationResponse>>,
    pub results: Mutex<Vec<SearchResult>>,
    pub fail_search: AtomicBool,
    pub searches: Mutex<Vec<(Vec<String>, MediaFilter)>>,
    pub chats: AtomicUsize,
}

impl FakeAssistant {
    /// `None` makes the chat endpoint fail
    pub fn new(reply: Option<Vec<Recommendation>>, results: Vec<SearchResult>) -> Self {
        Self {
            reply: Mutex::new(reply.map(|data| RecommendationResponse { message: "ok".to_string(), data })),
            results: Mutex::new(results),
            ..Default::default()
        }
    }

    pub fn searches(&self) -> Vec<(Vec<String>, MediaFilter)> {
        self.searches.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssistantApi for FakeAssistant {
    async fn chat(&self, _message: &str) -> Result<RecommendationResponse, ApiError> {
        self.chats.fetch_add(1, Ordering::SeqCst);
        self.reply.lock().unwrap().clone().ok_or_else(server_error)
    }

    async fn keyword_search(&self, keywords: &[String], scope: MediaFilter) -> Result<Vec<SearchResult>, ApiError> {
        self.searches.lock().unwrap().push((keywords.to_vec(), scope));
        if self.fail_search.load(Ordering::SeqCst) {
            return Err(server_error());
        }
        Ok(self
            .results
            .lock()
            .unwrap()
            .iter()
            .filter(|r| scope.matches(r.kind))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct FakeCatalog {
    pub results: Vec<SearchResult>,
    pub report_bytes: Vec<u8>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn search(&self, query: &str, page: u32) -> Result<Vec<SearchResult>, ApiError> {
        self.record(format!("search:{}:{}", query, page));
        Ok(self.results.clone())
    }

    async fn trending(&self, page: u32, window: TimeWindow) -> Result<Vec<SearchResult>, ApiError> {
        self.record(format!("trending:{}:{}", page, window.as_str()));
        Ok(self.results.clone())
    }

    async fn popular(&self, page: u32) -> Result<Vec<SearchResult>, ApiError> {
        self.record(format!("popular:{}", page));
        Ok(self.results.clone())
    }

    async fn details(&self, kind: MediaKind, tmdb_id: u64) -> Result<MediaDetails, ApiError> {
        self.record(format!("details:{}:{}", kind, tmdb_id));
        Err(not_found())
    }

    async fn report(&self, period: ReportPeriod) -> Result<Vec<u8>, ApiError> {
        self.record(format!("report:{}", period));
        Ok(self.report_bytes.clone())
    }
}
