//! Per-season episode loading for one show.
//!
//! The store is asked first. When it has nothing for the season and the show
//! is being watched, the season is pulled from the catalog once, and after a
//! fixed delay the store is asked exactly one more time.

use chrono::Utc;
use cinetime_client::{ApiError, EpisodeApi};
use cinetime_config::EpisodeOptions;
use cinetime_models::{EpisodeStatus, EpisodeStatusUpdate, SeasonProgress, TvEpisode, WatchStatus};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    LoadingFromStore,
    FetchingFromCatalog,
    Ready,
    Empty,
}

#[derive(Debug, Clone)]
pub struct EpisodeState {
    pub load: LoadState,
    pub season: u32,
    pub parent_status: WatchStatus,
    pub episodes: Vec<TvEpisode>,
    pub error: Option<String>,
}

enum StoreAnswer {
    Found(Vec<TvEpisode>),
    Missing,
    Failed(ApiError),
}

pub struct EpisodeTracker<A: EpisodeApi + ?Sized> {
    api: Arc<A>,
    tmdb_id: u64,
    season_count: u32,
    options: EpisodeOptions,
    state: Mutex<EpisodeState>,
    generation: AtomicU64,
}

impl<A: EpisodeApi + ?Sized> EpisodeTracker<A> {
    /// `season_count` of `None` or zero is treated as a single season
    pub fn new(
        api: Arc<A>,
        tmdb_id: u64,
        season_count: Option<u32>,
        parent_status: WatchStatus,
        options: EpisodeOptions,
    ) -> Self {
        Self {
            api,
            tmdb_id,
            season_count: season_count.filter(|n| *n > 0).unwrap_or(1),
            options,
            state: Mutex::new(EpisodeState {
                load: LoadState::Idle,
                season: 1,
                parent_status,
                episodes: Vec::new(),
                error: None,
            }),
            generation: AtomicU64::new(0),
        }
    }

    fn state(&self) -> MutexGuard<'_, EpisodeState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> EpisodeState {
        self.state().clone()
    }

    pub fn load_state(&self) -> LoadState {
        self.state().load
    }

    pub fn episodes(&self) -> Vec<TvEpisode> {
        self.state().episodes.clone()
    }

    pub fn seasons(&self) -> Vec<u32> {
        (1..=self.season_count).collect()
    }

    pub fn progress(&self) -> SeasonProgress {
        SeasonProgress::from_episodes(&self.state().episodes)
    }

    pub async fn select_season(&self, season: u32) -> LoadState {
        self.state().season = season;
        self.reload().await
    }

    /// Record the show's status; becoming `watching` triggers a load
    pub async fn set_parent_status(&self, status: WatchStatus) -> LoadState {
        let previous = std::mem::replace(&mut self.state().parent_status, status);
        if status == WatchStatus::Watching && previous != WatchStatus::Watching {
            self.reload().await
        } else {
            self.load_state()
        }
    }

    /// Run the load sequence for the selected season
    pub async fn reload(&self) -> LoadState {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let (season, parent) = {
            let mut state = self.state();
            state.load = LoadState::LoadingFromStore;
            state.error = None;
            (state.season, state.parent_status)
        };

        let answer = self.query_store(season).await;
        let episodes = match answer {
            StoreAnswer::Found(episodes) => episodes,
            StoreAnswer::Failed(e) => {
                warn!(operation = "episodes_load", tmdb_id = self.tmdb_id, season, error = %e, "Store query failed");
                return self.finish(generation, Vec::new(), Some(e.user_message("Failed to fetch episodes")));
            }
            StoreAnswer::Missing if parent != WatchStatus::Watching => {
                debug!(operation = "episodes_load", tmdb_id = self.tmdb_id, season, "Nothing stored and show not in progress");
                return self.finish(generation, Vec::new(), None);
            }
            StoreAnswer::Missing => match self.fetch_then_requery(generation, season).await {
                Ok(episodes) => episodes,
                Err(message) => return self.finish(generation, Vec::new(), Some(message)),
            },
        };
        self.finish(generation, episodes, None)
    }

    async fn query_store(&self, season: u32) -> StoreAnswer {
        match self.api.show_episodes(self.tmdb_id, Some(season)).await {
            Ok(show) => match show.season(season) {
                Some(episodes) if !episodes.is_empty() => StoreAnswer::Found(episodes.to_vec()),
                _ => StoreAnswer::Missing,
            },
            Err(e) if e.is_missing_resource() => StoreAnswer::Missing,
            Err(e) => StoreAnswer::Failed(e),
        }
    }

    async fn fetch_then_requery(&self, generation: u64, season: u32) -> Result<Vec<TvEpisode>, String> {
        if self.is_current(generation) {
            self.state().load = LoadState::FetchingFromCatalog;
        }
        info!(operation = "episodes_catalog_fetch", tmdb_id = self.tmdb_id, season, "Pulling season from catalog");

        if let Err(e) = self.api.fetch_season(self.tmdb_id, season).await {
            warn!(operation = "episodes_catalog_fetch", tmdb_id = self.tmdb_id, season, error = %e, "Catalog fetch failed");
            return Err(e.user_message("Failed to fetch episodes from catalog"));
        }

        let delay = self.options.refetch_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match self.query_store(season).await {
            StoreAnswer::Found(episodes) => Ok(episodes),
            StoreAnswer::Missing => Ok(Vec::new()),
            StoreAnswer::Failed(e) => Err(e.user_message("Failed to fetch episodes")),
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn finish(&self, generation: u64, episodes: Vec<TvEpisode>, error: Option<String>) -> LoadState {
        let mut state = self.state();
        if !self.is_current(generation) {
            debug!(operation = "episodes_load", generation, "Discarding stale episode load");
            return state.load;
        }
        state.load = if episodes.is_empty() { LoadState::Empty } else { LoadState::Ready };
        state.episodes = episodes;
        state.error = error;
        state.load
    }

    /// Persist an episode's status, then mirror it locally
    pub async fn update_episode_status(&self, episode_id: &str, status: EpisodeStatus) -> Result<SeasonProgress, ApiError> {
        let update = EpisodeStatusUpdate {
            watch_status: Some(status),
            rating: None,
        };
        self.api.update_episode_status(episode_id, &update).await?;

        let mut state = self.state();
        apply_status(&mut state.episodes, episode_id, status);
        Ok(SeasonProgress::from_episodes(&state.episodes))
    }

    /// Mark every loaded episode watched; requests run concurrently
    pub async fn mark_season_watched(&self) -> Result<SeasonProgress, ApiError> {
        let ids: Vec<String> = self.episodes().into_iter().map(|ep| ep.id).collect();
        let results = self.api.mark_watched(&ids).await;

        let mut state = self.state();
        let mut first_error = None;
        for (id, result) in ids.iter().zip(results) {
            match result {
                Ok(()) => apply_status(&mut state.episodes, id, EpisodeStatus::Watched),
                Err(e) => {
                    warn!(operation = "episodes_mark_season", episode_id = %id, error = %e, "Episode update failed");
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(SeasonProgress::from_episodes(&state.episodes)),
        }
    }
}

fn apply_status(episodes: &mut [TvEpisode], episode_id: &str, status: EpisodeStatus) {
    if let Some(ep) = episodes.iter_mut().find(|ep| ep.id == episode_id) {
        ep.watch_status = status;
        ep.watched_at = (status == EpisodeStatus::Watched).then(Utc::now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{episode, not_found, season_payload, server_error, FakeEpisodes};
    use cinetime_models::ShowEpisodes;

    fn instant() -> EpisodeOptions {
        EpisodeOptions { refetch_delay_ms: 0 }
    }

    fn tracker(api: Arc<FakeEpisodes>, parent: WatchStatus) -> EpisodeTracker<FakeEpisodes> {
        EpisodeTracker::new(api, 1399, Some(3), parent, instant())
    }

    fn two_episodes() -> Vec<TvEpisode> {
        vec![
            episode("e1", 1, 1, EpisodeStatus::Watched),
            episode("e2", 1, 2, EpisodeStatus::Unwatched),
        ]
    }

    #[tokio::test]
    async fn test_stored_episodes_ready_without_fetch() {
        let api = Arc::new(FakeEpisodes::with_store(vec![Ok(season_payload(1, two_episodes()))]));
        let t = tracker(api.clone(), WatchStatus::Watching);

        assert_eq!(t.reload().await, LoadState::Ready);
        assert_eq!(api.fetch_calls(), 0);
        let progress = t.progress();
        assert_eq!((progress.watched, progress.total), (1, 2));
        assert_eq!(progress.percentage, 50.0);
    }

    #[tokio::test]
    async fn test_empty_store_while_watching_fetches_once_then_requeries_once() {
        let api = Arc::new(FakeEpisodes::with_store(vec![
            Ok(season_payload(1, vec![])),
            Ok(season_payload(1, two_episodes())),
        ]));
        let t = tracker(api.clone(), WatchStatus::Watching);

        assert_eq!(t.reload().await, LoadState::Ready);
        assert_eq!(api.fetch_calls(), 1);
        assert_eq!(api.store_calls(), 2);
    }

    #[tokio::test]
    async fn test_fallback_ends_empty_without_retry_loop() {
        let api = Arc::new(FakeEpisodes::with_store(vec![Err(not_found()), Ok(ShowEpisodes::default())]));
        let t = tracker(api.clone(), WatchStatus::Watching);

        assert_eq!(t.reload().await, LoadState::Empty);
        assert_eq!(api.fetch_calls(), 1);
        assert_eq!(api.store_calls(), 2);
        assert!(t.snapshot().error.is_none());
    }

    #[tokio::test]
    async fn test_not_watching_goes_empty_without_fetch() {
        let api = Arc::new(FakeEpisodes::with_store(vec![Ok(ShowEpisodes::default())]));
        let t = tracker(api.clone(), WatchStatus::Planned);

        assert_eq!(t.reload().await, LoadState::Empty);
        assert_eq!(api.fetch_calls(), 0);
        assert_eq!(api.store_calls(), 1);
    }

    #[tokio::test]
    async fn test_catalog_failure_skips_requery() {
        let api = Arc::new(FakeEpisodes::with_store(vec![Ok(season_payload(1, vec![]))]));
        api.fail_fetch(true);
        let t = tracker(api.clone(), WatchStatus::Watching);

        assert_eq!(t.reload().await, LoadState::Empty);
        assert_eq!(api.store_calls(), 1);
        assert_eq!(t.snapshot().error.as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn test_other_store_errors_recorded() {
        let api = Arc::new(FakeEpisodes::with_store(vec![Err(server_error())]));
        let t = tracker(api.clone(), WatchStatus::Watching);

        assert_eq!(t.reload().await, LoadState::Empty);
        assert_eq!(api.fetch_calls(), 0);
        assert!(t.snapshot().error.is_some());
    }

    #[tokio::test]
    async fn test_parent_becoming_watching_triggers_load() {
        let api = Arc::new(FakeEpisodes::with_store(vec![Ok(season_payload(1, two_episodes()))]));
        let t = tracker(api.clone(), WatchStatus::Planned);
        assert_eq!(t.load_state(), LoadState::Idle);

        assert_eq!(t.set_parent_status(WatchStatus::Completed).await, LoadState::Idle);
        assert_eq!(api.store_calls(), 0);
        assert_eq!(t.set_parent_status(WatchStatus::Watching).await, LoadState::Ready);
        assert_eq!(api.store_calls(), 1);
    }

    #[tokio::test]
    async fn test_select_season_and_season_list() {
        let api = Arc::new(FakeEpisodes::with_store(vec![Ok(season_payload(2, vec![
            episode("s2e1", 2, 1, EpisodeStatus::Unwatched),
        ]))]));
        let t = tracker(api, WatchStatus::Watching);
        assert_eq!(t.seasons(), vec![1, 2, 3]);

        assert_eq!(t.select_season(2).await, LoadState::Ready);
        assert_eq!(t.snapshot().season, 2);

        let single = EpisodeTracker::new(Arc::new(FakeEpisodes::default()), 1, None, WatchStatus::Planned, instant());
        assert_eq!(single.seasons(), vec![1]);
    }

    #[tokio::test]
    async fn test_update_episode_status_sets_watched_at() {
        let api = Arc::new(FakeEpisodes::with_store(vec![Ok(season_payload(1, two_episodes()))]));
        let t = tracker(api.clone(), WatchStatus::Watching);
        t.reload().await;

        let progress = t.update_episode_status("e2", EpisodeStatus::Watched).await.unwrap();
        assert_eq!(progress.watched, 2);
        assert!(t.episodes()[1].watched_at.is_some());

        t.update_episode_status("e2", EpisodeStatus::Skipped).await.unwrap();
        assert!(t.episodes()[1].watched_at.is_none());
    }

    #[tokio::test]
    async fn test_mark_season_watched() {
        let api = Arc::new(FakeEpisodes::with_store(vec![Ok(season_payload(1, two_episodes()))]));
        let t = tracker(api.clone(), WatchStatus::Watching);
        t.reload().await;

        let progress = t.mark_season_watched().await.unwrap();
        assert_eq!(progress.percentage, 100.0);
        assert_eq!(api.updates.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_episode_update_leaves_local_state() {
        let api = Arc::new(FakeEpisodes::with_store(vec![Ok(season_payload(1, two_episodes()))]));
        let t = tracker(api.clone(), WatchStatus::Watching);
        t.reload().await;
        api.fail_updates(true);

        assert!(t.update_episode_status("e2", EpisodeStatus::Watched).await.is_err());
        assert_eq!(t.progress().watched, 1);
    }
}
