//! Watchlist state kept in step with the backend.
//!
//! Status changes are applied locally first and reconciled afterwards. A
//! failed change always re-fetches the list, so the local view never keeps a
//! status the backend refused. List fetches are numbered and only the most
//! recently issued one may replace the items.

use crate::stats::{derive_stats, StatsProvider};
use chrono::{DateTime, Utc};
use cinetime_client::{ApiError, WatchlistApi};
use cinetime_config::WatchlistOptions;
use cinetime_models::{
    NewWatchlistItem, StatsSnapshot, StatsSource, StatusUpdate, WatchStatus, WatchlistItem,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum WatchlistError {
    #[error("item {0} is not in the current list")]
    UnknownItem(String),

    #[error("rating must be between 1 and 10, got {0}")]
    InvalidRating(u8),

    #[error("{message}")]
    Api {
        message: String,
        #[source]
        source: ApiError,
    },
}

impl WatchlistError {
    fn api(source: ApiError, fallback: &str) -> Self {
        WatchlistError::Api {
            message: source.user_message(fallback),
            source,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WatchlistState {
    pub items: Vec<WatchlistItem>,
    /// `None` lists every status
    pub filter: Option<WatchStatus>,
    pub stats: Option<StatsSnapshot>,
    pub error: Option<String>,
    /// Time of the last successful authoritative stats fetch
    pub last_updated: Option<DateTime<Utc>>,
}

impl WatchlistState {
    fn recompute_stats(&mut self) {
        self.stats = if self.items.is_empty() {
            None
        } else {
            Some(StatsSnapshot::new(StatsSource::Derived, derive_stats(&self.items)))
        };
    }
}

struct Shared {
    state: Mutex<WatchlistState>,
    /// Number of the most recently issued list fetch
    generation: AtomicU64,
}

pub struct WatchlistView<A: WatchlistApi + ?Sized> {
    api: Arc<A>,
    shared: Arc<Shared>,
    options: WatchlistOptions,
}

impl<A: WatchlistApi + ?Sized> Clone for WatchlistView<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            shared: Arc::clone(&self.shared),
            options: self.options.clone(),
        }
    }
}

impl<A: WatchlistApi + ?Sized> WatchlistView<A> {
    pub fn new(api: Arc<A>, options: WatchlistOptions) -> Self {
        Self {
            api,
            shared: Arc::new(Shared {
                state: Mutex::new(WatchlistState::default()),
                generation: AtomicU64::new(0),
            }),
            options,
        }
    }

    fn state(&self) -> MutexGuard<'_, WatchlistState> {
        self.shared.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> WatchlistState {
        self.state().clone()
    }

    pub fn items(&self) -> Vec<WatchlistItem> {
        self.state().items.clone()
    }

    pub fn item(&self, item_id: &str) -> Option<WatchlistItem> {
        self.state().items.iter().find(|i| i.id == item_id).cloned()
    }

    pub fn stats(&self) -> Option<StatsSnapshot> {
        self.state().stats.clone()
    }

    pub fn filter(&self) -> Option<WatchStatus> {
        self.state().filter
    }

    /// Fetch the list for the active filter and recompute derived stats.
    ///
    /// A response that arrives after a newer fetch was issued is dropped.
    pub async fn refresh(&self) -> Result<(), WatchlistError> {
        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let filter = self.filter();

        let result = self.api.list(1, filter).await;

        let mut state = self.state();
        if self.shared.generation.load(Ordering::SeqCst) != generation {
            debug!(operation = "watchlist_refresh", generation, "Discarding stale list response");
            return Ok(());
        }
        match result {
            Ok(page) => {
                debug!(operation = "watchlist_refresh", generation, count = page.data.len(), "List replaced");
                state.items = page.data;
                state.error = None;
                state.recompute_stats();
                Ok(())
            }
            Err(e) => {
                let err = WatchlistError::api(e, "Failed to fetch watchlist");
                warn!(operation = "watchlist_refresh", error = %err, "List fetch failed");
                state.items.clear();
                state.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Fetch authoritative stats, deriving them from the held list when that
    /// fails and the list is non-empty.
    pub async fn refresh_stats(&self) -> Result<StatsSnapshot, ApiError> {
        let local = self.items();
        let snapshot = StatsProvider::new(&*self.api).current(&local).await?;

        let mut state = self.state();
        if snapshot.is_authoritative() {
            state.last_updated = Some(snapshot.computed_at);
        }
        state.stats = Some(snapshot.clone());
        Ok(snapshot)
    }

    /// List first, then stats, so the final figures are the backend's
    pub async fn force_refresh(&self) -> Result<(), WatchlistError> {
        let listed = self.refresh().await;
        if let Err(e) = self.refresh_stats().await {
            debug!(operation = "watchlist_force_refresh", error = %e, "Stats unavailable");
        }
        listed
    }

    pub async fn set_filter(&self, filter: Option<WatchStatus>) -> Result<(), WatchlistError> {
        self.state().filter = filter;
        self.refresh().await
    }

    /// Change an item's status.
    ///
    /// The local item and derived stats change before the request is sent.
    /// Success reconciles after the configured delay; failure re-fetches the
    /// list immediately and returns the error.
    pub async fn update_status(&self, item_id: &str, status: WatchStatus) -> Result<(), WatchlistError> {
        {
            let mut state = self.state();
            let item = state
                .items
                .iter_mut()
                .find(|i| i.id == item_id)
                .ok_or_else(|| WatchlistError::UnknownItem(item_id.to_string()))?;
            item.watch_status = status;
            state.recompute_stats();
        }
        info!(operation = "watchlist_update_status", item_id, status = %status, "Status changed locally");

        let update = StatusUpdate {
            watch_status: Some(status),
            rating: None,
        };
        match self.api.update_status(item_id, &update).await {
            Ok(()) => {
                self.reconcile_later().await;
                Ok(())
            }
            Err(e) => {
                let err = WatchlistError::api(e, "Failed to update status");
                warn!(operation = "watchlist_update_status", item_id, error = %err, "Update rejected, re-fetching list");
                let _ = self.refresh().await;
                self.state().error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub async fn set_rating(&self, item_id: &str, rating: u8) -> Result<(), WatchlistError> {
        if !(1..=10).contains(&rating) {
            return Err(WatchlistError::InvalidRating(rating));
        }
        if self.item(item_id).is_none() {
            return Err(WatchlistError::UnknownItem(item_id.to_string()));
        }

        let update = StatusUpdate {
            watch_status: None,
            rating: Some(rating),
        };
        match self.api.update_status(item_id, &update).await {
            Ok(()) => {
                if let Some(item) = self.state().items.iter_mut().find(|i| i.id == item_id) {
                    item.rating = Some(rating);
                }
                Ok(())
            }
            Err(e) => {
                let err = WatchlistError::api(e, "Failed to update rating");
                let _ = self.refresh().await;
                Err(err)
            }
        }
    }

    pub async fn remove(&self, item_id: &str) -> Result<(), WatchlistError> {
        self.api
            .remove(item_id)
            .await
            .map_err(|e| WatchlistError::api(e, "Failed to remove item"))?;
        info!(operation = "watchlist_remove", item_id, "Removed from watchlist");
        self.force_refresh().await
    }

    pub async fn add(&self, item: &NewWatchlistItem) -> Result<Option<WatchlistItem>, WatchlistError> {
        let created = self
            .api
            .add(item)
            .await
            .map_err(|e| WatchlistError::api(e, "Failed to add to watchlist"))?;
        self.force_refresh().await?;
        Ok(created)
    }

    async fn reconcile_later(&self) {
        let delay = self.options.reconcile_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if let Err(e) = self.force_refresh().await {
            warn!(operation = "watchlist_reconcile", error = %e, "Reconcile after update failed");
        }
    }
}

impl<A: WatchlistApi + ?Sized + 'static> WatchlistView<A> {
    /// Refresh stats every `stats_refresh_secs` until the handle is dropped
    pub fn start_auto_refresh(&self) -> StatsRefreshHandle {
        self.start_auto_refresh_every(self.options.stats_refresh_interval())
    }

    pub fn start_auto_refresh_every(&self, interval: Duration) -> StatsRefreshHandle {
        let token = CancellationToken::new();
        let view = self.clone();
        let cancelled = token.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => {
                        debug!(operation = "stats_auto_refresh", "Auto refresh stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        if let Err(e) = view.refresh_stats().await {
                            debug!(operation = "stats_auto_refresh", error = %e, "Stats refresh failed");
                        }
                    }
                }
            }
        });

        StatsRefreshHandle { token, task: Some(task) }
    }
}

/// Background stats refresh; dropping the handle stops it
pub struct StatsRefreshHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl StatsRefreshHandle {
    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled() && self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Cancel and wait for the task to exit
    pub async fn stop(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for StatsRefreshHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{item, FakeWatchlist, Gate};
    use cinetime_models::MediaKind;

    fn options() -> WatchlistOptions {
        WatchlistOptions {
            stats_refresh_secs: 10,
            reconcile_delay_ms: 0,
        }
    }

    fn sample() -> Vec<WatchlistItem> {
        vec![
            item("1", MediaKind::Movie, WatchStatus::Planned, 120),
            item("2", MediaKind::Tv, WatchStatus::Watching, 300),
        ]
    }

    async fn loaded(api: Arc<FakeWatchlist>) -> WatchlistView<FakeWatchlist> {
        let view = WatchlistView::new(api, options());
        view.refresh().await.unwrap();
        view
    }

    #[tokio::test]
    async fn test_optimistic_status_visible_before_call_resolves() {
        let gate = Arc::new(Gate::default());
        let api = Arc::new(FakeWatchlist::with_update_gate(sample(), gate.clone()));
        let view = loaded(api.clone()).await;

        let pending = {
            let view = view.clone();
            tokio::spawn(async move { view.update_status("1", WatchStatus::Completed).await })
        };

        gate.entered.notified().await;
        assert_eq!(view.item("1").unwrap().watch_status, WatchStatus::Completed);
        let stats = view.stats().unwrap();
        assert_eq!(stats.source, StatsSource::Derived);
        assert_eq!(stats.stats.completed_count, 1);
        assert_eq!(stats.stats.total_watch_time, 120);

        gate.release.notify_one();
        pending.await.unwrap().unwrap();
        assert_eq!(view.item("1").unwrap().watch_status, WatchStatus::Completed);
        assert!(view.stats().unwrap().is_authoritative());
        assert!(view.snapshot().last_updated.is_some());
    }

    #[tokio::test]
    async fn test_failed_update_forces_list_refetch() {
        let api = Arc::new(FakeWatchlist::new(sample()));
        let view = loaded(api.clone()).await;
        api.fail_update(true);
        let lists_before = api.count("list");

        let err = view.update_status("1", WatchStatus::Completed).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid status");
        assert_eq!(api.count("list"), lists_before + 1);
        // The backend still has the item as planned
        assert_eq!(view.item("1").unwrap().watch_status, WatchStatus::Planned);
        assert_eq!(view.snapshot().error.as_deref(), Some("Invalid status"));
    }

    #[tokio::test]
    async fn test_unknown_item_makes_no_call() {
        let api = Arc::new(FakeWatchlist::new(sample()));
        let view = loaded(api.clone()).await;

        let err = view.update_status("missing", WatchStatus::Completed).await.unwrap_err();
        assert!(matches!(err, WatchlistError::UnknownItem(_)));
        assert_eq!(api.count("update_status"), 0);
    }

    #[tokio::test]
    async fn test_successful_update_reconciles_list_and_stats() {
        let api = Arc::new(FakeWatchlist::new(sample()));
        let view = loaded(api.clone()).await;

        view.update_status("2", WatchStatus::Completed).await.unwrap();
        let calls = api.calls();
        let tail: Vec<&str> = calls.iter().rev().take(3).rev().map(String::as_str).collect();
        assert_eq!(tail, ["update_status", "list", "stats"]);
    }

    #[tokio::test]
    async fn test_refresh_failure_empties_list() {
        let api = Arc::new(FakeWatchlist::new(sample()));
        let view = loaded(api.clone()).await;
        api.fail_list(true);

        assert!(view.refresh().await.is_err());
        let state = view.snapshot();
        assert!(state.items.is_empty());
        assert_eq!(state.error.as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn test_set_filter_lists_matching_status() {
        let api = Arc::new(FakeWatchlist::new(sample()));
        let view = loaded(api).await;

        view.set_filter(Some(WatchStatus::Watching)).await.unwrap();
        let items = view.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "2");

        view.set_filter(None).await.unwrap();
        assert_eq!(view.items().len(), 2);
    }

    #[tokio::test]
    async fn test_stale_list_response_discarded() {
        let api = Arc::new(FakeWatchlist::new(sample()));
        let view = loaded(api.clone()).await;

        let gate = Arc::new(Gate::default());
        api.gate_next_list(gate.clone());
        let slow = {
            let view = view.clone();
            tokio::spawn(async move { view.refresh().await })
        };
        gate.entered.notified().await;

        // A newer fetch completes while the first one is still in flight
        api.remove("2").await.unwrap();
        view.refresh().await.unwrap();
        assert_eq!(view.items().len(), 1);

        gate.release.notify_one();
        slow.await.unwrap().unwrap();
        assert_eq!(view.items().len(), 1);
    }

    #[tokio::test]
    async fn test_stop_waits_for_task() {
        let api = Arc::new(FakeWatchlist::new(sample()));
        let view = loaded(api).await;
        let handle = view.start_auto_refresh();
        handle.stop().await;
    }

    #[tokio::test]
    async fn test_remove_and_rating() {
        let api = Arc::new(FakeWatchlist::new(sample()));
        let view = loaded(api.clone()).await;

        assert!(matches!(view.set_rating("1", 11).await, Err(WatchlistError::InvalidRating(11))));
        view.set_rating("1", 8).await.unwrap();
        assert_eq!(view.item("1").unwrap().rating, Some(8));

        view.remove("1").await.unwrap();
        assert!(view.item("1").is_none());
        assert_eq!(api.count("stats"), 1);
    }

    #[tokio::test]
    async fn test_auto_refresh_stops_on_drop() {
        let api = Arc::new(FakeWatchlist::new(sample()));
        let view = loaded(api.clone()).await;

        let handle = view.start_auto_refresh_every(Duration::from_millis(10));
        assert!(handle.is_running());
        tokio::time::sleep(Duration::from_millis(35)).await;
        drop(handle);

        tokio::time::sleep(Duration::from_millis(20)).await;
        let after_drop = api.count("stats");
        assert!(after_drop >= 1);
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(api.count("stats"), after_drop);
    }
}
