use cinetime_client::{ApiError, WatchlistApi};
use cinetime_models::{
    KindStats, MediaKind, StatsSnapshot, StatsSource, StatusBucket, TypeBucket, WatchStatus, WatchlistItem,
    WatchlistStats,
};
use tracing::{debug, warn};

/// Render minutes as `"{h}h {m}m"`
pub fn format_watch_time(minutes: u32) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

fn kind_stats(items: &[WatchlistItem], kind: MediaKind) -> KindStats {
    let of_kind: Vec<&WatchlistItem> = items.iter().filter(|item| item.kind == kind).collect();
    let completed: Vec<&&WatchlistItem> = of_kind
        .iter()
        .filter(|item| item.watch_status == WatchStatus::Completed)
        .collect();
    let watch_time = completed.iter().map(|item| item.watch_time_minutes).sum();

    KindStats {
        total: of_kind.len() as u32,
        completed: completed.len() as u32,
        watch_time,
        watch_time_formatted: format_watch_time(watch_time),
    }
}

/// Recompute the aggregate from a locally held list.
///
/// Watch time only counts completed items. `by_status` omits empty statuses;
/// `by_type` always lists movie then tv.
pub fn derive_stats(items: &[WatchlistItem]) -> WatchlistStats {
    let count = |status: WatchStatus| items.iter().filter(|item| item.watch_status == status).count() as u32;
    let planned_count = count(WatchStatus::Planned);
    let watching_count = count(WatchStatus::Watching);
    let completed_count = count(WatchStatus::Completed);

    let total_watch_time: u32 = items
        .iter()
        .filter(|item| item.watch_status == WatchStatus::Completed)
        .map(|item| item.watch_time_minutes)
        .sum();

    let movie_stats = kind_stats(items, MediaKind::Movie);
    let tv_stats = kind_stats(items, MediaKind::Tv);

    let by_status = [
        (WatchStatus::Planned, planned_count, 0),
        (WatchStatus::Watching, watching_count, 0),
        (WatchStatus::Completed, completed_count, total_watch_time),
    ]
    .into_iter()
    .filter(|(_, count, _)| *count > 0)
    .map(|(status, count, time)| StatusBucket {
        status: status.as_str().to_string(),
        count,
        time,
    })
    .collect();

    let by_type = vec![
        TypeBucket { kind: MediaKind::Movie.as_str().to_string(), count: movie_stats.total },
        TypeBucket { kind: MediaKind::Tv.as_str().to_string(), count: tv_stats.total },
    ];

    WatchlistStats {
        total_items: items.len() as u32,
        total_watch_time,
        total_watch_time_formatted: format_watch_time(total_watch_time),
        movie_stats,
        tv_stats,
        by_status,
        by_type,
        planned_count,
        watching_count,
        completed_count,
    }
}

/// Single entry point for watchlist stats, whichever path produced them
pub struct StatsProvider<'a, A: WatchlistApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: WatchlistApi + ?Sized> StatsProvider<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Prefer the backend figures. Fall back to recomputing from `local` only
    /// when the fetch fails and `local` is non-empty.
    pub async fn current(&self, local: &[WatchlistItem]) -> Result<StatsSnapshot, ApiError> {
        match self.api.stats().await {
            Ok(stats) => {
                debug!(operation = "stats_fetch", total = stats.total_items, "Authoritative stats received");
                Ok(StatsSnapshot::new(StatsSource::Authoritative, stats))
            }
            Err(e) if !local.is_empty() => {
                warn!(operation = "stats_fetch", error = %e, items = local.len(), "Stats fetch failed, deriving from local list");
                Ok(StatsSnapshot::new(StatsSource::Derived, derive_stats(local)))
            }
            Err(e) => Err(e),
        }
    }
}
