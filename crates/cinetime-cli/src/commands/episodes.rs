use super::spinner::Spinner;
use super::{report_api_error, App};
use crate::output::{styled_table, Output};
use crate::EpisodeCommands;
use cinetime_client::{CinetimeClient, EpisodeApi};
use cinetime_core::{catalog, format_watch_time, EpisodeTracker, LoadState, Route, WatchlistView};
use cinetime_models::{EpisodeStatistics, EpisodeStatus, MediaKind, SeasonProgress, TvEpisode, WatchStatus};
use color_eyre::Result;
use owo_colors::OwoColorize;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

pub async fn run(app: &App, cmd: EpisodeCommands, output: &Output) -> Result<()> {
    if app.require(Route::Watchlist, output).is_none() {
        return Ok(());
    }

    match cmd {
        EpisodeCommands::List { tmdb_id, season } => {
            if let Some(tracker) = load_season(app, tmdb_id, season, output).await {
                print_season(&tracker, output);
            }
        }
        EpisodeCommands::Mark { tmdb_id, episode_id, status, season } => {
            let Some(tracker) = load_season(app, tmdb_id, season, output).await else {
                return Ok(());
            };
            if !tracker.episodes().iter().any(|ep| ep.id == episode_id) {
                output.error(format!("Episode {} is not part of season {}", episode_id, season));
                return Ok(());
            }
            match tracker.update_episode_status(&episode_id, status).await {
                Ok(progress) => {
                    output.success(format!("Episode marked {}", status));
                    print_progress(&progress, output);
                }
                Err(e) => report_api_error(output, &e, "Failed to update episode"),
            }
        }
        EpisodeCommands::MarkSeason { tmdb_id, season } => {
            let Some(tracker) = load_season(app, tmdb_id, season, output).await else {
                return Ok(());
            };
            if tracker.episodes().is_empty() {
                output.info("No episodes to mark");
                return Ok(());
            }
            let spinner = Spinner::start(format!("Marking season {} watched...", season));
            let result = tracker.mark_season_watched().await;
            spinner.finish();
            match result {
                Ok(progress) => {
                    output.success(format!("Season {} marked watched", season));
                    print_progress(&progress, output);
                }
                Err(e) => report_api_error(output, &e, "Failed to update some episodes"),
            }
        }
        EpisodeCommands::Stats => match app.client.episode_statistics().await {
            Ok(stats) => print_statistics(&stats, output),
            Err(e) => report_api_error(output, &e, "Failed to load episode statistics"),
        },
    }
    Ok(())
}

/// The show's watchlist status decides whether missing episodes are pulled
/// from the catalog
async fn parent_status(app: &App, tmdb_id: u64) -> Option<WatchStatus> {
    let view = WatchlistView::new(Arc::clone(&app.client), app.config.watchlist.clone());
    if let Err(e) = view.refresh().await {
        debug!(operation = "episodes_parent_status", error = %e, "Watchlist unavailable");
        return None;
    }
    view.items()
        .into_iter()
        .find(|item| item.tmdb_id == tmdb_id && item.kind == MediaKind::Tv)
        .map(|item| item.watch_status)
}

async fn load_season(
    app: &App,
    tmdb_id: u64,
    season: u32,
    output: &Output,
) -> Option<EpisodeTracker<CinetimeClient>> {
    let status = match parent_status(app, tmdb_id).await {
        Some(status) => status,
        None => {
            output.warn("This show is not on your watchlist; only stored episodes are shown");
            WatchStatus::Planned
        }
    };
    let season_count = catalog::details(app.client.as_ref(), MediaKind::Tv, tmdb_id)
        .await
        .ok()
        .and_then(|details| details.number_of_seasons);

    let tracker = EpisodeTracker::new(
        Arc::clone(&app.client),
        tmdb_id,
        season_count,
        status,
        app.config.episodes.clone(),
    );
    if !tracker.seasons().contains(&season) {
        output.error(format!("Season {} does not exist (1-{})", season, tracker.seasons().len()));
        return None;
    }

    let spinner = Spinner::start(format!("Loading season {}...", season));
    let state = tracker.select_season(season).await;
    spinner.finish();

    if let Some(error) = tracker.snapshot().error {
        output.error(error);
        return None;
    }
    if state == LoadState::Empty && status != WatchStatus::Watching {
        output.info("Set the show to watching to load its episodes: cinetime watchlist status <id> watching");
    }
    Some(tracker)
}

fn status_label(status: EpisodeStatus) -> String {
    match status {
        EpisodeStatus::Watched => status.to_string().green().to_string(),
        EpisodeStatus::Skipped => status.to_string().yellow().to_string(),
        _ => status.to_string(),
    }
}

fn print_season(tracker: &EpisodeTracker<CinetimeClient>, output: &Output) {
    let state = tracker.snapshot();
    let progress = tracker.progress();
    let payload = json!({
        "season": state.season,
        "seasons": tracker.seasons(),
        "episodes": state.episodes,
        "progress": progress,
    });
    output.render(&payload, || {
        if state.episodes.is_empty() {
            output.info(format!("No episodes for season {}", state.season));
            return;
        }
        let mut table = styled_table(&["ID", "#", "Title", "Air date", "Runtime", "Status"]);
        for ep in &state.episodes {
            table.add_row(episode_row(ep));
        }
        println!("{} {} of {}", "Season".bold(), state.season, tracker.seasons().len());
        output.table(&table);
        print_progress(&progress, output);
    });
}

fn episode_row(ep: &TvEpisode) -> Vec<String> {
    vec![
        ep.id.clone(),
        format!("S{:02}E{:02}", ep.season_number, ep.episode_number),
        ep.episode_title.clone(),
        ep.air_date.clone().unwrap_or_default(),
        format!("{} min", ep.runtime),
        status_label(ep.watch_status),
    ]
}

fn print_progress(progress: &SeasonProgress, output: &Output) {
    output.render(progress, || {
        println!(
            "Progress: {}/{} watched ({:.0}%)",
            progress.watched, progress.total, progress.percentage
        );
    });
}

fn print_statistics(stats: &EpisodeStatistics, output: &Output) {
    output.render(stats, || {
        let summary = &stats.summary;
        println!("{}", "Episode statistics".bold());
        println!(
            "{} shows, {}/{} episodes watched ({:.0}%), {} skipped, {} total watch time",
            summary.total_tv_shows,
            summary.watched_episodes,
            summary.total_episodes,
            summary.completion_percentage,
            summary.skipped_episodes,
            format_watch_time(summary.total_watch_time)
        );
        if stats.by_tv_show.is_empty() {
            return;
        }
        let mut table = styled_table(&["TMDB ID", "Show", "Watched", "Skipped", "Watch time", "Complete"]);
        for show in &stats.by_tv_show {
            table.add_row(vec![
                show.tmdb_id.to_string(),
                show.title.clone(),
                format!("{}/{}", show.watched_episodes, show.total_episodes),
                show.skipped_episodes.to_string(),
                format_watch_time(show.watch_time),
                format!("{:.0}%", show.completion_percentage),
            ]);
        }
        output.table(&table);
    });
}
