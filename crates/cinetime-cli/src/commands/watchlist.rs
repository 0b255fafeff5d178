use super::prompts::confirm;
use super::spinner::{is_interactive, Spinner};
use super::{report_api_error, App};
use crate::output::{styled_table, Output};
use crate::WatchlistCommands;
use cinetime_client::CinetimeClient;
use cinetime_core::{catalog, format_watch_time, Route, WatchlistView};
use cinetime_models::{MediaKind, NewWatchlistItem, StatsSnapshot, WatchStatus, WatchlistItem};
use color_eyre::Result;
use owo_colors::OwoColorize;
use std::sync::Arc;
use std::time::Duration;

pub async fn run(app: &App, cmd: WatchlistCommands, output: &Output) -> Result<()> {
    if app.require(Route::Watchlist, output).is_none() {
        return Ok(());
    }
    let view = WatchlistView::new(Arc::clone(&app.client), app.config.watchlist.clone());

    match cmd {
        WatchlistCommands::List { status } => list(&view, status, output).await,
        WatchlistCommands::Add { kind, id } => add(app, &view, kind, id, output).await,
        WatchlistCommands::Status { id, status } => update_status(&view, &id, status, output).await,
        WatchlistCommands::Rate { id, rating } => rate(&view, &id, rating, output).await,
        WatchlistCommands::Remove { id, yes } => remove(&view, &id, yes, output).await,
        WatchlistCommands::Stats => stats(&view, output).await,
        WatchlistCommands::Watch { interval } => watch(app, &view, interval, output).await?,
    }
    Ok(())
}

async fn list(view: &WatchlistView<CinetimeClient>, status: Option<WatchStatus>, output: &Output) {
    let spinner = Spinner::start("Loading watchlist...");
    let result = view.set_filter(status).await;
    spinner.finish();

    if let Err(e) = result {
        output.error(e.to_string());
        return;
    }
    print_items(&view.items(), output);
}

async fn add(app: &App, view: &WatchlistView<CinetimeClient>, kind: MediaKind, id: u64, output: &Output) {
    let details = match catalog::details(app.client.as_ref(), kind, id).await {
        Ok(details) => details,
        Err(e) => {
            report_api_error(output, &e, "Failed to load details");
            return;
        }
    };
    let item = NewWatchlistItem {
        tmdb_id: details.id,
        title: details.display_title().to_string(),
        kind,
        poster_path: details.poster_path.clone(),
        backdrop_path: None,
        release_date: details.display_date().map(str::to_string),
    };

    match view.add(&item).await {
        Ok(created) => {
            output.success(format!("Added \"{}\" to your watchlist", item.title));
            if let Some(created) = created {
                output.data(&created);
            }
        }
        Err(e) => output.error(e.to_string()),
    }
}

/// Load the list first; status changes only apply to items it holds
async fn update_status(view: &WatchlistView<CinetimeClient>, id: &str, status: WatchStatus, output: &Output) {
    if let Err(e) = view.refresh().await {
        output.error(e.to_string());
        return;
    }
    let title = view.item(id).map(|item| item.title);

    let spinner = Spinner::start("Updating status...");
    let result = view.update_status(id, status).await;
    spinner.finish();

    match result {
        Ok(()) => {
            output.success(format!(
                "\"{}\" is now {}",
                title.unwrap_or_else(|| id.to_string()),
                status
            ));
            if let Some(snapshot) = view.stats() {
                print_stats(&snapshot, output);
            }
        }
        Err(e) => output.error(e.to_string()),
    }
}

async fn rate(view: &WatchlistView<CinetimeClient>, id: &str, rating: u8, output: &Output) {
    if let Err(e) = view.refresh().await {
        output.error(e.to_string());
        return;
    }
    match view.set_rating(id, rating).await {
        Ok(()) => output.success(format!("Rated {}/10", rating)),
        Err(e) => output.error(e.to_string()),
    }
}

async fn remove(view: &WatchlistView<CinetimeClient>, id: &str, yes: bool, output: &Output) {
    if !yes && is_interactive() {
        match confirm("Remove this item from your watchlist?", false) {
            Ok(true) => {}
            Ok(false) => {
                output.info("Nothing removed");
                return;
            }
            Err(e) => {
                output.error(e.to_string());
                return;
            }
        }
    }
    match view.remove(id).await {
        Ok(()) => output.success("Removed from watchlist"),
        Err(e) => output.error(e.to_string()),
    }
}

async fn stats(view: &WatchlistView<CinetimeClient>, output: &Output) {
    if let Err(e) = view.force_refresh().await {
        output.warn(e.to_string());
    }
    match view.stats() {
        Some(snapshot) => print_stats(&snapshot, output),
        None => output.info("Your watchlist is empty"),
    }
}

/// Print stats on every background refresh until Ctrl-C
async fn watch(app: &App, view: &WatchlistView<CinetimeClient>, interval: Option<u64>, output: &Output) -> Result<()> {
    if let Err(e) = view.force_refresh().await {
        output.warn(e.to_string());
    }
    let (interval, handle) = match interval.filter(|secs| *secs > 0) {
        Some(secs) => {
            let interval = Duration::from_secs(secs);
            (interval, view.start_auto_refresh_every(interval))
        }
        None => (app.config.watchlist.stats_refresh_interval(), view.start_auto_refresh()),
    };
    output.info(format!("Refreshing every {}s, press Ctrl-C to stop", interval.as_secs()));

    let mut ticker = tokio::time::interval(interval);
    let mut last_printed = None;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                let Some(snapshot) = view.stats() else { continue };
                if last_printed == Some(snapshot.computed_at) {
                    continue;
                }
                last_printed = Some(snapshot.computed_at);
                print_stats(&snapshot, output);
            }
        }
    }

    handle.stop().await;
    output.info("Stopped");
    Ok(())
}

fn print_items(items: &[WatchlistItem], output: &Output) {
    output.render(items, || {
        if items.is_empty() {
            output.info("Your watchlist is empty");
            return;
        }
        let mut table = styled_table(&["ID", "Title", "Type", "Status", "Rating", "Watch time"]);
        for item in items {
            table.add_row(vec![
                item.id.clone(),
                item.title.clone(),
                item.kind.to_string(),
                item.watch_status.to_string(),
                item.rating.map(|r| format!("{}/10", r)).unwrap_or_default(),
                format_watch_time(item.watch_time_minutes),
            ]);
        }
        output.table(&table);
    });
}

pub(crate) fn print_stats(snapshot: &StatsSnapshot, output: &Output) {
    output.render(snapshot, || {
        let stats = &snapshot.stats;
        let watch_time = if stats.total_watch_time_formatted.is_empty() {
            format_watch_time(stats.total_watch_time)
        } else {
            stats.total_watch_time_formatted.clone()
        };
        let source = if snapshot.is_authoritative() {
            "live".green().to_string()
        } else {
            "estimated".yellow().to_string()
        };

        println!(
            "{} ({}, {})",
            "Watch statistics".bold(),
            source,
            snapshot.computed_at.format("%H:%M:%S")
        );
        let mut table = styled_table(&["", "Total", "Completed", "Watch time"]);
        table.add_row(vec![
            "All".to_string(),
            stats.total_items.to_string(),
            stats.completed_count.to_string(),
            watch_time,
        ]);
        for (label, kind) in [("Movies", &stats.movie_stats), ("TV shows", &stats.tv_stats)] {
            table.add_row(vec![
                label.to_string(),
                kind.total.to_string(),
                kind.completed.to_string(),
                format_watch_time(kind.watch_time),
            ]);
        }
        output.table(&table);
        println!(
            "Planned {}  Watching {}  Completed {}",
            stats.planned_count, stats.watching_count, stats.completed_count
        );
    });
}
