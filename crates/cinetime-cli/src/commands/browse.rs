use super::spinner::Spinner;
use super::{report_api_error, App};
use crate::output::{styled_table, Output};
use cinetime_core::{catalog, Route};
use cinetime_models::{MediaFilter, MediaKind, SearchResult};
use color_eyre::Result;
use owo_colors::OwoColorize;

pub async fn trending(app: &App, page: u32, kind: MediaFilter, output: &Output) -> Result<()> {
    if app.require(Route::Home, output).is_none() {
        return Ok(());
    }
    let spinner = Spinner::start("Loading trending titles...");
    let result = catalog::trending_of_kind(app.client.as_ref(), page, kind).await;
    spinner.finish();

    match result {
        Ok(results) => print_results(&results, output),
        Err(e) => report_api_error(output, &e, "Failed to load trending titles"),
    }
    Ok(())
}

pub async fn popular(app: &App, page: u32, output: &Output) -> Result<()> {
    if app.require(Route::Home, output).is_none() {
        return Ok(());
    }
    let spinner = Spinner::start("Loading popular movies...");
    let result = catalog::popular(app.client.as_ref(), page).await;
    spinner.finish();

    match result {
        Ok(results) => print_results(&results, output),
        Err(e) => report_api_error(output, &e, "Failed to load popular movies"),
    }
    Ok(())
}

pub async fn search(app: &App, query: &str, page: u32, kind: MediaFilter, output: &Output) -> Result<()> {
    if app.require(Route::Home, output).is_none() {
        return Ok(());
    }
    let spinner = Spinner::start(format!("Searching for \"{}\"...", query.trim()));
    let result = catalog::search(app.client.as_ref(), query, page).await;
    spinner.finish();

    match result {
        Ok(results) => print_results(&catalog::filter_by_kind(&results, kind), output),
        Err(e) => report_api_error(output, &e, "Search failed"),
    }
    Ok(())
}

pub async fn details(app: &App, kind: MediaKind, id: u64, output: &Output) -> Result<()> {
    if app.require(Route::Home, output).is_none() {
        return Ok(());
    }
    let details = match catalog::details(app.client.as_ref(), kind, id).await {
        Ok(details) => details,
        Err(e) => {
            report_api_error(output, &e, "Failed to load details");
            return Ok(());
        }
    };

    output.render(&details, || {
        let date = details.display_date().unwrap_or("unknown date");
        println!("{} ({})", details.display_title().bold(), date.dimmed());
        if !details.genres.is_empty() {
            let genres: Vec<&str> = details.genres.iter().map(|g| g.name.as_str()).collect();
            println!("{}", genres.join(", ").cyan());
        }
        if let Some(vote) = details.vote_average {
            println!("Rating: {:.1}/10", vote);
        }
        if let Some(runtime) = details.runtime {
            println!("Runtime: {} min", runtime);
        }
        if let Some(seasons) = details.number_of_seasons {
            println!(
                "Seasons: {} ({} episodes)",
                seasons,
                details.number_of_episodes.unwrap_or_default()
            );
        }
        if let Some(url) = details
            .poster_path
            .as_deref()
            .and_then(|p| app.config.catalog.poster_url(p))
        {
            println!("Poster: {}", url);
        }
        if let Some(overview) = details.overview.as_deref().filter(|o| !o.is_empty()) {
            println!();
            println!("{}", overview);
        }
    });
    Ok(())
}

/// Results table shared by the catalog and assistant commands
pub(crate) fn print_results(results: &[SearchResult], output: &Output) {
    output.render(results, || {
        if results.is_empty() {
            output.info("No results");
            return;
        }
        let mut table = styled_table(&["ID", "Title", "Type", "Year", "Rating"]);
        for result in results {
            table.add_row(vec![
                result.id.to_string(),
                result.title.clone(),
                result.kind.to_string(),
                result.year().map(|y| y.to_string()).unwrap_or_default(),
                format!("{:.1}", result.vote_average),
            ]);
        }
        output.table(&table);
    });
}
