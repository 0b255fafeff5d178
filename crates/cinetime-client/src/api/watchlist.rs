use super::segment;
use crate::error::ApiError;
use crate::http::{ApiClient, Envelope};
use cinetime_models::{MediaKind, NewWatchlistItem, StatusUpdate, WatchStatus, WatchlistItem, WatchlistPage, WatchlistStats};
use tracing::{debug, info};

/// Add a title. Shows go through the TV endpoint, which also seeds episode
/// tracking on the backend.
pub async fn add(client: &ApiClient, item: &NewWatchlistItem) -> Result<Option<WatchlistItem>, ApiError> {
    let path = match item.kind {
        MediaKind::Movie => "/media/watchlist",
        MediaKind::Tv => "/media/watchlist/tv",
    };
    let response: Envelope<serde_json::Value> = client.post_json(path, Some(item)).await?;
    info!(operation = "watchlist_add", tmdb_id = item.tmdb_id, kind = %item.kind, "Added to watchlist");
    Ok(response.data.and_then(|value| serde_json::from_value(value).ok()))
}

pub async fn list(client: &ApiClient, page: u32, status: Option<WatchStatus>) -> Result<WatchlistPage, ApiError> {
    let mut params = vec![("page", page.to_string())];
    if let Some(status) = status {
        params.push(("status", status.as_str().to_string()));
    }
    let page: WatchlistPage = client.get_json("/media/watchlist", &params).await?;
    debug!(operation = "watchlist_list", count = page.data.len(), "Fetched watchlist page");
    Ok(page)
}

pub async fn update_status(client: &ApiClient, item_id: &str, update: &StatusUpdate) -> Result<(), ApiError> {
    let path = format!("/media/watchlist/{}/status", segment(item_id));
    let _: serde_json::Value = client.put_json(&path, update).await?;
    Ok(())
}

pub async fn remove(client: &ApiClient, item_id: &str) -> Result<(), ApiError> {
    let path = format!("/media/watchlist/{}", segment(item_id));
    let _: serde_json::Value = client.delete_json::<(), _>(&path, None).await?;
    Ok(())
}

pub async fn stats(client: &ApiClient) -> Result<WatchlistStats, ApiError> {
    let response: Envelope<WatchlistStats> = client.get_json("/media/watchlist/stats", &[]).await?;
    response.into_data("watchlist stats")
}
