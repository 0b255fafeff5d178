use super::segment;
use crate::error::ApiError;
use crate::http::{ApiClient, Envelope};
use cinetime_models::{EpisodeStatistics, EpisodeStatusUpdate, ShowEpisodes};
use tracing::{debug, info};

/// Episodes stored for a show, optionally restricted to one season
pub async fn show_episodes(client: &ApiClient, tmdb_id: u64, season: Option<u32>) -> Result<ShowEpisodes, ApiError> {
    let path = format!("/media/tv/{}/episodes", tmdb_id);
    let params: Vec<(&str, String)> = season.map(|s| vec![("season", s.to_string())]).unwrap_or_default();
    let response: Envelope<ShowEpisodes> = client.get_json(&path, &params).await?;
    Ok(response.data.unwrap_or_default())
}

/// Ask the backend to pull a season from the external catalog into its store
pub async fn fetch_season(client: &ApiClient, tmdb_id: u64, season: u32) -> Result<(), ApiError> {
    let path = format!("/media/tv/{}/season/{}/fetch", tmdb_id, season);
    let _: serde_json::Value = client.post_json::<(), _>(&path, None).await?;
    info!(operation = "episodes_fetch_season", tmdb_id, season, "Season pulled from catalog");
    Ok(())
}

pub async fn update_status(client: &ApiClient, episode_id: &str, update: &EpisodeStatusUpdate) -> Result<(), ApiError> {
    let path = format!("/media/episodes/{}/status", segment(episode_id));
    let _: serde_json::Value = client.put_json(&path, update).await?;
    debug!(operation = "episode_status", episode_id, "Episode status updated");
    Ok(())
}

pub async fn statistics(client: &ApiClient) -> Result<EpisodeStatistics, ApiError> {
    let response: Envelope<EpisodeStatistics> = client.get_json("/media/episodes/stats", &[]).await?;
    response.into_data("episode statistics")
}
