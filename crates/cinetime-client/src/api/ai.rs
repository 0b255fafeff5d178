use super::media::{normalize_all, RawCatalogEntry};
use crate::error::ApiError;
use crate::http::{ApiClient, Envelope};
use cinetime_models::{MediaFilter, RecommendationResponse, SearchResult};
use serde_json::json;
use tracing::debug;

pub async fn chat(client: &ApiClient, message: &str) -> Result<RecommendationResponse, ApiError> {
    let body = json!({ "message": message });
    let response: RecommendationResponse = client.post_json("/ai/chat", Some(&body)).await?;
    debug!(operation = "ai_chat", candidates = response.data.len(), "Assistant answered");
    Ok(response)
}

/// Catalog search driven by assistant keywords. Keywords are sent as given,
/// duplicates included.
pub async fn search(client: &ApiClient, keywords: &[String], scope: MediaFilter) -> Result<Vec<SearchResult>, ApiError> {
    let body = json!({ "keywords": keywords, "type": scope.as_str() });
    let response: Envelope<Vec<RawCatalogEntry>> = client.post_json("/ai/search", Some(&body)).await?;
    let results = normalize_all(response.data.unwrap_or_default(), None);
    debug!(operation = "ai_search", keywords = keywords.len(), scope = %scope, count = results.len(), "Assistant search completed");
    Ok(results)
}
