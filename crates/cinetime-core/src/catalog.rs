use cinetime_client::{ApiError, CatalogApi, MediaDetails, TimeWindow};
use cinetime_models::{MediaFilter, MediaKind, SearchResult};
use tracing::debug;

pub use crate::assistant::filter_results as filter_by_kind;

pub async fn trending<A: CatalogApi + ?Sized>(api: &A, page: u32) -> Result<Vec<SearchResult>, ApiError> {
    api.trending(page, TimeWindow::default()).await
}

pub async fn popular<A: CatalogApi + ?Sized>(api: &A, page: u32) -> Result<Vec<SearchResult>, ApiError> {
    api.popular(page).await
}

/// Blank queries clear the results without a request
pub async fn search<A: CatalogApi + ?Sized>(api: &A, query: &str, page: u32) -> Result<Vec<SearchResult>, ApiError> {
    let query = query.trim();
    if query.is_empty() {
        debug!(operation = "catalog_search", "Blank query, nothing to search");
        return Ok(Vec::new());
    }
    api.search(query, page).await
}

pub async fn details<A: CatalogApi + ?Sized>(api: &A, kind: MediaKind, tmdb_id: u64) -> Result<MediaDetails, ApiError> {
    api.details(kind, tmdb_id).await
}

/// Trending titles narrowed to one kind
pub async fn trending_of_kind<A: CatalogApi + ?Sized>(
    api: &A,
    page: u32,
    filter: MediaFilter,
) -> Result<Vec<SearchResult>, ApiError> {
    Ok(filter_by_kind(&trending(api, page).await?, filter))
}
