use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::error::AppError;
use crate::state::AppState;

/// One page of archived documents. An empty collection yields an empty page,
/// not an error.
#[derive(Debug, Serialize)]
pub struct PageResponse {
    pub result: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub result: u64,
}

#[derive(Debug, Serialize)]
pub struct CollectionsResponse {
    pub result: Vec<String>,
}

/// Resolve pagination parameters. Zero means "absent" and falls back to the
/// defaults page=1, limit=10.
fn resolve_page(page: u64, limit: u64) -> (u64, u64) {
    let page = if page == 0 { 1 } else { page };
    let limit = if limit == 0 { 10 } else { limit };
    (page, limit)
}

/// `GET /api/db/collections/{collection}/{page}/{limit}`
pub async fn page_handler(
    State(state): State<AppState>,
    Path((collection, page, limit)): Path<(String, u64, u64)>,
) -> Result<Json<PageResponse>, AppError> {
    let (page, limit) = resolve_page(page, limit);
    let result = state.archive.find_page(&collection, page, limit).await?;
    Ok(Json(PageResponse { result }))
}

/// `GET /api/db/collections/count/{collection}`
pub async fn count_handler(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> Result<Json<CountResponse>, AppError> {
    let result = state.archive.count(&collection).await?;
    Ok(Json(CountResponse { result }))
}

/// `GET /api/db/list/collections`
pub async fn list_handler(
    State(state): State<AppState>,
) -> Result<Json<CollectionsResponse>, AppError> {
    let result = state.archive.list_collections().await?;
    Ok(Json(CollectionsResponse { result }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_page_passes_explicit_values() {
        assert_eq!(resolve_page(3, 25), (3, 25));
    }

    #[test]
    fn resolve_page_defaults_zero_page() {
        assert_eq!(resolve_page(0, 25), (1, 25));
    }

    #[test]
    fn resolve_page_defaults_zero_limit() {
        assert_eq!(resolve_page(2, 0), (2, 10));
    }

    #[test]
    fn resolve_page_defaults_both() {
        assert_eq!(resolve_page(0, 0), (1, 10));
    }
}
