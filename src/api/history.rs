use axum::extract::State;
use axum::Json;

use crate::db::models::{DeleteAck, HistoryDeleteRequest};
use crate::error::AppError;
use crate::state::AppState;

/// `DELETE /reddit/search/history`
///
/// Accepts either a drop-the-whole-collection flag or an explicit id set;
/// the acknowledgment reflects which path executed.
pub async fn delete_history_handler(
    State(state): State<AppState>,
    Json(request): Json<HistoryDeleteRequest>,
) -> Result<Json<DeleteAck>, AppError> {
    let ack = state.archive.delete_history(request).await?;
    Ok(Json(ack))
}
