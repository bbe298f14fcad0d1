use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::AppError;

/// Converts AppError into the gateway's JSON error envelope.
///
/// Unmatched routes map to 404, enforced parameter validation to 400, and
/// everything else — upstream failures included — to 500. The caller is not
/// told whether Reddit or the store failed beyond the message text.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Transport(_)
            | AppError::UpstreamAuth(_)
            | AppError::UpstreamStatus { .. }
            | AppError::StoreConnection(_)
            | AppError::StoreOperation(_)
            | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({ "error": self.to_string() });

        (status, axum::Json(body)).into_response()
    }
}
