use axum::extract::Request;
use axum::http::{HeaderValue, Uri};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{delete, get};
use axum::{Json, Router};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api::{collections, history, reddit};
use crate::error::AppError;
use crate::state::AppState;

async fn welcome() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "welcome" }))
}

/// Catch-all for unmatched routes; the error mapping turns it into a 404.
async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("no route for {uri}"))
}

/// Stamp how long the request took onto the response.
async fn response_time(request: Request, next: Next) -> Response {
    let started = std::time::Instant::now();
    let mut response = next.run(request).await;

    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    if let Ok(value) = HeaderValue::from_str(&format!("{elapsed_ms:.3}ms")) {
        response.headers_mut().insert("x-response-time", value);
    }

    response
}

/// Build the gateway router with all state injected explicitly.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/reddit/me/info", get(reddit::me_handler))
        .route("/reddit/search/user/{user}", get(reddit::user_search_handler))
        .route(
            "/reddit/search/posts/{search_term}",
            get(reddit::post_search_handler),
        )
        .route(
            "/reddit/search/comments/{post_id}/{*permalink}",
            get(reddit::comments_handler),
        )
        .route(
            "/reddit/search/{search_term}",
            get(reddit::subreddit_search_handler),
        )
        .route(
            "/reddit/search/history",
            delete(history::delete_history_handler),
        )
        .route(
            "/api/db/collections/{collection}/{page}/{limit}",
            get(collections::page_handler),
        )
        .route(
            "/api/db/collections/count/{collection}",
            get(collections::count_handler),
        )
        .route("/api/db/list/collections", get(collections::list_handler))
        .nest_service("/public", ServeDir::new("public"))
        .fallback(not_found)
        .layer(middleware::from_fn(response_time))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
