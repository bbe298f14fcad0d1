use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::db::archive::ArchiveStore;
use crate::db::models::{InsertAck, SearchHistoryEntry};
use crate::error::AppError;
use crate::reddit::client::RedditApi;
use crate::reddit::listing;
use crate::state::AppState;

/// Envelope returned by every write-through route.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveResponse {
    pub db_result: InsertAck,
    pub body: Value,
}

/// Post-search envelope, which additionally carries the ledger write.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSearchResponse {
    pub db_result: InsertAck,
    pub body: Value,
    pub search_history_insertion_result: InsertAck,
}

/// Core logic for `GET /reddit/me/info` — fetch profile info, archive the
/// whole body into `admin`.
pub async fn process_me(
    reddit: &dyn RedditApi,
    archive: &dyn ArchiveStore,
) -> Result<ArchiveResponse, AppError> {
    let body = reddit.me().await?;
    let db_result = archive.insert_one("admin", body.clone()).await?;

    Ok(ArchiveResponse { db_result, body })
}

/// Core logic for `GET /reddit/search/user/{user}`.
pub async fn process_user_search(
    reddit: &dyn RedditApi,
    archive: &dyn ArchiveStore,
    user: &str,
) -> Result<ArchiveResponse, AppError> {
    let response = reddit.search_users(user).await?;
    let users = listing::extract_children(&response)?;
    let db_result = archive.insert_many("users", users.clone()).await?;

    Ok(ArchiveResponse {
        db_result,
        body: Value::Array(users),
    })
}

/// Core logic for `GET /reddit/search/{search_term}`.
pub async fn process_subreddit_search(
    reddit: &dyn RedditApi,
    archive: &dyn ArchiveStore,
    search_term: &str,
) -> Result<ArchiveResponse, AppError> {
    let response = reddit.search_subreddits(search_term).await?;
    let subreddits = listing::extract_children(&response)?;
    let db_result = archive.insert_many("searches", subreddits.clone()).await?;

    Ok(ArchiveResponse {
        db_result,
        body: Value::Array(subreddits),
    })
}

/// Core logic for `GET /reddit/search/posts/{search_term}`.
///
/// Besides archiving the posts, appends one entry to the search-history
/// ledger recording the term, the item count and the generated ids.
pub async fn process_post_search(
    reddit: &dyn RedditApi,
    archive: &dyn ArchiveStore,
    search_term: &str,
) -> Result<PostSearchResponse, AppError> {
    let response = reddit.search_posts(search_term).await?;
    let posts = listing::extract_children(&response)?;
    let db_result = archive.insert_many("posts", posts.clone()).await?;

    let entry = SearchHistoryEntry {
        term: search_term.to_string(),
        created_at: Utc::now(),
        result: posts.len() as u64,
        document_ids: db_result.inserted_ids.clone(),
    };
    let search_history_insertion_result = archive.record_search(entry).await?;

    Ok(PostSearchResponse {
        db_result,
        body: Value::Array(posts),
        search_history_insertion_result,
    })
}

/// Core logic for `GET /reddit/search/comments/{post_id}/{*permalink}`.
///
/// Each archived comment carries a `post_id` back-reference to the
/// originating post.
pub async fn process_comments(
    reddit: &dyn RedditApi,
    archive: &dyn ArchiveStore,
    post_id: &str,
    permalink: &str,
) -> Result<ArchiveResponse, AppError> {
    let permalink = listing::normalize_permalink(permalink)?;
    let response = reddit.comments(permalink).await?;
    let comments = listing::extract_comments(&response, post_id)?;
    let db_result = archive.insert_many("comments", comments.clone()).await?;

    Ok(ArchiveResponse {
        db_result,
        body: Value::Array(comments),
    })
}

pub async fn me_handler(State(state): State<AppState>) -> Result<Json<ArchiveResponse>, AppError> {
    let response = process_me(state.reddit.as_ref(), state.archive.as_ref()).await?;
    Ok(Json(response))
}

pub async fn user_search_handler(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Json<ArchiveResponse>, AppError> {
    let response =
        process_user_search(state.reddit.as_ref(), state.archive.as_ref(), &user).await?;
    Ok(Json(response))
}

pub async fn subreddit_search_handler(
    State(state): State<AppState>,
    Path(search_term): Path<String>,
) -> Result<Json<ArchiveResponse>, AppError> {
    let response =
        process_subreddit_search(state.reddit.as_ref(), state.archive.as_ref(), &search_term)
            .await?;
    Ok(Json(response))
}

pub async fn post_search_handler(
    State(state): State<AppState>,
    Path(search_term): Path<String>,
) -> Result<Json<PostSearchResponse>, AppError> {
    let response =
        process_post_search(state.reddit.as_ref(), state.archive.as_ref(), &search_term).await?;
    Ok(Json(response))
}

pub async fn comments_handler(
    State(state): State<AppState>,
    Path((post_id, permalink)): Path<(String, String)>,
) -> Result<Json<ArchiveResponse>, AppError> {
    let response = process_comments(
        state.reddit.as_ref(),
        state.archive.as_ref(),
        &post_id,
        &permalink,
    )
    .await?;
    Ok(Json(response))
}
