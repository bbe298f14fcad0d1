use serde_json::Value;

use crate::error::AppError;

/// Unwrap `data.children[].data` from a Listing envelope.
///
/// The order of the returned sequence is exactly the order upstream sent it;
/// nothing is re-sorted.
pub fn extract_children(listing: &Value) -> Result<Vec<Value>, AppError> {
    let children = listing
        .get("data")
        .and_then(|data| data.get("children"))
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::Validation("upstream body is not a listing".into()))?;

    children
        .iter()
        .map(|child| {
            child
                .get("data")
                .cloned()
                .ok_or_else(|| AppError::Validation("listing child without data".into()))
        })
        .collect()
}

/// Extract the comment objects from a permalink lookup.
///
/// A permalink lookup returns `[post listing, comment listing]`. Each comment
/// document gets a `post_id` back-reference to the originating post.
pub fn extract_comments(body: &Value, post_id: &str) -> Result<Vec<Value>, AppError> {
    let listings = body
        .as_array()
        .ok_or_else(|| AppError::Validation("comment lookup did not return listings".into()))?;

    let comment_listing = listings
        .get(1)
        .ok_or_else(|| AppError::Validation("comment lookup missing comment listing".into()))?;

    let mut comments = extract_children(comment_listing)?;
    for comment in &mut comments {
        if let Some(map) = comment.as_object_mut() {
            map.insert("post_id".to_string(), Value::String(post_id.to_string()));
        }
    }

    Ok(comments)
}

/// Normalize a permalink path: strip surrounding slashes, reject empty input.
pub fn normalize_permalink(raw: &str) -> Result<&str, AppError> {
    let trimmed = raw.trim_matches('/');
    if trimmed.is_empty() {
        return Err(AppError::Validation("empty permalink".into()));
    }
    Ok(trimmed)
}
