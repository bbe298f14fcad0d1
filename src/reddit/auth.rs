use serde::Deserialize;

use crate::config::Config;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Obtain a bearer token via the OAuth2 password grant.
///
/// One POST to `{reddit_base_url}/api/v1/access_token` with the app
/// credentials as basic auth and the account credentials as form fields.
/// Called once at startup; the token is never refreshed — if it expires,
/// the process must be restarted.
pub async fn fetch_access_token(
    client: &reqwest::Client,
    config: &Config,
) -> Result<String, AppError> {
    tracing::info!("requesting Reddit access token");

    let url = format!(
        "{}/api/v1/access_token",
        config.reddit_base_url.trim_end_matches('/')
    );

    let params = [
        ("grant_type", "password"),
        ("username", config.username.as_str()),
        ("password", config.password.as_str()),
    ];

    let response = client
        .post(&url)
        .basic_auth(&config.app_id, Some(&config.app_secret))
        .form(&params)
        .send()
        .await
        .map_err(|e| AppError::Transport(format!("token request failed: {e}")))?;

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::UpstreamAuth(format!(
            "token endpoint returned {status}: {body}"
        )));
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| AppError::UpstreamAuth(format!("malformed token response: {e}")))?;

    Ok(token.access_token)
}
