use async_trait::async_trait;
use serde_json::Value;

use crate::config::Config;
use crate::error::AppError;

/// Read queries against the Reddit API.
///
/// Abstracted as a trait so handlers can be tested against a stub upstream.
#[async_trait]
pub trait RedditApi: Send + Sync {
    /// Profile info for the authenticated account.
    async fn me(&self) -> Result<Value, AppError>;

    /// Account search, sorted by relevance.
    async fn search_users(&self, query: &str) -> Result<Value, AppError>;

    /// Community search, sorted by relevance.
    async fn search_subreddits(&self, query: &str) -> Result<Value, AppError>;

    /// Public post search, sorted by newest first. Does not require a token.
    async fn search_posts(&self, query: &str) -> Result<Value, AppError>;

    /// Comment tree for a post permalink. Does not require a token.
    async fn comments(&self, permalink: &str) -> Result<Value, AppError>;
}

/// Build the shared outbound HTTP client.
///
/// The client carries the mandated user agent on every request and, when a
/// forward proxy is configured, routes all traffic through it.
pub fn build_http_client(config: &Config) -> Result<reqwest::Client, AppError> {
    let mut builder = reqwest::Client::builder().user_agent(config.user_agent());

    if let Some(proxy) = &config.proxy {
        let proxy = reqwest::Proxy::all(proxy.url())
            .map_err(|e| AppError::Config(format!("invalid proxy target: {e}")))?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| AppError::Config(format!("failed to build HTTP client: {e}")))
}

/// Reqwest-backed implementation of [`RedditApi`].
///
/// Each method issues exactly one request; no retries, no caching. A non-200
/// status becomes [`AppError::UpstreamStatus`] carrying the response body.
pub struct RedditHttpClient {
    http: reqwest::Client,
    oauth_url: String,
    base_url: String,
    access_token: String,
    user_search_limit: u32,
    subreddit_search_limit: u32,
    post_search_limit: u32,
}

impl RedditHttpClient {
    pub fn new(http: reqwest::Client, config: &Config, access_token: String) -> Self {
        Self {
            http,
            oauth_url: config.reddit_oauth_url.trim_end_matches('/').to_string(),
            base_url: config.reddit_base_url.trim_end_matches('/').to_string(),
            access_token,
            user_search_limit: config.user_search_limit,
            subreddit_search_limit: config.subreddit_search_limit,
            post_search_limit: config.post_search_limit,
        }
    }

    async fn get_json(
        &self,
        url: String,
        query: &[(&str, String)],
        bearer: bool,
    ) -> Result<Value, AppError> {
        let mut request = self.http.get(&url).query(query);
        if bearer {
            request = request.bearer_auth(&self.access_token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Transport(format!("malformed body from {url}: {e}")))
    }
}

#[async_trait]
impl RedditApi for RedditHttpClient {
    async fn me(&self) -> Result<Value, AppError> {
        self.get_json(format!("{}/api/v1/me", self.oauth_url), &[], true)
            .await
    }

    async fn search_users(&self, query: &str) -> Result<Value, AppError> {
        self.get_json(
            format!("{}/users/search", self.oauth_url),
            &[
                ("q", query.to_string()),
                ("limit", self.user_search_limit.to_string()),
                ("sort", "relevance".to_string()),
            ],
            true,
        )
        .await
    }

    async fn search_subreddits(&self, query: &str) -> Result<Value, AppError> {
        self.get_json(
            format!("{}/subreddits/search", self.oauth_url),
            &[
                ("q", query.to_string()),
                ("limit", self.subreddit_search_limit.to_string()),
                ("sort", "relevance".to_string()),
            ],
            true,
        )
        .await
    }

    async fn search_posts(&self, query: &str) -> Result<Value, AppError> {
        self.get_json(
            format!("{}/search.json", self.base_url),
            &[
                ("q", query.to_string()),
                ("limit", self.post_search_limit.to_string()),
                ("sort", "new".to_string()),
            ],
            false,
        )
        .await
    }

    async fn comments(&self, permalink: &str) -> Result<Value, AppError> {
        self.get_json(
            format!("{}/{}.json", self.base_url, permalink.trim_matches('/')),
            &[("raw_json", "1".to_string())],
            false,
        )
        .await
    }
}
