use std::fmt::Display;
use std::str::FromStr;

use url::Url;

use crate::error::AppError;

/// Forward proxy target for outbound Reddit calls.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub protocol: String,
    pub host: String,
    pub port: u16,
}

impl ProxyConfig {
    /// The proxy target as a URL string usable by the HTTP client.
    pub fn url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }
}

/// Gateway configuration read from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Public API base (token endpoint, unauthenticated search).
    pub reddit_base_url: String,
    /// OAuth API base (bearer-scoped endpoints).
    pub reddit_oauth_url: String,
    pub app_id: String,
    pub app_secret: String,
    pub username: String,
    pub password: String,
    pub app_name: String,
    pub user_search_limit: u32,
    pub subreddit_search_limit: u32,
    pub post_search_limit: u32,
    /// When absent, outbound requests go direct.
    pub proxy: Option<ProxyConfig>,
    pub mongodb_uri: String,
    pub mongodb_db_name: String,
    pub port: u16,
}

impl Config {
    /// Build the config from environment variables.
    ///
    /// Required env vars:
    /// - `REDDIT_APP_ID` / `REDDIT_APP_SECRET`
    /// - `REDDIT_USER_NAME` / `REDDIT_PASSWORD`
    /// - `REDDIT_APP_NAME`
    /// - `MONGODB_CONNECTION_STRING` / `MONGODB_DB_NAME`
    ///
    /// Setting `PROXY` enables the forward proxy and makes
    /// `PROXY_PROTOCOL`, `PROXY_HOST` and `PROXY_PORT` required too.
    pub fn from_env() -> Result<Self, AppError> {
        let proxy = match std::env::var("PROXY") {
            Ok(_) => Some(ProxyConfig {
                protocol: required("PROXY_PROTOCOL")?,
                host: required("PROXY_HOST")?,
                port: parsed_required("PROXY_PORT")?,
            }),
            Err(_) => None,
        };

        if let Some(proxy) = &proxy {
            Url::parse(&proxy.url()).map_err(|e| {
                AppError::Config(format!("invalid proxy target '{}': {e}", proxy.url()))
            })?;
        }

        Ok(Self {
            reddit_base_url: with_default("REDDIT_BASE_URL", "https://www.reddit.com"),
            reddit_oauth_url: with_default("REDDIT_OAUTH_URL", "https://oauth.reddit.com"),
            app_id: required("REDDIT_APP_ID")?,
            app_secret: required("REDDIT_APP_SECRET")?,
            username: required("REDDIT_USER_NAME")?,
            password: required("REDDIT_PASSWORD")?,
            app_name: required("REDDIT_APP_NAME")?,
            user_search_limit: parsed_with_default("REDDIT_USER_SEARCH_LIMIT", 150)?,
            subreddit_search_limit: parsed_with_default("REDDIT_SUBREDDIT_SEARCH_LIMIT", 300)?,
            post_search_limit: parsed_with_default("REDDIT_POST_SEARCH_LIMIT", 300)?,
            proxy,
            mongodb_uri: required("MONGODB_CONNECTION_STRING")?,
            mongodb_db_name: required("MONGODB_DB_NAME")?,
            port: parsed_with_default("APPLICATION_PORT", 3122)?,
        })
    }

    /// The identification string Reddit requires on every outbound call.
    pub fn user_agent(&self) -> String {
        format!("{} by {}", self.app_name, self.username)
    }
}

fn required(key: &str) -> Result<String, AppError> {
    std::env::var(key).map_err(|_| AppError::Config(format!("{key} not set")))
}

fn with_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parsed_required<T: FromStr>(key: &str) -> Result<T, AppError>
where
    T::Err: Display,
{
    required(key)?
        .parse()
        .map_err(|e| AppError::Config(format!("invalid {key}: {e}")))
}

fn parsed_with_default<T: FromStr>(key: &str, default: T) -> Result<T, AppError>
where
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| AppError::Config(format!("invalid {key}: {e}"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> Config {
        Config {
            reddit_base_url: "https://www.reddit.com".to_string(),
            reddit_oauth_url: "https://oauth.reddit.com".to_string(),
            app_id: "app-id".to_string(),
            app_secret: "app-secret".to_string(),
            username: "archiver".to_string(),
            password: "hunter2".to_string(),
            app_name: "snoovault".to_string(),
            user_search_limit: 150,
            subreddit_search_limit: 300,
            post_search_limit: 300,
            proxy: None,
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            mongodb_db_name: "snoovault".to_string(),
            port: 3122,
        }
    }

    #[test]
    fn user_agent_combines_app_and_account() {
        let config = sample_config();
        assert_eq!(config.user_agent(), "snoovault by archiver");
    }

    #[test]
    fn proxy_url_composes_target() {
        let proxy = ProxyConfig {
            protocol: "http".to_string(),
            host: "10.0.0.7".to_string(),
            port: 8080,
        };
        assert_eq!(proxy.url(), "http://10.0.0.7:8080");
    }
}
