use thiserror::Error;

/// Application-wide error types.
///
/// Every failure a request can hit funnels into one of these variants;
/// the HTTP mapping lives in `api::errors`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Network-level failure reaching Reddit or the store (DNS, connect, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The token endpoint answered with a non-200 status.
    #[error("upstream auth rejected: {0}")]
    UpstreamAuth(String),

    /// A Reddit data endpoint answered with a non-200 status.
    #[error("invalid request {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// The store could not be reached at startup.
    #[error("store connection failed: {0}")]
    StoreConnection(String),

    /// A store operation failed while serving a request.
    #[error("store operation failed: {0}")]
    StoreOperation(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed path or body parameters.
    #[error("invalid parameter: {0}")]
    Validation(String),

    /// Missing or malformed environment configuration.
    #[error("configuration error: {0}")]
    Config(String),
}
