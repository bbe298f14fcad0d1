use std::sync::Arc;

use crate::db::archive::ArchiveStore;
use crate::reddit::client::RedditApi;

/// Shared application state, created once at startup and injected into every
/// handler. Both handles are read-only after construction, so no
/// synchronization beyond `Arc` sharing is needed.
#[derive(Clone)]
pub struct AppState {
    pub reddit: Arc<dyn RedditApi>,
    pub archive: Arc<dyn ArchiveStore>,
}
