use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use serde_json::{json, Value};
use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::mongo::Mongo;

use snoovault::api::router::router;
use snoovault::db::archive::{ArchiveStore, MongoArchiveStore};
use snoovault::error::AppError;
use snoovault::reddit::client::RedditApi;
use snoovault::state::AppState;

/// Build a Listing envelope with `n` children, ids `{prefix}0..{prefix}n`.
pub fn listing_with_children(n: usize, prefix: &str) -> Value {
    json!({
        "kind": "Listing",
        "data": {
            "children": (0..n)
                .map(|i| json!({
                    "kind": "t3",
                    "data": { "id": format!("{prefix}{i}"), "title": format!("item {i}") }
                }))
                .collect::<Vec<_>>()
        }
    })
}

/// Canned Reddit upstream: every search answers with three children.
pub struct StubReddit;

#[async_trait]
impl RedditApi for StubReddit {
    async fn me(&self) -> Result<Value, AppError> {
        Ok(json!({ "name": "archiver", "link_karma": 42 }))
    }

    async fn search_users(&self, _query: &str) -> Result<Value, AppError> {
        Ok(listing_with_children(3, "user"))
    }

    async fn search_subreddits(&self, _query: &str) -> Result<Value, AppError> {
        Ok(listing_with_children(3, "sub"))
    }

    async fn search_posts(&self, _query: &str) -> Result<Value, AppError> {
        Ok(listing_with_children(3, "post"))
    }

    async fn comments(&self, _permalink: &str) -> Result<Value, AppError> {
        Ok(json!([
            listing_with_children(1, "post"),
            listing_with_children(2, "comment"),
        ]))
    }
}

/// Upstream that answers every call with a non-200 status.
pub struct FailingReddit;

#[async_trait]
impl RedditApi for FailingReddit {
    async fn me(&self) -> Result<Value, AppError> {
        Err(AppError::UpstreamStatus {
            status: 502,
            body: "bad gateway".into(),
        })
    }

    async fn search_users(&self, _query: &str) -> Result<Value, AppError> {
        self.me().await
    }

    async fn search_subreddits(&self, _query: &str) -> Result<Value, AppError> {
        self.me().await
    }

    async fn search_posts(&self, _query: &str) -> Result<Value, AppError> {
        self.me().await
    }

    async fn comments(&self, _permalink: &str) -> Result<Value, AppError> {
        self.me().await
    }
}

/// Holds the running MongoDB container and the wired router.
///
/// The container stays alive for as long as this struct lives and is cleaned
/// up automatically on drop. Each environment gets its own database so tests
/// can run in parallel against one image.
pub struct TestEnv {
    _mongo: ContainerAsync<Mongo>,
    pub db: mongodb::Database,
    pub archive: Arc<dyn ArchiveStore>,
    pub router: Router,
}

impl TestEnv {
    /// Start MongoDB and wire the router against the canned upstream.
    pub async fn start() -> Self {
        Self::start_with(Arc::new(StubReddit)).await
    }

    /// Start MongoDB and wire the router against the given upstream.
    pub async fn start_with(reddit: Arc<dyn RedditApi>) -> Self {
        let mongo_container = Mongo::default()
            .start()
            .await
            .expect("Failed to start MongoDB container");

        let mongo_port = mongo_container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");
        let mongo_uri = format!("mongodb://127.0.0.1:{}", mongo_port);

        let mongo_client = mongodb::Client::with_uri_str(&mongo_uri)
            .await
            .expect("Failed to connect to MongoDB");
        let db = mongo_client.database(&format!(
            "snoovault_test_{}",
            uuid::Uuid::new_v4().simple()
        ));

        let archive: Arc<dyn ArchiveStore> = Arc::new(MongoArchiveStore::new(db.clone()));

        let router = router(AppState {
            reddit,
            archive: archive.clone(),
        });

        Self {
            _mongo: mongo_container,
            db,
            archive,
            router,
        }
    }

    /// Build an `axum_test::TestServer` from this environment's router.
    pub fn server(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .expect_success_by_default()
            .build(self.router.clone())
    }

    /// Build a `TestServer` that does NOT expect success by default (for error tests).
    pub fn server_permissive(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .build(self.router.clone())
    }

    /// Count the documents in a collection directly.
    pub async fn count(&self, collection: &str) -> u64 {
        self.db
            .collection::<bson::Document>(collection)
            .count_documents(bson::doc! {})
            .await
            .expect("count failed")
    }
}
