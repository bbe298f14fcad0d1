use std::sync::Arc;

use snoovault::api::router::router;
use snoovault::config::Config;
use snoovault::db::archive::{self, MongoArchiveStore};
use snoovault::error::AppError;
use snoovault::reddit::auth::fetch_access_token;
use snoovault::reddit::client::{build_http_client, RedditHttpClient};
use snoovault::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snoovault=info,tower_http=info".into()),
        )
        .init();

    if let Err(err) = run().await {
        tracing::error!("startup failed: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    tracing::info!("starting snoovault gateway");

    let config = Config::from_env()?;
    let http = build_http_client(&config)?;

    // Store connection and token acquisition run concurrently.
    let (db, access_token) = tokio::try_join!(
        archive::connect(&config.mongodb_uri, &config.mongodb_db_name),
        fetch_access_token(&http, &config),
    )?;

    tracing::info!(database = %config.mongodb_db_name, "connected to MongoDB");
    tracing::info!("acquired Reddit access token");

    let state = AppState {
        reddit: Arc::new(RedditHttpClient::new(http, &config, access_token)),
        archive: Arc::new(MongoArchiveStore::new(db)),
    };

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("cannot bind {addr}: {e}")))?;

    tracing::info!("listening on http://{addr}");
    axum::serve(listener, router(state).into_make_service())
        .await
        .map_err(|e| AppError::Transport(e.to_string()))
}
