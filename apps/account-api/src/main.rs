//! # Stockbook Account API
//!
//! Standalone HTTP service exposing the account-deletion endpoint. It is
//! deliberately tiny: one route, bearer-token auth, gateway-backed purge.
//! Runs separately from the dashboard so a user can always delete their
//! data, even when the app itself is broken or retired.

mod auth;
mod config;
mod deleter;
mod routes;

use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stockbook_store::{SqliteConfig, SqliteStore};

use crate::config::ApiConfig;
use crate::deleter::StoreDeleter;
use crate::routes::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockbook_account_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env()?;

    let store = SqliteStore::connect(SqliteConfig::new(&config.database_path)).await?;
    let state = Arc::new(AppState {
        deleter: Arc::new(StoreDeleter::new(Arc::new(store))),
        jwt_secret: config.jwt_secret.clone(),
    });

    let app = routes::router(state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!(port = %config.port, "Account API listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
