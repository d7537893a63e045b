//! Obsync API Server
//!
//! This crate provides the HTTP server for the Obsync observation-import
//! service. It hosts the import trigger, a query surface over stored
//! observations, and a health endpoint.
//!
//! # Architecture
//!
//! The API server is built on Axum and Tokio:
//! - `POST /api/v1/import` fetches from the configured providers and
//!   persists the aggregated batch
//! - `GET /api/v1/observations` queries persisted observations
//! - `GET /health` for load balancers
//!
//! # Example
//!
//! ```no_run
//! use api::run_server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     run_server().await
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod config;
pub mod db;
mod routes;
mod state;

pub use config::{Config, StoreBackend};
pub use state::AppState;

use anyhow::Result;
use axum::Router;
use shared::providers::{MountainHubProvider, ObservationProvider};
use shared::storage::{ClickHouseObservationStore, InMemoryObservationStore, ObservationStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Runs the Obsync API server.
///
/// This function initializes the server with configuration from environment
/// variables and starts listening for incoming connections. It handles
/// graceful shutdown on SIGTERM/SIGINT signals.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration cannot be loaded from environment
/// - The server fails to bind to the configured address
/// - A fatal error occurs during operation
pub async fn run_server() -> Result<()> {
    let config = Config::from_env()?;
    run_server_with_config(config).await
}

/// Runs the Obsync API server with the provided configuration.
///
/// This is useful for testing or when you want to provide configuration
/// programmatically.
///
/// # Errors
///
/// Returns an error if:
/// - The server fails to bind to the configured address
/// - A fatal error occurs during operation
pub async fn run_server_with_config(config: Config) -> Result<()> {
    let addr = config.socket_addr();

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Obsync API server starting"
    );

    let state = build_state(&config)?;
    let app = create_router(state);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(%addr, "Listening for connections");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Builds the application state from configuration.
///
/// Providers are constructed here, once, and injected into the state;
/// handlers never reach for a global provider list.
fn build_state(config: &Config) -> Result<AppState> {
    let providers: Vec<Arc<dyn ObservationProvider>> = vec![Arc::new(
        MountainHubProvider::with_base_url(&config.mountainhub_url),
    )];

    let store: Arc<dyn ObservationStore> = match config.store {
        StoreBackend::Memory => Arc::new(InMemoryObservationStore::new()),
        StoreBackend::ClickHouse => {
            let db_config = db::DatabaseConfig::from_env()?;
            let database = db::Database::new(&db_config);
            Arc::new(ClickHouseObservationStore::new(database.client()))
        }
    };

    Ok(AppState::new(store, providers))
}

/// Creates the main application router with all routes and middleware.
///
/// This function is public to allow testing the router without starting
/// a full server.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .merge(routes::import_routes(state.clone()))
        .merge(routes::observations_routes(state))
        .layer(TraceLayer::new_for_http())
}

/// Waits for a shutdown signal (SIGTERM or SIGINT).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
