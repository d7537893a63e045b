//! Observation import endpoint.
//!
//! `POST /api/v1/import` retrieves observations from the configured
//! providers and persists them, responding with the insertion report.
//! The request carries no parameters; it only triggers the import.
//!
//! Retrieval strictly precedes insertion, and insertion receives exactly
//! the retrieved batch. A retrieval failure aborts the import before
//! anything is persisted and surfaces as `502 Bad Gateway`; a storage
//! failure surfaces as `500 Internal Server Error`.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Serialize;
use shared::providers::{retrieve_observations, FetchWindow};
use shared::storage::InsertReport;

/// Error response for the import endpoint.
#[derive(Debug, Serialize)]
pub struct ImportError {
    /// Error code.
    pub error: String,
    /// Error message.
    pub message: String,
}

/// Creates the import routes with application state.
pub fn import_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/import", post(import_observations))
        .with_state(state)
}

/// Handler for observation import.
///
/// Fetches from every configured provider in order, inserts the
/// aggregated batch, and responds with the [`InsertReport`] unmodified.
async fn import_observations(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<InsertReport>), (StatusCode, Json<ImportError>)> {
    let batch = retrieve_observations(state.providers(), &FetchWindow::new())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to retrieve observations");
            (
                StatusCode::BAD_GATEWAY,
                Json(ImportError {
                    error: "retrieval_failed".to_string(),
                    message: e.to_string(),
                }),
            )
        })?;

    let fetched = batch.len();
    let report = state.observation_store().insert_batch(batch).map_err(|e| {
        tracing::error!(error = %e, "Failed to store observations");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ImportError {
                error: "storage_error".to_string(),
                message: e.to_string(),
            }),
        )
    })?;

    tracing::info!(fetched, inserted = report.inserted, "Import complete");

    Ok((StatusCode::OK, Json(report)))
}
