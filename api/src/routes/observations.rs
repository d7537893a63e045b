//! Observation query endpoint.
//!
//! `GET /api/v1/observations` returns persisted observations with
//! optional source/kind filters and pagination.

use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use shared::models::{Observation, ObservationKind};
use shared::storage::ObservationQuery;

/// Query parameters for observations.
#[derive(Debug, Deserialize)]
pub struct ObservationQueryParams {
    /// Filter by provider slug.
    pub source: Option<String>,
    /// Filter by observation kind (snake_case).
    pub kind: Option<String>,
    /// Maximum number of observations to return (capped at 1000).
    pub limit: Option<usize>,
    /// Number of observations to skip.
    pub offset: Option<usize>,
}

/// Response for observation queries.
#[derive(Debug, Serialize)]
pub struct ObservationQueryResponse {
    /// The observations matching the query.
    pub observations: Vec<Observation>,
    /// Total count of matching observations.
    pub total_count: usize,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ObservationError {
    /// Error code.
    pub error: String,
    /// Error message.
    pub message: String,
}

/// Creates the observations routes.
pub fn observations_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/observations", get(query_observations))
        .with_state(state)
}

async fn query_observations(
    State(state): State<AppState>,
    Query(params): Query<ObservationQueryParams>,
) -> Result<Json<ObservationQueryResponse>, (StatusCode, Json<ObservationError>)> {
    let mut query = ObservationQuery::new();

    if let Some(source) = params.source {
        query = query.with_source(source);
    }
    if let Some(ref kind) = params.kind {
        let kind: ObservationKind = kind.parse().map_err(|_| {
            (
                StatusCode::BAD_REQUEST,
                Json(ObservationError {
                    error: "invalid_kind".to_string(),
                    message: format!("Unknown observation kind: {kind}"),
                }),
            )
        })?;
        query = query.with_kind(kind);
    }
    if let Some(limit) = params.limit {
        query = query.with_limit(limit.min(1000));
    }
    if let Some(offset) = params.offset {
        query = query.with_offset(offset);
    }

    let result = state.observation_store().query(query).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ObservationError {
                error: "storage_error".to_string(),
                message: e.to_string(),
            }),
        )
    })?;

    Ok(Json(ObservationQueryResponse {
        observations: result.observations,
        total_count: result.total_count,
    }))
}
