//! Common test utilities and helpers for integration tests.
//!
//! This module provides shared functionality used across all integration
//! tests, including test app setup and HTTP request helpers.

use api::{create_router, AppState};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use shared::models::{Observation, ObservationKind};
use shared::providers::ObservationProvider;
use shared::storage::InMemoryObservationStore;
use std::sync::Arc;

/// Creates a test router with a fresh in-memory store and no providers.
///
/// # Returns
///
/// A tuple containing the configured router and the app state.
pub fn test_app() -> (Router, AppState) {
    let state = AppState::with_in_memory_store();
    let router = create_router(state.clone());
    (router, state)
}

/// Creates a test router with a fresh in-memory store and the given providers.
pub fn test_app_with_providers(providers: Vec<Arc<dyn ObservationProvider>>) -> (Router, AppState) {
    let state = AppState::new(InMemoryObservationStore::new_shared(), providers);
    let router = create_router(state.clone());
    (router, state)
}

/// Creates an observation suitable for seeding tests.
pub fn test_observation(id: &str, ts: i64) -> Observation {
    Observation::new(
        "mountainhub",
        id,
        ObservationKind::Snowpack,
        Utc.timestamp_opt(ts, 0).unwrap(),
    )
    .with_coordinates(46.85, -121.76)
}

/// Helper to make a POST request with an empty body.
///
/// # Returns
///
/// A tuple containing the response status code and parsed JSON response body.
pub async fn post(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = tower::ServiceExt::oneshot(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();

    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    (status, json)
}

/// Helper to make a GET request.
///
/// # Returns
///
/// A tuple containing the response status code and parsed JSON response body.
pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = tower::ServiceExt::oneshot(
        app,
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();

    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    (status, json)
}
