//! Integration tests for the observation import flow.
//!
//! Tests cover:
//! - Import from configured providers into the store
//! - Pass-through of the insertion report to the response
//! - Error responses when retrieval fails

use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::json;
use shared::models::Observation;
use shared::providers::{FetchWindow, ObservationProvider, ProviderError, StaticProvider};
use shared::storage::ObservationQuery;
use std::sync::Arc;

use super::common::{get, post, test_app, test_app_with_providers, test_observation};

/// Provider whose fetch always fails, standing in for an unreachable API.
struct UnreachableProvider;

#[async_trait]
impl ObservationProvider for UnreachableProvider {
    fn name(&self) -> &str {
        "unreachable"
    }

    async fn fetch(&self, _window: &FetchWindow) -> Result<Vec<Observation>, ProviderError> {
        Err(ProviderError::Decode("connection refused".to_string()))
    }
}

#[tokio::test]
async fn test_import_then_query_round_trip() {
    let provider = StaticProvider::new(
        "mountainhub",
        vec![
            test_observation("obs-1", 100),
            test_observation("obs-2", 200),
            test_observation("obs-3", 300),
        ],
    );
    let (app, _state) = test_app_with_providers(vec![Arc::new(provider)]);

    // Trigger the import
    let (status, response) = post(app.clone(), "/api/v1/import").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({"inserted": 3}));

    // Query the imported observations back
    let (status, response) = get(app, "/api/v1/observations").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["total_count"], 3);

    let observations = response["observations"].as_array().unwrap();
    assert!(observations.iter().all(|o| o["source"] == "mountainhub"));
}

#[tokio::test]
async fn test_import_consults_providers_in_configured_order() {
    let first = StaticProvider::new("first", vec![test_observation("a", 100)]);
    let second = StaticProvider::new("second", vec![test_observation("b", 50)]);
    let (app, state) = test_app_with_providers(vec![Arc::new(first), Arc::new(second)]);

    let (status, _) = post(app, "/api/v1/import").await;
    assert_eq!(status, StatusCode::OK);

    let result = state
        .observation_store()
        .query(ObservationQuery::new())
        .unwrap();
    let ids: Vec<&str> = result
        .observations
        .iter()
        .map(|o| o.source_id.as_str())
        .collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[tokio::test]
async fn test_import_is_repeatable() {
    let provider = StaticProvider::new("mountainhub", vec![test_observation("obs-1", 100)]);
    let (app, state) = test_app_with_providers(vec![Arc::new(provider)]);

    let (status, response) = post(app.clone(), "/api/v1/import").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["inserted"], 1);

    let (status, response) = post(app, "/api/v1/import").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["inserted"], 1);

    assert_eq!(state.observation_store().count().unwrap(), 2);
}

#[tokio::test]
async fn test_failed_retrieval_returns_502_and_persists_nothing() {
    let (app, state) = test_app_with_providers(vec![Arc::new(UnreachableProvider)]);

    let (status, response) = post(app.clone(), "/api/v1/import").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(response["error"], "retrieval_failed");

    assert_eq!(state.observation_store().count().unwrap(), 0);

    // The failed import leaves the query surface empty
    let (status, response) = get(app, "/api/v1/observations").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["total_count"], 0);
}

#[tokio::test]
async fn test_import_with_no_providers() {
    let (app, _state) = test_app();

    let (status, response) = post(app, "/api/v1/import").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({"inserted": 0}));
}
