//! Integration tests for the observations query endpoint.

use axum::http::StatusCode;
use shared::models::ObservationKind;

use super::common::{get, test_app, test_observation};

#[tokio::test]
async fn test_empty_store_returns_empty_result() {
    let (app, _state) = test_app();

    let (status, response) = get(app, "/api/v1/observations").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["total_count"], 0);
    assert!(response["observations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_filter_by_source_and_kind() {
    let (app, state) = test_app();

    let mut trip = test_observation("obs-2", 200);
    trip.kind = ObservationKind::TripReport;

    let mut foreign = test_observation("obs-3", 300);
    foreign.source = "nwac".to_string();

    state
        .observation_store()
        .insert_batch(vec![test_observation("obs-1", 100), trip, foreign])
        .unwrap();

    let (status, response) = get(app.clone(), "/api/v1/observations?source=mountainhub").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["total_count"], 2);

    let (status, response) = get(app.clone(), "/api/v1/observations?kind=trip_report").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["total_count"], 1);
    assert_eq!(response["observations"][0]["source_id"], "obs-2");

    let (status, response) = get(app, "/api/v1/observations?source=nwac&kind=snowpack").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["total_count"], 1);
    assert_eq!(response["observations"][0]["source_id"], "obs-3");
}

#[tokio::test]
async fn test_pagination() {
    let (app, state) = test_app();

    let observations = (0..5)
        .map(|i| test_observation(&format!("obs-{i}"), i * 100))
        .collect();
    state.observation_store().insert_batch(observations).unwrap();

    let (status, response) = get(app.clone(), "/api/v1/observations?limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["total_count"], 5);
    let first_page = response["observations"].as_array().unwrap();
    assert_eq!(first_page.len(), 2);
    assert_eq!(first_page[0]["source_id"], "obs-0");
    assert_eq!(first_page[1]["source_id"], "obs-1");

    let (status, response) = get(app, "/api/v1/observations?limit=2&offset=2").await;
    assert_eq!(status, StatusCode::OK);
    let second_page = response["observations"].as_array().unwrap();
    assert_eq!(second_page[0]["source_id"], "obs-2");
    assert_eq!(second_page[1]["source_id"], "obs-3");
}

#[tokio::test]
async fn test_unknown_kind_returns_400() {
    let (app, _state) = test_app();

    let (status, response) = get(app, "/api/v1/observations?kind=glacier").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "invalid_kind");
}

#[tokio::test]
async fn test_observation_fields_survive_round_trip() {
    let (app, state) = test_app();

    let obs = test_observation("obs-1", 100)
        .with_elevation(1650.0)
        .with_author("A. Ranger")
        .with_description("Wind slab on NE aspects")
        .with_details(serde_json::json!({"snow_depth": "120cm"}));

    state.observation_store().insert(obs).unwrap();

    let (status, response) = get(app, "/api/v1/observations").await;
    assert_eq!(status, StatusCode::OK);

    let stored = &response["observations"][0];
    assert_eq!(stored["source_id"], "obs-1");
    assert_eq!(stored["elevation_m"], 1650.0);
    assert_eq!(stored["author"], "A. Ranger");
    assert_eq!(stored["description"], "Wind slab on NE aspects");
    assert_eq!(stored["details"]["snow_depth"], "120cm");
}
