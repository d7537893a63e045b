//! MountainHub provider client.
//!
//! Fetches observation records from the MountainHub timeline API and
//! converts them into [`Observation`]s. The timeline returns a `results`
//! array where each entry carries an `observation` object with string-encoded
//! numeric fields (`reported_at` as epoch milliseconds, coordinates as
//! decimal strings) and an `actor` object naming the reporter.
//!
//! Records missing an id, a parseable timestamp, or coordinates are
//! skipped with a warning rather than failing the whole batch.

use super::{FetchWindow, ObservationProvider, ProviderError};
use crate::models::{Observation, ObservationKind};
use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;

/// Default base URL of the MountainHub API.
pub const DEFAULT_BASE_URL: &str = "https://api.mountainhub.com";

/// Observation types requested from the timeline.
const OBS_TYPES: &str = "snow_conditions,trip_report";

/// Timeline response envelope.
#[derive(Debug, Deserialize)]
struct TimelineResponse {
    #[serde(default)]
    results: Vec<Value>,
}

/// MountainHub timeline API client.
pub struct MountainHubProvider {
    client: reqwest::Client,
    base_url: String,
}

impl MountainHubProvider {
    /// Creates a new provider against the default MountainHub API.
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a new provider against the given base URL.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for MountainHubProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObservationProvider for MountainHubProvider {
    fn name(&self) -> &str {
        "mountainhub"
    }

    async fn fetch(&self, window: &FetchWindow) -> Result<Vec<Observation>, ProviderError> {
        let mut query: Vec<(&str, String)> = vec![
            ("publisher", "all".to_string()),
            ("obs_type", OBS_TYPES.to_string()),
        ];

        if let Some(limit) = window.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(since) = window.since {
            query.push(("since", since.timestamp_millis().to_string()));
        }
        if let Some(until) = window.until {
            query.push(("until", until.timestamp_millis().to_string()));
        }

        let url = format!("{}/timeline", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("Accept-version", "1")
            .query(&query)
            .send()
            .await?
            .error_for_status()?;

        let timeline: TimelineResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        let total = timeline.results.len();
        let observations: Vec<Observation> = timeline
            .results
            .iter()
            .filter_map(parse_record)
            .collect();

        if observations.len() < total {
            tracing::warn!(
                skipped = total - observations.len(),
                "Skipped malformed MountainHub records"
            );
        }

        Ok(observations)
    }
}

/// Converts one timeline entry into an [`Observation`].
///
/// Returns `None` if the entry lacks an id, a parseable timestamp, or
/// coordinates.
fn parse_record(record: &Value) -> Option<Observation> {
    let obs = record.get("observation")?;

    let id = string_field(obs, "id")?;
    let kind = parse_kind(obs.get("type").and_then(Value::as_str)?)?;
    #[allow(clippy::cast_possible_truncation)]
    let observed_at = obs
        .get("reported_at")
        .and_then(numeric_field)
        .and_then(|millis| DateTime::from_timestamp_millis(millis as i64))?;
    let latitude = obs.get("latitude").and_then(numeric_field)?;
    let longitude = obs.get("longitude").and_then(numeric_field)?;

    let mut observation =
        Observation::new("mountainhub", id, kind, observed_at).with_coordinates(latitude, longitude);

    if let Some(elevation) = obs.get("elevation").and_then(numeric_field) {
        observation = observation.with_elevation(elevation);
    }
    if let Some(author) = record
        .get("actor")
        .and_then(|actor| string_field(actor, "full_name"))
    {
        observation = observation.with_author(author);
    }
    if let Some(description) = string_field(obs, "description") {
        observation = observation.with_description(description);
    }

    Some(observation.with_details(record.clone()))
}

/// Maps a MountainHub observation type to an [`ObservationKind`].
fn parse_kind(obs_type: &str) -> Option<ObservationKind> {
    match obs_type {
        "snow_conditions" | "snowpack_test" => Some(ObservationKind::Snowpack),
        "weather" => Some(ObservationKind::Weather),
        "trip_report" => Some(ObservationKind::TripReport),
        other => {
            tracing::warn!(obs_type = other, "Unknown MountainHub observation type");
            None
        }
    }
}

/// Extracts a non-empty string field.
fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Extracts a numeric field encoded either as a JSON number or a decimal string.
fn numeric_field(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
