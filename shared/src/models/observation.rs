//! Observation data model.
//!
//! Defines the core `Observation` structure for records retrieved from
//! external providers and persisted to storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

/// The category of an observation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationKind {
    /// Snowpack conditions (e.g., depth, stability, avalanche signs).
    Snowpack,
    /// General weather conditions (e.g., temperature, wind, precipitation).
    Weather,
    /// A narrative trip report covering a route or area.
    TripReport,
}

impl std::fmt::Display for ObservationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Snowpack => write!(f, "snowpack"),
            Self::Weather => write!(f, "weather"),
            Self::TripReport => write!(f, "trip_report"),
        }
    }
}

impl std::str::FromStr for ObservationKind {
    type Err = ObservationValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "snowpack" => Ok(Self::Snowpack),
            "weather" => Ok(Self::Weather),
            "trip_report" => Ok(Self::TripReport),
            other => Err(ObservationValidationError::UnknownKind(other.to_string())),
        }
    }
}

impl Default for ObservationKind {
    fn default() -> Self {
        Self::Snowpack
    }
}

/// A single observation record from an external provider.
///
/// Typed fields cover what storage and querying need; anything else a
/// provider returns rides along unmodified in [`Observation::details`].
///
/// # Example
///
/// ```
/// use shared::models::{Observation, ObservationKind};
/// use chrono::Utc;
///
/// let obs = Observation::new("mountainhub", "abc123", ObservationKind::Snowpack, Utc::now())
///     .with_coordinates(46.85, -121.76)
///     .with_elevation(1650.0)
///     .with_description("Wind slab on NE aspects above treeline");
///
/// assert!(obs.validate_observation().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Observation {
    /// Slug of the provider this record came from (e.g., "mountainhub").
    #[validate(length(min = 1, message = "Observation source cannot be empty"))]
    pub source: String,

    /// Provider-unique identifier of the record.
    #[validate(length(min = 1, message = "Observation source_id cannot be empty"))]
    pub source_id: String,

    /// The category of the observation.
    pub kind: ObservationKind,

    /// When the condition was observed.
    pub observed_at: DateTime<Utc>,

    /// Latitude in degrees, in [-90, 90].
    pub latitude: f64,

    /// Longitude in degrees, in [-180, 180].
    pub longitude: f64,

    /// Elevation in meters above sea level, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation_m: Option<f64>,

    /// Display name of the reporter, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Free-text report body, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The raw provider payload for this record, carried unmodified.
    #[serde(default)]
    pub details: serde_json::Value,
}

/// Errors that can occur during observation validation.
#[derive(Debug, Error)]
pub enum ObservationValidationError {
    /// The source slug is empty.
    #[error("Observation source cannot be empty")]
    EmptySource,

    /// The provider-unique id is empty.
    #[error("Observation source_id cannot be empty")]
    EmptySourceId,

    /// Latitude outside [-90, 90].
    #[error("Latitude {0} is out of range [-90, 90]")]
    LatitudeOutOfRange(f64),

    /// Longitude outside [-180, 180].
    #[error("Longitude {0} is out of range [-180, 180]")]
    LongitudeOutOfRange(f64),

    /// Unrecognized observation kind string.
    #[error("Unknown observation kind: '{0}'")]
    UnknownKind(String),

    /// Validation failed with details.
    #[error("Validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
}

impl Observation {
    /// Creates a new observation at coordinates (0, 0).
    ///
    /// # Arguments
    ///
    /// * `source` - The provider slug
    /// * `source_id` - The provider-unique record id
    /// * `kind` - The observation category
    /// * `observed_at` - When the condition was observed
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        source_id: impl Into<String>,
        kind: ObservationKind,
        observed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            source: source.into(),
            source_id: source_id.into(),
            kind,
            observed_at,
            latitude: 0.0,
            longitude: 0.0,
            elevation_m: None,
            author: None,
            description: None,
            details: serde_json::Value::Null,
        }
    }

    /// Sets the coordinates of the observation.
    #[must_use]
    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }

    /// Sets the elevation in meters.
    #[must_use]
    pub fn with_elevation(mut self, elevation_m: f64) -> Self {
        self.elevation_m = Some(elevation_m);
        self
    }

    /// Sets the reporter's display name.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Sets the free-text description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attaches the raw provider payload.
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }

    /// Validates the observation.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The source or `source_id` is empty
    /// - Coordinates fall outside valid ranges
    pub fn validate_observation(&self) -> Result<(), ObservationValidationError> {
        if self.source.is_empty() {
            return Err(ObservationValidationError::EmptySource);
        }
        if self.source_id.is_empty() {
            return Err(ObservationValidationError::EmptySourceId);
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ObservationValidationError::LatitudeOutOfRange(
                self.latitude,
            ));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ObservationValidationError::LongitudeOutOfRange(
                self.longitude,
            ));
        }

        self.validate()?;
        Ok(())
    }
}
