//! Data models for the Obsync observation-import service.

pub mod observation;

pub use observation::{Observation, ObservationKind, ObservationValidationError};
