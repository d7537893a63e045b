//! Obsync Shared Library
//!
//! This crate contains the types, provider clients, and storage
//! implementations used across the Obsync observation-import service.
//!
//! # Modules
//!
//! - [`models`] - The observation data model
//! - [`providers`] - Observation providers and batch retrieval
//! - [`storage`] - Storage traits and implementations
//!
//! # Example
//!
//! ```
//! use shared::models::{Observation, ObservationKind};
//! use chrono::Utc;
//!
//! let obs = Observation::new("mountainhub", "obs-1", ObservationKind::Snowpack, Utc::now())
//!     .with_coordinates(46.85, -121.76)
//!     .with_author("A. Ranger");
//!
//! assert!(obs.validate_observation().is_ok());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod models;
pub mod providers;
pub mod storage;

/// Re-export common dependencies for convenience.
pub use chrono;
pub use serde;
pub use serde_json;
pub use validator;
