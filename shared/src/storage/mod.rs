//! Storage traits and implementations.
//!
//! This module provides abstractions for persisting and querying
//! observations. The `ObservationStore` trait defines the interface,
//! allowing different implementations (in-memory, database-backed, etc.).

pub mod observation_store;

pub use observation_store::{
    ClickHouseObservationStore, InMemoryObservationStore, InsertReport, ObservationQuery,
    ObservationQueryResult, ObservationStore, ObservationStoreError,
};
