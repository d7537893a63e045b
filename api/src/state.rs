//! Application state module.
//!
//! Defines the shared application state that is passed to route handlers.
//! The provider list is constructed at startup and injected here, so
//! handlers never depend on a module-level provider constant and tests
//! can supply their own providers.

use shared::providers::ObservationProvider;
use shared::storage::{InMemoryObservationStore, ObservationStore};
use std::sync::Arc;

/// Application state shared across all request handlers.
///
/// This struct contains all the shared resources needed by the API:
/// the observation storage backend and the configured provider list.
#[derive(Clone)]
pub struct AppState {
    /// The observation storage backend.
    observation_store: Arc<dyn ObservationStore>,
    /// The configured observation providers, consulted in order.
    providers: Arc<Vec<Arc<dyn ObservationProvider>>>,
}

impl AppState {
    /// Creates a new application state with the given store and providers.
    pub fn new(
        observation_store: Arc<dyn ObservationStore>,
        providers: Vec<Arc<dyn ObservationProvider>>,
    ) -> Self {
        Self {
            observation_store,
            providers: Arc::new(providers),
        }
    }

    /// Creates a new application state with an in-memory store and no providers.
    ///
    /// This is useful for development and testing; tests that exercise the
    /// import path supply providers via [`AppState::new`].
    #[must_use]
    pub fn with_in_memory_store() -> Self {
        Self {
            observation_store: Arc::new(InMemoryObservationStore::new()),
            providers: Arc::new(Vec::new()),
        }
    }

    /// Returns a reference to the observation store.
    #[must_use]
    pub fn observation_store(&self) -> &dyn ObservationStore {
        self.observation_store.as_ref()
    }

    /// Returns the configured providers, in consultation order.
    #[must_use]
    pub fn providers(&self) -> &[Arc<dyn ObservationProvider>] {
        &self.providers
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_in_memory_store()
    }
}
