//! Observation providers and batch retrieval.
//!
//! The [`ObservationProvider`] trait abstracts an external source of
//! observation data. [`retrieve_observations`] aggregates batches from a
//! list of providers into a single batch for insertion.

pub mod mountainhub;

pub use mountainhub::MountainHubProvider;

use crate::models::Observation;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while fetching from a provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The HTTP request to the provider failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider response could not be decoded.
    #[error("Failed to decode provider response: {0}")]
    Decode(String),
}

/// Bounds on a provider fetch.
///
/// An empty window asks the provider for whatever it considers recent.
#[derive(Debug, Clone, Default)]
pub struct FetchWindow {
    /// Only include observations at or after this time.
    pub since: Option<DateTime<Utc>>,

    /// Only include observations before this time.
    pub until: Option<DateTime<Utc>>,

    /// Maximum number of observations to fetch.
    pub limit: Option<u32>,
}

impl FetchWindow {
    /// Creates a new empty window.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the lower time bound (inclusive).
    #[must_use]
    pub fn with_since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    /// Sets the upper time bound (exclusive).
    #[must_use]
    pub fn with_until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    /// Sets the maximum number of observations.
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Trait for external observation sources.
///
/// Implementations must be thread-safe; providers are constructed once
/// at startup and shared across requests behind `Arc`.
#[async_trait]
pub trait ObservationProvider: Send + Sync {
    /// Returns the stable slug identifying this provider (e.g., "mountainhub").
    fn name(&self) -> &str;

    /// Fetches a batch of observations within the given window.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be reached or its
    /// response cannot be decoded.
    async fn fetch(&self, window: &FetchWindow) -> Result<Vec<Observation>, ProviderError>;
}

/// Retrieves and aggregates observations from a list of providers.
///
/// Providers are consulted in order; each provider's records keep their
/// returned order in the aggregated batch. The first provider failure
/// aborts the retrieval.
///
/// # Errors
///
/// Returns the first [`ProviderError`] encountered.
pub async fn retrieve_observations(
    providers: &[Arc<dyn ObservationProvider>],
    window: &FetchWindow,
) -> Result<Vec<Observation>, ProviderError> {
    let mut batch = Vec::new();

    for provider in providers {
        let observations = provider.fetch(window).await?;
        tracing::debug!(
            provider = provider.name(),
            count = observations.len(),
            "Fetched observations"
        );
        batch.extend(observations);
    }

    Ok(batch)
}

/// A provider serving a fixed set of observations.
///
/// Useful for development and for testing handlers without network
/// access. The window's time bounds and limit are honored.
#[derive(Debug, Clone)]
pub struct StaticProvider {
    name: String,
    observations: Vec<Observation>,
}

impl StaticProvider {
    /// Creates a new static provider with the given slug and records.
    #[must_use]
    pub fn new(name: impl Into<String>, observations: Vec<Observation>) -> Self {
        Self {
            name: name.into(),
            observations,
        }
    }
}

#[async_trait]
impl ObservationProvider for StaticProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, window: &FetchWindow) -> Result<Vec<Observation>, ProviderError> {
        let mut observations: Vec<Observation> = self
            .observations
            .iter()
            .filter(|o| {
                if let Some(since) = window.since {
                    if o.observed_at < since {
                        return false;
                    }
                }
                if let Some(until) = window.until {
                    if o.observed_at >= until {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();

        if let Some(limit) = window.limit {
            observations.truncate(limit as usize);
        }

        Ok(observations)
    }
}
