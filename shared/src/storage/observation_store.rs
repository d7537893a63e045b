//! Observation storage trait and implementations.
//!
//! Provides the `ObservationStore` trait for abstracting observation
//! persistence and an `InMemoryObservationStore` implementation for
//! development and testing.

use crate::models::{Observation, ObservationKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Errors that can occur during observation store operations.
#[derive(Debug, Error)]
pub enum ObservationStoreError {
    /// Failed to acquire lock on the store.
    #[error("Failed to acquire lock on observation store")]
    LockError,

    /// Generic storage error.
    #[error("Storage error: {0}")]
    StorageError(String),
}

/// The outcome of persisting a batch of observations.
///
/// Returned by insertion and passed through to the import response
/// unmodified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertReport {
    /// Number of observations persisted.
    pub inserted: usize,
}

/// Query parameters for retrieving observations.
#[derive(Debug, Clone, Default)]
pub struct ObservationQuery {
    /// Filter by provider slug.
    pub source: Option<String>,

    /// Filter by observation kind.
    pub kind: Option<ObservationKind>,

    /// Filter observations observed at or after this time.
    pub start_time: Option<DateTime<Utc>>,

    /// Filter observations observed before this time.
    pub end_time: Option<DateTime<Utc>>,

    /// Maximum number of observations to return.
    pub limit: Option<usize>,

    /// Number of observations to skip (for pagination).
    pub offset: Option<usize>,
}

impl ObservationQuery {
    /// Creates a new empty query (returns all observations).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the provider filter.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the kind filter.
    #[must_use]
    pub fn with_kind(mut self, kind: ObservationKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Sets the start time filter.
    #[must_use]
    pub fn with_start_time(mut self, start: DateTime<Utc>) -> Self {
        self.start_time = Some(start);
        self
    }

    /// Sets the end time filter.
    #[must_use]
    pub fn with_end_time(mut self, end: DateTime<Utc>) -> Self {
        self.end_time = Some(end);
        self
    }

    /// Sets the maximum number of results.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the offset for pagination.
    #[must_use]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Result of an observation query operation.
#[derive(Debug, Clone)]
pub struct ObservationQueryResult {
    /// The observations matching the query.
    pub observations: Vec<Observation>,

    /// Total count of matching observations (before limit/offset applied).
    pub total_count: usize,
}

/// Trait for observation storage implementations.
///
/// This trait defines the interface for persisting and querying
/// observations. Implementations must be thread-safe (Send + Sync).
pub trait ObservationStore: Send + Sync {
    /// Inserts a single observation into the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn insert(&self, observation: Observation) -> Result<InsertReport, ObservationStoreError>;

    /// Inserts a batch of observations into the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn insert_batch(
        &self,
        observations: Vec<Observation>,
    ) -> Result<InsertReport, ObservationStoreError>;

    /// Queries observations based on the provided parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the query operation fails.
    fn query(
        &self,
        query: ObservationQuery,
    ) -> Result<ObservationQueryResult, ObservationStoreError>;

    /// Returns the total number of observations in the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the count operation fails.
    fn count(&self) -> Result<usize, ObservationStoreError>;

    /// Clears all observations from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the clear operation fails.
    fn clear(&self) -> Result<(), ObservationStoreError>;
}

/// In-memory observation store implementation.
#[derive(Debug, Default)]
pub struct InMemoryObservationStore {
    observations: Arc<RwLock<Vec<Observation>>>,
}

impl InMemoryObservationStore {
    /// Creates a new empty in-memory observation store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            observations: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Creates a new in-memory observation store wrapped in an Arc.
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl ObservationStore for InMemoryObservationStore {
    fn insert(&self, observation: Observation) -> Result<InsertReport, ObservationStoreError> {
        self.insert_batch(vec![observation])
    }

    fn insert_batch(
        &self,
        new_observations: Vec<Observation>,
    ) -> Result<InsertReport, ObservationStoreError> {
        let mut observations = self
            .observations
            .write()
            .map_err(|_| ObservationStoreError::LockError)?;
        let inserted = new_observations.len();
        observations.extend(new_observations);
        Ok(InsertReport { inserted })
    }

    fn query(
        &self,
        query: ObservationQuery,
    ) -> Result<ObservationQueryResult, ObservationStoreError> {
        let observations = self
            .observations
            .read()
            .map_err(|_| ObservationStoreError::LockError)?;

        let filtered: Vec<Observation> = observations
            .iter()
            .filter(|o| {
                if let Some(ref source) = query.source {
                    if &o.source != source {
                        return false;
                    }
                }

                if let Some(ref kind) = query.kind {
                    if &o.kind != kind {
                        return false;
                    }
                }

                if let Some(start) = query.start_time {
                    if o.observed_at < start {
                        return false;
                    }
                }
                if let Some(end) = query.end_time {
                    if o.observed_at >= end {
                        return false;
                    }
                }

                true
            })
            .cloned()
            .collect();

        let total_count = filtered.len();

        let offset = query.offset.unwrap_or(0);
        let result: Vec<Observation> = filtered
            .into_iter()
            .skip(offset)
            .take(query.limit.unwrap_or(usize::MAX))
            .collect();

        Ok(ObservationQueryResult {
            observations: result,
            total_count,
        })
    }

    fn count(&self) -> Result<usize, ObservationStoreError> {
        let observations = self
            .observations
            .read()
            .map_err(|_| ObservationStoreError::LockError)?;
        Ok(observations.len())
    }

    fn clear(&self) -> Result<(), ObservationStoreError> {
        let mut observations = self
            .observations
            .write()
            .map_err(|_| ObservationStoreError::LockError)?;
        observations.clear();
        Ok(())
    }
}

/// `ClickHouse`-backed observation store implementation.
///
/// This implementation stores observations in `ClickHouse` for production
/// use. The raw provider payload is persisted as a JSON string column.
#[derive(Clone)]
pub struct ClickHouseObservationStore {
    client: Arc<clickhouse::Client>,
}

impl ClickHouseObservationStore {
    /// Creates a new `ClickHouse` observation store with the given client.
    #[must_use]
    pub fn new(client: Arc<clickhouse::Client>) -> Self {
        Self { client }
    }

    /// Creates a new `ClickHouse` observation store wrapped in an Arc.
    #[must_use]
    pub fn new_shared(client: Arc<clickhouse::Client>) -> Arc<Self> {
        Arc::new(Self::new(client))
    }

    /// Helper to execute async operations synchronously.
    fn block_on<F, T>(future: F) -> Result<T, ObservationStoreError>
    where
        F: std::future::Future<Output = Result<T, clickhouse::error::Error>>,
    {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current()
                .block_on(future)
                .map_err(|e| ObservationStoreError::StorageError(e.to_string()))
        })
    }
}

#[derive(clickhouse::Row, Serialize, Deserialize)]
struct ObservationRow {
    observed_at: i64,
    source: String,
    source_id: String,
    kind: String,
    latitude: f64,
    longitude: f64,
    elevation_m: Option<f64>,
    author: Option<String>,
    description: Option<String>,
    details: String,
}

impl From<Observation> for ObservationRow {
    fn from(observation: Observation) -> Self {
        Self {
            observed_at: observation.observed_at.timestamp_nanos_opt().unwrap_or(0),
            source: observation.source,
            source_id: observation.source_id,
            kind: observation.kind.to_string(),
            latitude: observation.latitude,
            longitude: observation.longitude,
            elevation_m: observation.elevation_m,
            author: observation.author,
            description: observation.description,
            details: observation.details.to_string(),
        }
    }
}

impl From<ObservationRow> for Observation {
    fn from(row: ObservationRow) -> Self {
        let kind = row
            .kind
            .parse::<ObservationKind>()
            .unwrap_or(ObservationKind::Snowpack);

        Self {
            source: row.source,
            source_id: row.source_id,
            kind,
            observed_at: DateTime::from_timestamp_nanos(row.observed_at),
            latitude: row.latitude,
            longitude: row.longitude,
            elevation_m: row.elevation_m,
            author: row.author,
            description: row.description,
            details: serde_json::from_str(&row.details).unwrap_or(serde_json::Value::Null),
        }
    }
}

impl ObservationStore for ClickHouseObservationStore {
    fn insert(&self, observation: Observation) -> Result<InsertReport, ObservationStoreError> {
        self.insert_batch(vec![observation])
    }

    fn insert_batch(
        &self,
        observations: Vec<Observation>,
    ) -> Result<InsertReport, ObservationStoreError> {
        if observations.is_empty() {
            return Ok(InsertReport { inserted: 0 });
        }

        let inserted = observations.len();
        let client = Arc::clone(&self.client);
        Self::block_on(async move {
            let mut inserter = client.insert::<ObservationRow>("observations").await?;

            for observation in observations {
                inserter.write(&ObservationRow::from(observation)).await?;
            }

            inserter.end().await?;
            Ok(())
        })?;

        Ok(InsertReport { inserted })
    }

    fn query(
        &self,
        query: ObservationQuery,
    ) -> Result<ObservationQueryResult, ObservationStoreError> {
        use std::fmt::Write as _;

        const SELECT: &str = "SELECT observed_at, source, source_id, kind, latitude, longitude, elevation_m, author, description, details FROM observations";

        let mut sql = format!("{SELECT} WHERE 1=1");

        if let Some(ref source) = query.source {
            write!(&mut sql, " AND source = '{}'", source.replace('\'', "''")).unwrap();
        }

        if let Some(ref kind) = query.kind {
            write!(&mut sql, " AND kind = '{kind}'").unwrap();
        }

        if let Some(start) = query.start_time {
            write!(
                &mut sql,
                " AND observed_at >= {}",
                start.timestamp_nanos_opt().unwrap_or(0)
            )
            .unwrap();
        }
        if let Some(end) = query.end_time {
            write!(
                &mut sql,
                " AND observed_at < {}",
                end.timestamp_nanos_opt().unwrap_or(0)
            )
            .unwrap();
        }

        sql.push_str(" ORDER BY observed_at DESC");

        let count_sql = sql.replace(SELECT, "SELECT count() FROM observations");

        let offset = query.offset.unwrap_or(0);
        let limit = query.limit.unwrap_or(1000);
        write!(&mut sql, " LIMIT {limit} OFFSET {offset}").unwrap();

        let client = Arc::clone(&self.client);

        Self::block_on(async move {
            let total_count: u64 = client.query(&count_sql).fetch_one::<u64>().await?;

            let rows: Vec<ObservationRow> =
                client.query(&sql).fetch_all::<ObservationRow>().await?;

            let observations: Vec<Observation> = rows.into_iter().map(Into::into).collect();

            Ok(ObservationQueryResult {
                observations,
                total_count: usize::try_from(total_count).unwrap_or(usize::MAX),
            })
        })
    }

    fn count(&self) -> Result<usize, ObservationStoreError> {
        let client = Arc::clone(&self.client);
        let count: u64 = Self::block_on(async move {
            client
                .query("SELECT count() FROM observations")
                .fetch_one::<u64>()
                .await
        })?;

        Ok(usize::try_from(count).unwrap_or(usize::MAX))
    }

    fn clear(&self) -> Result<(), ObservationStoreError> {
        let client = Arc::clone(&self.client);
        Self::block_on(async move { client.query("TRUNCATE TABLE observations").execute().await })
    }
}
