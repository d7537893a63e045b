//! Server configuration module.
//!
//! Handles loading configuration from environment variables with sensible defaults.

use anyhow::{bail, Result};
use std::net::SocketAddr;

/// Which storage backend to persist observations into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// In-memory store, for development and testing.
    Memory,
    /// `ClickHouse`-backed store, for production.
    ClickHouse,
}

/// Server configuration.
///
/// Configuration values can be set via environment variables:
/// - `OBSYNC_HOST`: The host address to bind to (default: "0.0.0.0")
/// - `OBSYNC_PORT`: The port to listen on (default: 8080)
/// - `OBSYNC_MOUNTAINHUB_URL`: Base URL of the MountainHub API
/// - `OBSYNC_STORE`: Storage backend, "memory" or "clickhouse" (default: "memory")
#[derive(Debug, Clone)]
pub struct Config {
    /// The host address to bind to.
    pub host: String,
    /// The port to listen on.
    pub port: u16,
    /// Base URL of the MountainHub API.
    pub mountainhub_url: String,
    /// The storage backend for observations.
    pub store: StoreBackend,
}

impl Config {
    /// Creates a new configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `OBSYNC_PORT` is set but cannot be parsed as a valid port number
    /// - `OBSYNC_STORE` is set to an unknown backend
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("OBSYNC_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = std::env::var("OBSYNC_PORT")
            .ok()
            .map(|p| p.parse::<u16>())
            .transpose()?
            .unwrap_or(8080);

        let mountainhub_url = std::env::var("OBSYNC_MOUNTAINHUB_URL")
            .unwrap_or_else(|_| shared::providers::mountainhub::DEFAULT_BASE_URL.to_string());

        let store = match std::env::var("OBSYNC_STORE").as_deref() {
            Err(_) | Ok("memory") => StoreBackend::Memory,
            Ok("clickhouse") => StoreBackend::ClickHouse,
            Ok(other) => bail!("Unknown storage backend: '{other}'"),
        };

        Ok(Self {
            host,
            port,
            mountainhub_url,
            store,
        })
    }

    /// Returns the socket address for binding.
    ///
    /// # Panics
    ///
    /// Panics if the host and port combination cannot be parsed as a valid socket address.
    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid socket address from config")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            mountainhub_url: shared::providers::mountainhub::DEFAULT_BASE_URL.to_string(),
            store: StoreBackend::Memory,
        }
    }
}
