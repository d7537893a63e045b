//! Obsync CLI
//!
//! Command-line interface for the Obsync observation-import service.
//!
//! # Usage
//!
//! ```bash
//! obsync --help
//! obsync health
//! obsync import
//! ```

#![deny(unsafe_code)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

/// Obsync CLI - observation-import service command-line interface
#[derive(Parser)]
#[command(name = "obsync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// API server URL
    #[arg(
        short,
        long,
        env = "OBSYNC_API_URL",
        default_value = "http://localhost:8080"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check API server health
    Health,
    /// Trigger an observation import
    Import,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    tracing::debug!(api_url = %cli.api_url, "Using API server");

    match cli.command {
        Some(Commands::Health) => {
            let health = fetch_json(&format!("{}/health", cli.api_url)).await?;
            println!(
                "{} ({} v{})",
                health["status"].as_str().unwrap_or("unknown"),
                health["service"].as_str().unwrap_or("unknown"),
                health["version"].as_str().unwrap_or("unknown")
            );
        }
        Some(Commands::Import) => {
            let client = reqwest::Client::new();
            let response = client
                .post(format!("{}/api/v1/import", cli.api_url))
                .send()
                .await
                .context("Failed to reach API server")?;

            let status = response.status();
            let body: serde_json::Value = response
                .json()
                .await
                .context("Failed to decode import response")?;

            if status.is_success() {
                println!("Imported {} observation(s)", body["inserted"]);
            } else {
                anyhow::bail!(
                    "Import failed ({status}): {}",
                    body["message"].as_str().unwrap_or("unknown error")
                );
            }
        }
        None => {
            println!("Obsync CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

/// Fetches a JSON document from the given URL.
async fn fetch_json(url: &str) -> Result<serde_json::Value> {
    reqwest::get(url)
        .await
        .context("Failed to reach API server")?
        .json()
        .await
        .context("Failed to decode response")
}
