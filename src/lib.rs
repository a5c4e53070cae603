//! Activity-Harvest: incremental scraper for a forum user's posts and comments
//!
//! This crate walks the paginated comment and post listings of a single user,
//! turning every listing entry into a typed record and handing the results to
//! a CSV or SQLite sink. Each resource type paginates independently, so a
//! failure in one stream never aborts the other.

pub mod config;
pub mod crawler;
pub mod output;
pub mod records;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Activity-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scrape(#[from] crawler::ScrapeError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Activity-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{scrape, ScrapeCoordinator, ScrapeReport};
pub use records::{Comment, Post, ResourceType};
pub use state::{StreamState, StreamStatus};
