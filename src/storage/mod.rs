//! Storage module for persisting scraped activity
//!
//! This module handles all database operations for the SQLite output format:
//! - SQLite database initialization and schema management
//! - Run tracking, one row per scrape of a user
//! - Comment and post persistence with permalink/URL deduplication across runs

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult, StreamColumn};

/// Represents a scrape run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub username: String,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
}

/// Status of a scrape run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    /// Every enabled stream was exhausted
    Completed,
    /// At least one stream failed or hit the page limit
    Partial,
    /// Writing the scraped records failed part way
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Partial => "partial",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "partial" => Some(Self::Partial),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}
