//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::records::{Comment, Post};
use crate::state::StreamState;
use crate::storage::{RunRecord, RunStatus};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// This trait defines all database operations needed by the SQLite sink.
pub trait Storage {
    // ===== Run Management =====

    /// Creates a new scrape run
    ///
    /// # Arguments
    ///
    /// * `config_hash` - Hash of the configuration file
    /// * `username` - The user being scraped
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn create_run(&mut self, config_hash: &str, username: &str) -> StorageResult<i64>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Records the final state of one resource stream
    fn set_stream_state(
        &mut self,
        run_id: i64,
        column: StreamColumn,
        state: StreamState,
    ) -> StorageResult<()>;

    /// Marks a run as finished with the given status
    fn complete_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()>;

    // ===== Records =====

    /// Inserts a comment unless its permalink is already stored
    ///
    /// Returns true if the comment was new.
    fn insert_comment(&mut self, run_id: i64, comment: &Comment) -> StorageResult<bool>;

    /// Inserts a post unless its URL is already stored
    ///
    /// Returns true if the post was new.
    fn insert_post(&mut self, run_id: i64, post: &Post) -> StorageResult<bool>;

    // ===== Statistics =====

    fn count_comments(&self) -> StorageResult<u64>;

    fn count_posts(&self) -> StorageResult<u64>;
}

/// Per-stream status column of the `runs` table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamColumn {
    Comments,
    Posts,
}

impl StreamColumn {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Comments => "comments_status",
            Self::Posts => "posts_status",
        }
    }
}
