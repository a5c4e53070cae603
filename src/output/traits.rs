//! Record sink traits and error types
//!
//! This module defines the trait interface for output sinks and
//! associated error types.

use crate::crawler::ScrapeReport;
use crate::records::{Comment, Post};
use crate::storage::StorageError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("No {0} output was opened")]
    StreamNotOpened(&'static str),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for output destinations of scraped records
///
/// Records arrive in listing order. `finish` is called exactly once, after
/// the last record, with the report the records came from. If a write fails
/// first, `abandon` is called instead.
pub trait RecordSink {
    /// Appends one comment
    fn append_comment(&mut self, comment: &Comment) -> OutputResult<()>;

    /// Appends one post
    fn append_post(&mut self, post: &Post) -> OutputResult<()>;

    /// Flushes buffered output and records run metadata
    fn finish(&mut self, report: &ScrapeReport) -> OutputResult<()>;

    /// Marks the output as incomplete after a failed write
    fn abandon(&mut self) {}

    /// Files written by this sink
    fn destinations(&self) -> Vec<PathBuf>;
}

/// Counts of records handed to a sink
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteStats {
    pub comments: usize,
    pub posts: usize,
}
