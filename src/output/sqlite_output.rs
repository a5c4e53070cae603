//! SQLite-based record sink
//!
//! This module provides a sink that records scraped activity directly to
//! the SQLite storage backend, one run row per scrape.

use crate::crawler::{ScrapeReport, StreamReport};
use crate::output::traits::{OutputResult, RecordSink};
use crate::records::{Comment, Post};
use crate::storage::{RunStatus, SqliteStorage, Storage, StreamColumn};
use std::path::{Path, PathBuf};

/// SQLite-based record sink
///
/// Records already present from earlier runs are left untouched, so the
/// database accumulates a user's history across scrapes.
pub struct SqliteSink<S: Storage = SqliteStorage> {
    storage: S,
    run_id: i64,
    path: Option<PathBuf>,
    inserted: u64,
}

impl SqliteSink<SqliteStorage> {
    /// Opens `{directory}/{username}.db` and starts a run
    pub fn open(directory: &Path, username: &str, config_hash: &str) -> OutputResult<Self> {
        let path = database_path(directory, username);
        let storage = SqliteStorage::new(&path)?;
        let mut sink = Self::new(storage, username, config_hash)?;
        sink.path = Some(path);
        Ok(sink)
    }
}

impl<S: Storage> SqliteSink<S> {
    /// Starts a run on an existing storage backend
    pub fn new(mut storage: S, username: &str, config_hash: &str) -> OutputResult<Self> {
        let run_id = storage.create_run(config_hash, username)?;
        tracing::debug!("Started storage run {}", run_id);
        Ok(Self {
            storage,
            run_id,
            path: None,
            inserted: 0,
        })
    }

    pub fn run_id(&self) -> i64 {
        self.run_id
    }

    /// Records not previously stored by any run
    pub fn inserted(&self) -> u64 {
        self.inserted
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn record_stream<R>(
        &mut self,
        column: StreamColumn,
        report: Option<&StreamReport<R>>,
    ) -> OutputResult<()> {
        if let Some(report) = report {
            self.storage
                .set_stream_state(self.run_id, column, report.status.state())?;
        }
        Ok(())
    }
}

/// Database path for a user
pub fn database_path(directory: &Path, username: &str) -> PathBuf {
    directory.join(format!("{}.db", username))
}

impl<S: Storage> RecordSink for SqliteSink<S> {
    fn append_comment(&mut self, comment: &Comment) -> OutputResult<()> {
        if self.storage.insert_comment(self.run_id, comment)? {
            self.inserted += 1;
        }
        Ok(())
    }

    fn append_post(&mut self, post: &Post) -> OutputResult<()> {
        if self.storage.insert_post(self.run_id, post)? {
            self.inserted += 1;
        }
        Ok(())
    }

    fn finish(&mut self, report: &ScrapeReport) -> OutputResult<()> {
        self.record_stream(StreamColumn::Comments, report.comments.as_ref())?;
        self.record_stream(StreamColumn::Posts, report.posts.as_ref())?;

        let status = if report.is_partial() {
            RunStatus::Partial
        } else {
            RunStatus::Completed
        };
        self.storage.complete_run(self.run_id, status)?;

        tracing::info!(
            "Run {} stored {} new records ({} comments, {} posts in total)",
            self.run_id,
            self.inserted,
            self.storage.count_comments()?,
            self.storage.count_posts()?
        );
        Ok(())
    }

    fn abandon(&mut self) {
        if let Err(e) = self.storage.complete_run(self.run_id, RunStatus::Failed) {
            tracing::warn!("Could not mark run {} as failed: {}", self.run_id, e);
        }
    }

    fn destinations(&self) -> Vec<PathBuf> {
        self.path.iter().cloned().collect()
    }
}
