//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::records::{Comment, Post};
use crate::state::StreamState;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult, StreamColumn};
use crate::storage::{RunRecord, RunStatus};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl Storage for SqliteStorage {
    // ===== Run Management =====

    fn create_run(&mut self, config_hash: &str, username: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (username, started_at, config_hash, status) VALUES (?1, ?2, ?3, ?4)",
            params![username, now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        self.conn
            .query_row(
                "SELECT id, username, started_at, finished_at, config_hash, status
                 FROM runs WHERE id = ?1",
                params![run_id],
                |row| {
                    Ok(RunRecord {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        started_at: row.get(2)?,
                        finished_at: row.get(3)?,
                        config_hash: row.get(4)?,
                        status: RunStatus::from_db_string(&row.get::<_, String>(5)?)
                            .unwrap_or(RunStatus::Running),
                    })
                },
            )
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn set_stream_state(
        &mut self,
        run_id: i64,
        column: StreamColumn,
        state: StreamState,
    ) -> StorageResult<()> {
        let sql = format!("UPDATE runs SET {} = ?1 WHERE id = ?2", column.name());
        self.conn
            .execute(&sql, params![state.to_db_string(), run_id])?;
        Ok(())
    }

    fn complete_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2 WHERE id = ?3",
            params![status.to_db_string(), now, run_id],
        )?;
        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    // ===== Records =====

    fn insert_comment(&mut self, run_id: i64, comment: &Comment) -> StorageResult<bool> {
        let inserted = self.conn.execute(
            "INSERT INTO comments (permalink, time, body, author, author_url, context,
             parent_title, parent_url, parent_author, parent_author_url, first_seen_run)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
             ON CONFLICT(permalink) DO NOTHING",
            params![
                comment.permalink,
                comment.time,
                comment.body,
                comment.author,
                comment.author_url,
                comment.context,
                comment.parent_title,
                comment.parent_url,
                comment.parent_author,
                comment.parent_author_url,
                run_id
            ],
        )?;
        Ok(inserted > 0)
    }

    fn insert_post(&mut self, run_id: i64, post: &Post) -> StorageResult<bool> {
        let inserted = self.conn.execute(
            "INSERT INTO posts (url, time, title, author, author_url, first_seen_run)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(url) DO NOTHING",
            params![
                post.url,
                post.time,
                post.title,
                post.author,
                post.author_url,
                run_id
            ],
        )?;
        Ok(inserted > 0)
    }

    // ===== Statistics =====

    fn count_comments(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM comments", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_posts(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
