use crate::records::Record;
use crate::state::{StreamState, StreamStatus};
use std::collections::HashSet;

/// Tracks the pagination cursor and accumulated records of one resource stream
///
/// The page number starts at 1 and only ever advances by one. Records are
/// append-only.
#[derive(Debug, Clone)]
pub struct ResourceStream<R: Record> {
    /// Page that will be requested next
    page: u32,

    /// Number of pages fetched and read successfully
    pages_completed: u32,

    /// Current lifecycle state
    state: StreamState,

    /// Records accumulated so far
    records: Vec<R>,

    /// Keys of accumulated records, present when deduplication is enabled
    seen: Option<HashSet<String>>,

    /// Number of records dropped as duplicates
    duplicates: u32,

    /// Number of entries skipped as unextractable
    skipped: u32,

    /// Reason the stream failed, if it did
    failure: Option<String>,
}

impl<R: Record> ResourceStream<R> {
    /// Creates a new running stream positioned at page 1
    pub fn new(dedupe: bool) -> Self {
        Self {
            page: 1,
            pages_completed: 0,
            state: StreamState::Running,
            records: Vec::new(),
            seen: dedupe.then(HashSet::new),
            duplicates: 0,
            skipped: 0,
            failure: None,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn pages_completed(&self) -> u32 {
        self.pages_completed
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        !self.state.is_terminal()
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn duplicates(&self) -> u32 {
        self.duplicates
    }

    pub fn skipped(&self) -> u32 {
        self.skipped
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Appends a record, returning false if it was dropped as a duplicate
    pub fn push(&mut self, record: R) -> bool {
        if let Some(seen) = self.seen.as_mut() {
            if !seen.insert(record.dedup_key().to_string()) {
                self.duplicates += 1;
                return false;
            }
        }
        self.records.push(record);
        true
    }

    /// Counts entries that were dropped during extraction
    pub fn record_skipped(&mut self, count: u32) {
        self.skipped += count;
    }

    /// Marks the current page as read and moves the cursor to the next page
    pub fn advance(&mut self) {
        self.pages_completed += 1;
        self.page += 1;
    }

    /// Marks the stream as exhausted
    pub fn exhaust(&mut self) {
        self.state = StreamState::Exhausted;
    }

    /// Marks the stream as failed, keeping everything accumulated so far
    pub fn fail(&mut self, reason: impl Into<String>) {
        self.state = StreamState::Failed;
        self.failure = Some(reason.into());
    }

    /// Marks the stream as stopped by the page cap
    pub fn cap(&mut self) {
        self.state = StreamState::Capped;
    }

    /// Completion tag, or None while still running
    pub fn status(&self) -> Option<StreamStatus> {
        StreamStatus::from_state(self.state, self.pages_completed)
    }

    /// Consumes the stream and returns its records
    pub fn into_records(self) -> Vec<R> {
        self.records
    }
}
