/// Stream state definitions for tracking pagination progress
///
/// A stream starts `Running` and ends in exactly one terminal state.
use std::fmt;

/// Represents the current state of a resource stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamState {
    // ===== Active States =====
    /// Pages are still being requested
    Running,

    // ===== Terminal States =====
    /// The listing reported that the user has no more items
    Exhausted,

    /// A page could not be fetched or was structurally unreadable
    Failed,

    /// The configured page cap was reached before the listing ran out
    Capped,
}

impl StreamState {
    /// Returns true if this is a terminal state (no further pages are requested)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }

    /// Converts the state to its database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Exhausted => "exhausted",
            Self::Failed => "failed",
            Self::Capped => "capped",
        }
    }
}

impl fmt::Display for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

/// Completion tag of a finished stream
///
/// `pages` counts listing pages that were fetched and read successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStatus {
    /// Stopped because there was no more data
    Exhausted,

    /// Stopped because a page fetch (or page read) failed after `n` good pages
    FailedAfterPages(u32),

    /// Stopped at the safety cap after `n` pages
    PageLimitReached(u32),
}

impl StreamStatus {
    /// Builds the status tag for a stream that ended in `state`
    ///
    /// Returns None while the stream is still running.
    pub fn from_state(state: StreamState, pages: u32) -> Option<Self> {
        match state {
            StreamState::Running => None,
            StreamState::Exhausted => Some(Self::Exhausted),
            StreamState::Failed => Some(Self::FailedAfterPages(pages)),
            StreamState::Capped => Some(Self::PageLimitReached(pages)),
        }
    }

    /// Terminal state this tag was built from
    pub fn state(&self) -> StreamState {
        match self {
            Self::Exhausted => StreamState::Exhausted,
            Self::FailedAfterPages(_) => StreamState::Failed,
            Self::PageLimitReached(_) => StreamState::Capped,
        }
    }

    /// Returns true if the records of this stream may be incomplete
    pub fn is_partial(&self) -> bool {
        !matches!(self, Self::Exhausted)
    }
}

impl fmt::Display for StreamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted => write!(f, "exhausted"),
            Self::FailedAfterPages(n) => write!(f, "failed after {} pages", n),
            Self::PageLimitReached(n) => write!(f, "page limit reached after {} pages", n),
        }
    }
}
