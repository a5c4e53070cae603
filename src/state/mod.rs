//! State module for tracking pagination progress
//!
//! # Components
//!
//! - `StreamState`: lifecycle of one resource stream (running, exhausted, failed, capped)
//! - `StreamStatus`: the completion tag reported to callers once a stream ends
//! - `ResourceStream`: page cursor and accumulated records owned by one pagination engine

mod resource_stream;
mod stream_state;

// Re-export main types
pub use resource_stream::ResourceStream;
pub use stream_state::{StreamState, StreamStatus};
