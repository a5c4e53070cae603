//! Typed records produced from listing entries
//!
//! - `Comment`: one comment, with a denormalized copy of its parent post
//! - `Post`: one post submitted by the user
//! - `ResourceType`: the two independently paginated activity streams

mod comment;
mod post;

pub use comment::Comment;
pub use post::Post;

use std::fmt;

/// An independently paginated activity stream of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Comment,
    Post,
}

impl ResourceType {
    /// Query suffix appended to the user URL to select this listing
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Comment => "/?type=comment",
            Self::Post => "/?type=post",
        }
    }

    /// Human-readable plural used in logs and empty-state messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::Comment => "comments",
            Self::Post => "posts",
        }
    }

    pub fn all() -> [Self; 2] {
        [Self::Comment, Self::Post]
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Common behavior of extracted records
pub trait Record: Clone + Send + 'static {
    /// Resource stream the record belongs to
    const RESOURCE: ResourceType;

    /// Identity used to drop duplicates when listing pages shift mid-scrape
    fn dedup_key(&self) -> &str;
}
