use crate::records::{Record, ResourceType};

/// A single comment with a snapshot of the post it was left on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Timestamp exactly as the forum renders it in the `title` attribute
    pub time: String,
    pub body: String,
    pub author: String,
    pub author_url: String,
    pub permalink: String,
    pub context: String,
    pub parent_title: String,
    pub parent_url: String,
    pub parent_author: String,
    pub parent_author_url: String,
}

impl Comment {
    /// Fields in output column order
    pub fn to_row(&self) -> [&str; 10] {
        [
            &self.time,
            &self.body,
            &self.author,
            &self.author_url,
            &self.permalink,
            &self.context,
            &self.parent_title,
            &self.parent_url,
            &self.parent_author,
            &self.parent_author_url,
        ]
    }
}

impl Record for Comment {
    const RESOURCE: ResourceType = ResourceType::Comment;

    fn dedup_key(&self) -> &str {
        &self.permalink
    }
}
