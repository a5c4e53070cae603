use crate::records::{Record, ResourceType};

/// A post submitted by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub time: String,
    pub title: String,
    pub url: String,
    pub author: String,
    pub author_url: String,
}

impl Post {
    /// Fields in output column order
    pub fn to_row(&self) -> [&str; 5] {
        [
            &self.time,
            &self.title,
            &self.url,
            &self.author,
            &self.author_url,
        ]
    }
}

impl Record for Post {
    const RESOURCE: ResourceType = ResourceType::Post;

    fn dedup_key(&self) -> &str {
        &self.url
    }
}
