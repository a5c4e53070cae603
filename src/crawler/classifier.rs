//! Detection of terminal page conditions
//!
//! The forum signals "bad user" and "no more items" only through
//! human-readable text. That matching lives behind `PageClassifier` so the
//! pagination engine never depends on the wording.

use crate::crawler::parser::extract_title;
use crate::records::ResourceType;
use scraper::{Html, Selector};

/// Title prefix of the page served for a malformed username
pub const PAGE_HEAD_ERROR: &str = "Error ";

/// Title prefix of the page served for an unknown username
pub const PAGE_HEAD_USER_NOT_FOUND: &str = "User Not Found ";

/// Empty-state text shown once a listing has nothing left
pub const END_OF_USER_DATA: &str = "This user has no ";

/// Region that holds the empty-state message on listing pages
const EMPTY_STATE_SELECTOR: &str = "div.container main.main div.main-content div.empty";

/// Outcome of checking the user's base page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserPageStatus {
    Valid,
    InvalidUsername,
    UserNotFound,
}

/// Outcome of checking a listing page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingStatus {
    /// Entries may be present; extraction decides how many
    HasData,

    /// The listing has nothing more for this user
    Exhausted,
}

/// Classifies fetched documents
pub trait PageClassifier: Send + Sync {
    /// Classifies the user's unpaginated base page
    fn classify_user_page(&self, document: &Html) -> UserPageStatus;

    /// Classifies one page of a resource listing
    fn classify_listing_page(&self, document: &Html, resource: ResourceType) -> ListingStatus;
}

/// Classifier that matches the forum's fixed page texts
#[derive(Debug, Clone)]
pub struct MarkerClassifier {
    error_marker: String,
    not_found_marker: String,
    exhausted_marker: String,
}

impl Default for MarkerClassifier {
    fn default() -> Self {
        Self {
            error_marker: PAGE_HEAD_ERROR.to_string(),
            not_found_marker: PAGE_HEAD_USER_NOT_FOUND.to_string(),
            exhausted_marker: END_OF_USER_DATA.to_string(),
        }
    }
}

impl MarkerClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the empty-state marker, for forums with different wording
    pub fn with_exhausted_marker(mut self, marker: impl Into<String>) -> Self {
        self.exhausted_marker = marker.into();
        self
    }

    /// Message of the empty-state region, if the page has one
    ///
    /// Prefers the region's paragraph and falls back to all of its text.
    fn empty_state_message(document: &Html) -> Option<String> {
        let region_selector = Selector::parse(EMPTY_STATE_SELECTOR).ok()?;
        let paragraph_selector = Selector::parse("p").ok()?;

        let region = document.select(&region_selector).next()?;
        let message = match region.select(&paragraph_selector).next() {
            Some(paragraph) => paragraph.text().collect::<String>(),
            None => region.text().collect::<String>(),
        };
        Some(message)
    }
}

impl PageClassifier for MarkerClassifier {
    fn classify_user_page(&self, document: &Html) -> UserPageStatus {
        let Some(title) = extract_title(document) else {
            return UserPageStatus::Valid;
        };

        if title.starts_with(&self.error_marker) {
            UserPageStatus::InvalidUsername
        } else if title.starts_with(&self.not_found_marker) {
            UserPageStatus::UserNotFound
        } else {
            UserPageStatus::Valid
        }
    }

    fn classify_listing_page(&self, document: &Html, resource: ResourceType) -> ListingStatus {
        match Self::empty_state_message(document) {
            Some(message) if message.contains(&self.exhausted_marker) => {
                tracing::debug!("Empty-state message for {}: {}", resource, message.trim());
                ListingStatus::Exhausted
            }
            _ => ListingStatus::HasData,
        }
    }
}
