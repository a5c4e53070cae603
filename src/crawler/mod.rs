//! Crawler module for paginating a user's activity listings
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching behind the `PageFetcher` boundary
//! - Classification of user and listing pages
//! - Extraction of comments and posts from listing entries
//! - The per-resource pagination engine
//! - Overall scrape coordination

mod classifier;
mod coordinator;
mod extractor;
mod fetcher;
mod pagination;
mod parser;

#[cfg(test)]
pub(crate) mod testing;

pub use classifier::{
    ListingStatus, MarkerClassifier, PageClassifier, UserPageStatus, END_OF_USER_DATA,
    PAGE_HEAD_ERROR, PAGE_HEAD_USER_NOT_FOUND,
};
pub use coordinator::{scrape, ScrapeCoordinator, ScrapeError, ScrapeReport};
pub use extractor::{
    CommentExtractor, Entries, EntryOutcome, ExtractError, Extractor, PostExtractor,
};
pub use fetcher::{build_http_client, FetchError, FetchErrorKind, HttpFetcher, PageFetcher};
pub use pagination::{PageResult, PaginationEngine, PaginationSettings, StreamReport};
pub use parser::{extract_title, parse_document};
