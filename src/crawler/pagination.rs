//! Per-resource pagination engine
//!
//! One engine walks one listing strictly in order: page N+1 is never
//! requested before page N has been fetched and read. The engine stops at the
//! first of:
//! - an empty-state page (`Exhausted`)
//! - a failed fetch or an unreadable page (`Failed`, records kept)
//! - the configured page cap (`Capped`), unless the page after the cap is
//!   an empty-state page

use crate::config::ScrapeConfig;
use crate::crawler::classifier::{ListingStatus, PageClassifier};
use crate::crawler::extractor::{EntryOutcome, ExtractError, Extractor};
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::parser::parse_document;
use crate::records::{Record, ResourceType};
use crate::state::{ResourceStream, StreamStatus};
use crate::url::UserUrls;
use std::sync::Arc;
use std::time::Duration;

/// Limits and toggles shared by both engines of a scrape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationSettings {
    /// Maximum pages read per stream; 0 means no cap
    pub max_pages: u32,

    /// Pause before every page request after the first
    pub request_delay: Duration,

    /// Drop records already accumulated in the same stream
    pub dedupe: bool,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            max_pages: 1000,
            request_delay: Duration::ZERO,
            dedupe: true,
        }
    }
}

impl From<&ScrapeConfig> for PaginationSettings {
    fn from(config: &ScrapeConfig) -> Self {
        Self {
            max_pages: config.max_pages,
            request_delay: Duration::from_millis(config.request_delay_ms),
            dedupe: config.dedupe,
        }
    }
}

/// What one listing page contributed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageResult<R> {
    /// The page was read; `records` may be empty
    Records { records: Vec<R>, skipped: u32 },

    /// The listing has no more items
    Exhausted,

    /// An entry was structurally broken; `records` holds the entries before it
    Fault {
        records: Vec<R>,
        skipped: u32,
        error: ExtractError,
    },
}

/// Final account of one stream
#[derive(Debug, Clone)]
pub struct StreamReport<R> {
    pub resource: ResourceType,
    pub status: StreamStatus,
    pub records: Vec<R>,
    pub pages_completed: u32,
    pub skipped: u32,
    pub duplicates: u32,
    pub failure: Option<String>,
}

impl<R> StreamReport<R> {
    /// Report for a stream whose task died before producing anything
    pub fn lost(resource: ResourceType, reason: impl Into<String>) -> Self {
        Self {
            resource,
            status: StreamStatus::FailedAfterPages(0),
            records: Vec::new(),
            pages_completed: 0,
            skipped: 0,
            duplicates: 0,
            failure: Some(reason.into()),
        }
    }

    /// Non-fatal warning for streams that may be incomplete
    pub fn warning(&self) -> Option<String> {
        match self.status {
            StreamStatus::Exhausted => None,
            StreamStatus::FailedAfterPages(pages) => Some(format!(
                "{} stopped after {} pages because a page failed ({}); {} records are partial",
                self.resource,
                pages,
                self.failure.as_deref().unwrap_or("unknown error"),
                self.records.len()
            )),
            StreamStatus::PageLimitReached(pages) => Some(format!(
                "{} stopped at the {}-page limit; {} records may be partial",
                self.resource,
                pages,
                self.records.len()
            )),
        }
    }
}

/// Drives one resource listing from page 1 to a terminal state
pub struct PaginationEngine<X: Extractor> {
    urls: Arc<UserUrls>,
    fetcher: Arc<dyn PageFetcher>,
    classifier: Arc<dyn PageClassifier>,
    extractor: X,
    settings: PaginationSettings,
}

impl<X: Extractor> PaginationEngine<X> {
    pub fn new(
        urls: Arc<UserUrls>,
        fetcher: Arc<dyn PageFetcher>,
        classifier: Arc<dyn PageClassifier>,
        extractor: X,
        settings: PaginationSettings,
    ) -> Self {
        Self {
            urls,
            fetcher,
            classifier,
            extractor,
            settings,
        }
    }

    fn resource(&self) -> ResourceType {
        X::Record::RESOURCE
    }

    /// Runs the stream to completion
    pub async fn run(self) -> StreamReport<X::Record> {
        let mut stream = ResourceStream::new(self.settings.dedupe);

        while stream.is_active() {
            self.step(&mut stream).await;
        }

        let report = StreamReport {
            resource: self.resource(),
            status: stream
                .status()
                .unwrap_or(StreamStatus::FailedAfterPages(stream.pages_completed())),
            pages_completed: stream.pages_completed(),
            skipped: stream.skipped(),
            duplicates: stream.duplicates(),
            failure: stream.failure().map(str::to_string),
            records: stream.into_records(),
        };

        tracing::info!(
            "Finished {}: {} records from {} pages ({})",
            report.resource,
            report.records.len(),
            report.pages_completed,
            report.status
        );
        report
    }

    /// Requests and reads the stream's current page
    pub async fn step(&self, stream: &mut ResourceStream<X::Record>) {
        let resource = self.resource();

        if stream.page() > 1 && !self.settings.request_delay.is_zero() {
            tokio::time::sleep(self.settings.request_delay).await;
        }

        if self.settings.max_pages > 0 && stream.pages_completed() >= self.settings.max_pages {
            self.stop_at_cap(stream).await;
            return;
        }

        let url = self.urls.listing_page(resource, stream.page());
        tracing::info!("Scraping {} page {} @ {}", resource, stream.page(), url);

        let body = match self.fetcher.fetch(&url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Stopping {}: {}", resource, e);
                stream.fail(e.to_string());
                return;
            }
        };

        match self.read_page(&body) {
            PageResult::Exhausted => {
                tracing::info!("No more {} after page {}", resource, stream.page() - 1);
                stream.exhaust();
            }
            PageResult::Records { records, skipped } => {
                let found = records.len();
                self.accumulate(stream, records, skipped);
                tracing::debug!(
                    "Page {} of {}: {} records, {} skipped",
                    stream.page(),
                    resource,
                    found,
                    skipped
                );
                stream.advance();
            }
            PageResult::Fault {
                records,
                skipped,
                error,
            } => {
                tracing::warn!(
                    "Stopping {}: page {} is unreadable: {}",
                    resource,
                    stream.page(),
                    error
                );
                self.accumulate(stream, records, skipped);
                stream.fail(error.to_string());
            }
        }
    }

    /// Ends a stream that has read `max_pages` pages
    ///
    /// The next page is fetched and classified only. An empty-state page means
    /// the listing ended exactly at the cap; anything else caps the stream.
    async fn stop_at_cap(&self, stream: &mut ResourceStream<X::Record>) {
        let resource = self.resource();
        let url = self.urls.listing_page(resource, stream.page());
        tracing::debug!("Checking {} past the page limit @ {}", resource, url);

        let exhausted = match self.fetcher.fetch(&url).await {
            Ok(body) => self.is_exhausted(&body),
            Err(e) => {
                tracing::debug!("Could not check {} past the page limit: {}", resource, e);
                false
            }
        };

        if exhausted {
            tracing::info!("No more {} after page {}", resource, stream.pages_completed());
            stream.exhaust();
        } else {
            tracing::warn!(
                "Reached the {}-page limit for {}, stopping",
                self.settings.max_pages,
                resource
            );
            stream.cap();
        }
    }

    fn is_exhausted(&self, body: &str) -> bool {
        let document = parse_document(body);
        self.classifier
            .classify_listing_page(&document, self.resource())
            == ListingStatus::Exhausted
    }

    fn accumulate(&self, stream: &mut ResourceStream<X::Record>, records: Vec<X::Record>, skipped: u32) {
        stream.record_skipped(skipped);
        for record in records {
            if !stream.push(record) {
                tracing::debug!("Dropped duplicate {} record", self.resource());
            }
        }
    }

    /// Parses, classifies and extracts one listing page
    ///
    /// Kept synchronous: the parsed document never lives across an await.
    pub fn read_page(&self, body: &str) -> PageResult<X::Record> {
        let document = parse_document(body);

        if self
            .classifier
            .classify_listing_page(&document, self.resource())
            == ListingStatus::Exhausted
        {
            return PageResult::Exhausted;
        }

        let mut records = Vec::new();
        let mut skipped = 0;
        for outcome in self.extractor.extract(&document) {
            match outcome {
                Ok(EntryOutcome::Extracted(record)) => records.push(record),
                Ok(EntryOutcome::Skipped) => skipped += 1,
                Err(error) => {
                    return PageResult::Fault {
                        records,
                        skipped,
                        error,
                    }
                }
            }
        }

        PageResult::Records { records, skipped }
    }
}
