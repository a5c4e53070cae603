//! Scrape coordinator - orchestration of one user's scrape
//!
//! The coordinator:
//! - Validates the request before touching the network
//! - Confirms the user exists via the base user page
//! - Runs the comment and post engines on independent tasks
//! - Merges both streams into a single report
//!
//! It never writes output; callers hand the report to a `RecordSink`.

use crate::config::Config;
use crate::crawler::classifier::{MarkerClassifier, PageClassifier, UserPageStatus};
use crate::crawler::extractor::{CommentExtractor, ExtractError, Extractor, PostExtractor};
use crate::crawler::fetcher::{FetchError, HttpFetcher, PageFetcher};
use crate::crawler::pagination::{PaginationEngine, PaginationSettings, StreamReport};
use crate::crawler::parser::parse_document;
use crate::records::{Comment, Post, Record};
use crate::url::{normalize_base_url, UserUrls};
use crate::{ConfigError, HarvestError};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;

/// Reasons a scrape ends without producing any records
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Username cannot be empty")]
    EmptyUsername,

    #[error("Either comments or posts must be selected")]
    NoResourceTypeSelected,

    #[error("Cannot build user URLs: {0}")]
    Target(#[source] ConfigError),

    #[error("Invalid username: {url}")]
    InvalidUsername { url: String },

    #[error("User not found: {url}")]
    UserNotFound { url: String },

    #[error("Could not load the user page: {0}")]
    UserPage(#[source] FetchError),

    #[error("Extractor setup failed: {0}")]
    Extractor(#[from] ExtractError),
}

impl ScrapeError {
    /// Returns true for input errors caught before any request was made
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::EmptyUsername | Self::NoResourceTypeSelected | Self::Target(_)
        )
    }
}

/// Merged outcome of a scrape
#[derive(Debug, Clone)]
pub struct ScrapeReport {
    pub username: String,
    pub user_url: String,
    pub comments: Option<StreamReport<Comment>>,
    pub posts: Option<StreamReport<Post>>,
}

impl ScrapeReport {
    pub fn comments(&self) -> &[Comment] {
        self.comments
            .as_ref()
            .map(|report| report.records.as_slice())
            .unwrap_or_default()
    }

    pub fn posts(&self) -> &[Post] {
        self.posts
            .as_ref()
            .map(|report| report.records.as_slice())
            .unwrap_or_default()
    }

    /// Returns true if any enabled stream may be incomplete
    pub fn is_partial(&self) -> bool {
        self.warnings().next().is_some()
    }

    /// Warnings of all partial streams
    pub fn warnings(&self) -> impl Iterator<Item = String> + '_ {
        let comments = self.comments.as_ref().and_then(StreamReport::warning);
        let posts = self.posts.as_ref().and_then(StreamReport::warning);
        comments.into_iter().chain(posts)
    }
}

/// Main scrape coordinator structure
pub struct ScrapeCoordinator {
    base_url: String,
    fetcher: Arc<dyn PageFetcher>,
    classifier: Arc<dyn PageClassifier>,
    settings: PaginationSettings,
}

impl ScrapeCoordinator {
    /// Creates a coordinator for the forum at `base_url`
    ///
    /// `base_url` is expected to be normalized (see `normalize_base_url`).
    pub fn new(base_url: impl Into<String>, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            base_url: base_url.into(),
            fetcher,
            classifier: Arc::new(MarkerClassifier::new()),
            settings: PaginationSettings::default(),
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn PageClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_settings(mut self, settings: PaginationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Scrapes the selected streams of `username`
    ///
    /// # Returns
    ///
    /// * `Ok(ScrapeReport)` - Records of every enabled stream, complete or partial
    /// * `Err(ScrapeError)` - Bad input, or the user could not be validated
    pub async fn scrape(
        &self,
        username: &str,
        want_comments: bool,
        want_posts: bool,
    ) -> Result<ScrapeReport, ScrapeError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ScrapeError::EmptyUsername);
        }
        if !want_comments && !want_posts {
            return Err(ScrapeError::NoResourceTypeSelected);
        }

        let urls = UserUrls::new(&self.base_url, username).map_err(ScrapeError::Target)?;
        let urls = Arc::new(urls);
        self.validate_user(&urls).await?;
        tracing::info!("Valid username: {}", urls.user_page());

        let comment_task = if want_comments {
            Some(self.spawn_engine(&urls, CommentExtractor::new()?))
        } else {
            None
        };
        let post_task = if want_posts {
            Some(self.spawn_engine(&urls, PostExtractor::new()?))
        } else {
            None
        };

        let (comments, posts) = tokio::join!(join_stream(comment_task), join_stream(post_task));

        Ok(ScrapeReport {
            username: username.to_string(),
            user_url: urls.user_page().to_string(),
            comments,
            posts,
        })
    }

    /// Checks the base user page; any non-valid page aborts the scrape
    async fn validate_user(&self, urls: &UserUrls) -> Result<(), ScrapeError> {
        let url = urls.user_page();
        let body = self
            .fetcher
            .fetch_error_page(url)
            .await
            .map_err(ScrapeError::UserPage)?;

        let status = {
            let document = parse_document(&body);
            self.classifier.classify_user_page(&document)
        };

        match status {
            UserPageStatus::Valid => Ok(()),
            UserPageStatus::InvalidUsername => Err(ScrapeError::InvalidUsername {
                url: url.to_string(),
            }),
            UserPageStatus::UserNotFound => Err(ScrapeError::UserNotFound {
                url: url.to_string(),
            }),
        }
    }

    fn spawn_engine<X: Extractor>(
        &self,
        urls: &Arc<UserUrls>,
        extractor: X,
    ) -> JoinHandle<StreamReport<X::Record>> {
        let engine = PaginationEngine::new(
            Arc::clone(urls),
            Arc::clone(&self.fetcher),
            Arc::clone(&self.classifier),
            extractor,
            self.settings.clone(),
        );
        tokio::spawn(engine.run())
    }
}

/// Awaits a stream task; a task that died is reported as an empty failed stream
async fn join_stream<R: Record>(
    task: Option<JoinHandle<StreamReport<R>>>,
) -> Option<StreamReport<R>> {
    let task = task?;
    match task.await {
        Ok(report) => Some(report),
        Err(e) => {
            tracing::error!("{} task did not complete: {}", R::RESOURCE, e);
            Some(StreamReport::lost(R::RESOURCE, e.to_string()))
        }
    }
}

/// Runs a complete scrape from configuration
///
/// Builds the HTTP fetcher and pagination settings from `config`, then scrapes
/// `config.target.username` with the configured resource toggles.
///
/// # Example
///
/// ```no_run
/// use activity_harvest::config::load_config;
/// use activity_harvest::crawler::scrape;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("harvest.toml"))?;
/// let report = scrape(&config).await?;
/// println!("{} comments, {} posts", report.comments().len(), report.posts().len());
/// # Ok(())
/// # }
/// ```
pub async fn scrape(config: &Config) -> Result<ScrapeReport, HarvestError> {
    let base_url = normalize_base_url(&config.target.base_url)?;
    let fetcher = HttpFetcher::from_config(&config.user_agent)?;

    let coordinator = ScrapeCoordinator::new(base_url, Arc::new(fetcher))
        .with_settings(PaginationSettings::from(&config.scrape));

    let report = coordinator
        .scrape(
            &config.target.username,
            config.scrape.comments,
            config.scrape.posts,
        )
        .await?;
    Ok(report)
}
