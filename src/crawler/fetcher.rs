//! HTTP fetcher implementation
//!
//! This module is the boundary to the network:
//! - `PageFetcher`: the single-GET contract the pagination engine depends on
//! - `HttpFetcher`: a reqwest-backed implementation with a proper user agent
//! - `FetchError`: the failed URL plus a classified cause
//!
//! No retries happen here. A failed fetch ends the owning stream.

use crate::config::UserAgentConfig;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Why a page could not be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The request timed out
    Timeout,

    /// The connection could not be established
    Connect,

    /// The server answered 429 Too Many Requests
    RateLimited,

    /// The server answered with any other non-success status
    Status(u16),

    /// The response body could not be read
    Body(String),

    /// The request was cancelled before it completed
    Cancelled,

    /// Any other transport failure
    Other(String),
}

impl std::fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout => write!(f, "request timeout"),
            Self::Connect => write!(f, "connection refused"),
            Self::RateLimited => write!(f, "HTTP 429 (rate limited)"),
            Self::Status(code) => write!(f, "HTTP {}", code),
            Self::Body(e) => write!(f, "failed to read body: {}", e),
            Self::Cancelled => write!(f, "request cancelled"),
            Self::Other(e) => write!(f, "{}", e),
        }
    }
}

/// A failed page fetch
#[derive(Debug, Clone, Error)]
#[error("Failed to fetch {url}: {kind}")]
pub struct FetchError {
    pub url: String,
    pub kind: FetchErrorKind,
}

impl FetchError {
    pub fn new(url: impl Into<String>, kind: FetchErrorKind) -> Self {
        Self {
            url: url.into(),
            kind,
        }
    }

    /// Classifies a reqwest error for `url`
    pub fn from_reqwest(url: &str, error: &reqwest::Error) -> Self {
        let kind = if error.is_timeout() {
            FetchErrorKind::Timeout
        } else if error.is_connect() {
            FetchErrorKind::Connect
        } else if error.is_body() || error.is_decode() {
            FetchErrorKind::Body(error.to_string())
        } else {
            FetchErrorKind::Other(error.to_string())
        };
        Self::new(url, kind)
    }
}

/// Fetches one document per call
///
/// Implementations must be safe to share between the comment and post
/// streams, which run on separate tasks.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Performs a GET and returns the raw document
    ///
    /// Any non-success response is a failure.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;

    /// Performs a GET that also returns the body of client-error responses
    ///
    /// Used for pages the forum answers with a 4xx status and a readable
    /// error document, such as the page of an unknown user.
    async fn fetch_error_page(&self, url: &str) -> Result<String, FetchError> {
        self.fetch(url).await
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use activity_harvest::config::UserAgentConfig;
/// use activity_harvest::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     name: "Harvester".to_string(),
///     version: "1.0".to_string(),
///     contact_url: Some("https://example.com/about".to_string()),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// reqwest-backed fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher with a client configured from `config`
    pub fn from_config(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }
}

impl HttpFetcher {
    async fn get(&self, url: &str, accept_client_errors: bool) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, &e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::new(url, FetchErrorKind::RateLimited));
        }
        if !status.is_success() {
            if accept_client_errors && status.is_client_error() {
                tracing::debug!("{} answered {}, reading error page", url, status);
            } else {
                return Err(FetchError::new(url, FetchErrorKind::Status(status.as_u16())));
            }
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::new(url, FetchErrorKind::Body(e.to_string())))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    /// Fetches `url` and returns its body
    ///
    /// # Status handling
    ///
    /// | Status | `fetch` | `fetch_error_page` |
    /// |--------|---------|--------------------|
    /// | 2xx | Body | Body |
    /// | 429 | `RateLimited` | `RateLimited` |
    /// | other 4xx | `Status` | Body |
    /// | 5xx and the rest | `Status` | `Status` |
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.get(url, false).await
    }

    async fn fetch_error_page(&self, url: &str) -> Result<String, FetchError> {
        self.get(url, true).await
    }
}
