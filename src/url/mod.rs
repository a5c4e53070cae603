//! URL construction for user pages and paginated listings
//!
//! Listing URLs follow the forum's fixed layout:
//! `{base}/u/{username}{suffix}&sort=new&page={n}`.

use crate::records::ResourceType;
use crate::{ConfigError, ConfigResult};
use url::Url;

const USER_SEGMENT: &str = "u";
const SORT_SUFFIX: &str = "&sort=new";
const PAGE_SUFFIX: &str = "&page=";

/// Parses and normalizes a forum base URL
///
/// The base must be an absolute http(s) URL. Trailing slashes are removed so
/// that path segments can be appended with a single separator.
///
/// # Example
///
/// ```
/// use activity_harvest::url::normalize_base_url;
///
/// let base = normalize_base_url("https://GreatAwakening.win/").unwrap();
/// assert_eq!(base, "https://greatawakening.win");
/// ```
pub fn normalize_base_url(base: &str) -> ConfigResult<String> {
    let parsed = Url::parse(base.trim())
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", base, e)))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            base
        )));
    }
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

/// URLs belonging to one user on one forum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUrls {
    user_url: String,
}

impl UserUrls {
    /// Builds the URL set for `username` below `base`
    ///
    /// The username is appended as a single percent-encoded path segment, so
    /// characters such as `?`, `#` or `/` cannot alter the requested URL.
    pub fn new(base: &str, username: &str) -> ConfigResult<Self> {
        let mut url = Url::parse(base.trim_end_matches('/'))
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", base, e)))?;

        url.path_segments_mut()
            .map_err(|_| ConfigError::InvalidUrl(format!("base-url '{}' cannot have a path", base)))?
            .pop_if_empty()
            .push(USER_SEGMENT)
            .push(username);

        Ok(Self {
            user_url: url.into(),
        })
    }

    /// The user's unpaginated profile page
    pub fn user_page(&self) -> &str {
        &self.user_url
    }

    /// One page of a resource listing, newest first
    pub fn listing_page(&self, resource: ResourceType, page: u32) -> String {
        format!(
            "{}{}{}{}{}",
            self.user_url,
            resource.suffix(),
            SORT_SUFFIX,
            PAGE_SUFFIX,
            page
        )
    }
}
