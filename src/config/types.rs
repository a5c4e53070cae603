use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for Activity-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub scrape: ScrapeConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Which forum and which user to scrape
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    /// Root of the forum (e.g., "https://greatawakening.win")
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Username to scrape; may also be supplied on the command line
    #[serde(default)]
    pub username: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            username: String::new(),
        }
    }
}

/// Pagination behavior
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeConfig {
    /// Scrape the comment listing
    #[serde(default = "default_true")]
    pub comments: bool,

    /// Scrape the post listing
    #[serde(default = "default_true")]
    pub posts: bool,

    /// Maximum pages per resource type (0 disables the cap)
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Delay between two page requests of the same stream (milliseconds)
    #[serde(rename = "request-delay-ms", default)]
    pub request_delay_ms: u64,

    /// Drop records already seen earlier in the same stream
    #[serde(default = "default_true")]
    pub dedupe: bool,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            comments: true,
            posts: true,
            max_pages: default_max_pages(),
            request_delay_ms: 0,
            dedupe: true,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the scraper
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Version of the scraper
    #[serde(default = "default_agent_version")]
    pub version: String,

    /// URL with information about the operator
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            version: default_agent_version(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!("{}/{} (+{})", self.name, self.version, contact),
            None => format!("{}/{}", self.name, self.version),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory that receives the CSV files or the SQLite database
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,

    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            format: OutputFormat::default(),
        }
    }
}

/// Persistence backend for scraped records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Sqlite,
}

fn default_base_url() -> String {
    "https://greatawakening.win".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_pages() -> u32 {
    1000
}

fn default_agent_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_agent_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("./UserData")
}
