//! Activity-Harvest main entry point
//!
//! This is the command-line interface for scraping a forum user's comments and posts.

use activity_harvest::config::{load_config_with_hash, validate, Config, OutputFormat};
use activity_harvest::crawler::scrape;
use activity_harvest::output::{persist, print_summary};
use activity_harvest::url::{normalize_base_url, UserUrls};
use activity_harvest::ResourceType;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Activity-Harvest: a forum user activity scraper
///
/// Walks a user's comment and post listings page by page, newest first,
/// and writes every entry to CSV files or a SQLite database.
#[derive(Parser, Debug)]
#[command(name = "activity-harvest")]
#[command(version)]
#[command(about = "Scrape a forum user's comments and posts", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (optional; every setting has a default)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// User to scrape (overrides [target] username)
    #[arg(short = 'u', long)]
    username: Option<String>,

    /// Forum base URL (overrides [target] base-url)
    #[arg(long)]
    base_url: Option<String>,

    /// Skip the comment listings
    #[arg(long)]
    no_comments: bool,

    /// Skip the post listings
    #[arg(long)]
    no_posts: bool,

    /// Output directory (overrides [output] directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format (overrides [output] format)
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Page limit per resource type, 0 for no limit (overrides [scrape] max-pages)
    #[arg(long)]
    max_pages: Option<u32>,

    /// Validate config and show what would be scraped without making requests
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the file configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(username) = &self.username {
            config.target.username = username.clone();
        }
        if let Some(base_url) = &self.base_url {
            config.target.base_url = base_url.clone();
        }
        if self.no_comments {
            config.scrape.comments = false;
        }
        if self.no_posts {
            config.scrape.posts = false;
        }
        if let Some(directory) = &self.output_dir {
            config.output.directory = directory.clone();
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(max_pages) = self.max_pages {
            config.scrape.max_pages = max_pages;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    (cfg, hash)
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            (Config::default(), "defaults".to_string())
        }
    };

    cli.apply_overrides(&mut config);
    if let Err(e) = validate(&config) {
        tracing::error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else {
        handle_scrape(&config, &config_hash, cli.quiet).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("activity_harvest=info,warn"),
            1 => EnvFilter::new("activity_harvest=debug,info"),
            2 => EnvFilter::new("activity_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be requested
fn handle_dry_run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let base_url = normalize_base_url(&config.target.base_url)?;
    let username = config.target.username.trim();

    println!("=== Activity-Harvest Dry Run ===\n");

    println!("Target:");
    println!("  Forum: {}", base_url);
    println!("  User: {}", username);

    println!("\nScrape:");
    println!("  Comments: {}", config.scrape.comments);
    println!("  Posts: {}", config.scrape.posts);
    if config.scrape.max_pages == 0 {
        println!("  Page limit: none");
    } else {
        println!("  Page limit: {} per resource", config.scrape.max_pages);
    }
    println!("  Request delay: {}ms", config.scrape.request_delay_ms);
    println!("  Deduplicate: {}", config.scrape.dedupe);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory.display());
    println!("  Format: {:?}", config.output.format);

    if username.is_empty() {
        println!("\n✗ No username configured");
        return Ok(());
    }

    let urls = UserUrls::new(&base_url, username)?;
    println!("\n✓ Configuration is valid");
    println!("✓ Would validate {}", urls.user_page());
    for resource in ResourceType::all() {
        let enabled = match resource {
            ResourceType::Comment => config.scrape.comments,
            ResourceType::Post => config.scrape.posts,
        };
        if enabled {
            println!("✓ Would start {} at {}", resource, urls.listing_page(resource, 1));
        }
    }

    Ok(())
}

/// Handles the main scrape operation
async fn handle_scrape(
    config: &Config,
    config_hash: &str,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Scraping {} (comments: {}, posts: {})",
        config.target.username,
        config.scrape.comments,
        config.scrape.posts
    );

    let report = match scrape(config).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            return Err(e.into());
        }
    };

    for warning in report.warnings() {
        tracing::warn!("{}", warning);
    }

    let (stats, destinations) = persist(&config.output, &report, config_hash)?;
    tracing::info!(
        "Wrote {} comments and {} posts",
        stats.comments,
        stats.posts
    );

    if !quiet {
        print_summary(&report, &destinations);
    }

    Ok(())
}
