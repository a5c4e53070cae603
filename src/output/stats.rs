//! End-of-run summary
//!
//! This module provides functionality for displaying per-stream results
//! of a scrape.

use crate::crawler::{ScrapeReport, StreamReport};
use std::path::PathBuf;

/// Summary line of one stream
pub fn stream_line<R>(report: &StreamReport<R>) -> String {
    let mut line = format!(
        "  {}: {} records from {} pages ({})",
        report.resource,
        report.records.len(),
        report.pages_completed,
        report.status
    );
    if report.skipped > 0 {
        line.push_str(&format!(", {} entries skipped", report.skipped));
    }
    if report.duplicates > 0 {
        line.push_str(&format!(", {} duplicates dropped", report.duplicates));
    }
    line
}

/// Prints the summary to stdout in a formatted manner
///
/// # Arguments
///
/// * `report` - The finished scrape
/// * `destinations` - Files written by the sink, empty for a dry run
pub fn print_summary(report: &ScrapeReport, destinations: &[PathBuf]) {
    println!("=== Scrape Summary ===\n");
    println!("User: {} ({})", report.username, report.user_url);
    println!();

    println!("Streams:");
    if let Some(comments) = &report.comments {
        println!("{}", stream_line(comments));
    }
    if let Some(posts) = &report.posts {
        println!("{}", stream_line(posts));
    }
    println!();

    let warnings: Vec<String> = report.warnings().collect();
    if !warnings.is_empty() {
        println!("Warnings ({}):", warnings.len());
        for warning in &warnings {
            println!("  - {}", warning);
        }
        println!();
    }

    if destinations.is_empty() {
        println!("No output written");
    } else {
        println!("Output:");
        for path in destinations {
            println!("  {}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Post, ResourceType};
    use crate::state::StreamStatus;

    #[test]
    fn test_stream_line() {
        let report: StreamReport<Post> = StreamReport {
            resource: ResourceType::Post,
            status: StreamStatus::FailedAfterPages(2),
            records: Vec::new(),
            pages_completed: 2,
            skipped: 3,
            duplicates: 0,
            failure: Some("timeout".to_string()),
        };

        assert_eq!(
            stream_line(&report),
            "  posts: 0 records from 2 pages (failed after 2 pages), 3 entries skipped"
        );
    }
}
