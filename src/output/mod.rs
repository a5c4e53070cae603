//! Output module for persisting scrape results
//!
//! This module handles:
//! - Writing comments and posts through the `RecordSink` trait
//! - CSV files and the SQLite database as sinks
//! - The end-of-run summary

mod csv_output;
mod sqlite_output;
pub mod stats;
mod traits;

pub use csv_output::{csv_path, CsvSink, COMMENT_HEADER, POST_HEADER};
pub use sqlite_output::{database_path, SqliteSink};
pub use stats::print_summary;
pub use traits::{OutputError, OutputResult, RecordSink, WriteStats};

use crate::config::{OutputConfig, OutputFormat};
use crate::crawler::ScrapeReport;
use crate::records::ResourceType;
use std::path::PathBuf;

/// Opens the sink selected by `config` for the streams present in `report`
///
/// # Arguments
///
/// * `config` - Output directory and format
/// * `report` - The scrape whose records will be written
/// * `config_hash` - Stored with SQLite runs
pub fn open_sink(
    config: &OutputConfig,
    report: &ScrapeReport,
    config_hash: &str,
) -> OutputResult<Box<dyn RecordSink>> {
    match config.format {
        OutputFormat::Csv => {
            let mut resources = Vec::new();
            if report.comments.is_some() {
                resources.push(ResourceType::Comment);
            }
            if report.posts.is_some() {
                resources.push(ResourceType::Post);
            }
            let sink = CsvSink::create(&config.directory, &report.username, &resources)?;
            Ok(Box::new(sink))
        }
        OutputFormat::Sqlite => {
            let sink = SqliteSink::open(&config.directory, &report.username, config_hash)?;
            Ok(Box::new(sink))
        }
    }
}

/// Streams every record of `report` into `sink`, then finishes it
///
/// # Returns
///
/// * `Ok(WriteStats)` - Number of records handed to the sink
/// * `Err(OutputError)` - The sink failed and was abandoned; output may be incomplete
pub fn write_report(report: &ScrapeReport, sink: &mut dyn RecordSink) -> OutputResult<WriteStats> {
    let result = write_records(report, sink);
    if let Err(e) = &result {
        tracing::error!("Writing output failed: {}", e);
        sink.abandon();
    }
    result
}

fn write_records(report: &ScrapeReport, sink: &mut dyn RecordSink) -> OutputResult<WriteStats> {
    let mut stats = WriteStats::default();

    for comment in report.comments() {
        sink.append_comment(comment)?;
        stats.comments += 1;
    }
    for post in report.posts() {
        sink.append_post(post)?;
        stats.posts += 1;
    }

    sink.finish(report)?;
    Ok(stats)
}

/// Opens the configured sink and writes all of `report` into it
///
/// Returns the write counts and the files that were written.
pub fn persist(
    config: &OutputConfig,
    report: &ScrapeReport,
    config_hash: &str,
) -> crate::Result<(WriteStats, Vec<PathBuf>)> {
    let mut sink = open_sink(config, report, config_hash)?;
    let stats = write_report(report, sink.as_mut())?;
    Ok((stats, sink.destinations()))
}
