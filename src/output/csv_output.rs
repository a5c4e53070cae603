//! CSV record sink
//!
//! Writes one timestamped CSV file per enabled resource type.

use crate::crawler::ScrapeReport;
use crate::output::traits::{OutputError, OutputResult, RecordSink};
use crate::records::{Comment, Post, ResourceType};
use chrono::Local;
use csv::Writer;
use std::fs::File;
use std::path::{Path, PathBuf};

pub const COMMENT_HEADER: [&str; 10] = [
    "Comment_Time",
    "Comment",
    "Comment_Author",
    "Comment_Author_URL",
    "Comment_PermaLink",
    "Comment_Context",
    "Parent_Post_Title",
    "Parent_Post_URL",
    "Parent_Post_Author",
    "Parent_Post_Author_URL",
];

pub const POST_HEADER: [&str; 5] = [
    "Post_Time",
    "Post_Title",
    "Post_URL",
    "Post_Author",
    "Author_URL",
];

struct CsvFile {
    path: PathBuf,
    writer: Writer<File>,
}

impl CsvFile {
    fn create(path: PathBuf, header: &[&str]) -> OutputResult<Self> {
        let mut writer = Writer::from_path(&path)?;
        writer.write_record(header)?;
        Ok(Self { path, writer })
    }
}

/// CSV sink writing `{username}-Comments.{stamp}.csv` and `{username}-Posts.{stamp}.csv`
pub struct CsvSink {
    comments: Option<CsvFile>,
    posts: Option<CsvFile>,
}

impl CsvSink {
    /// Creates the output directory and opens a file per enabled resource
    ///
    /// Header rows are written immediately, so an enabled resource with no
    /// records still produces a header-only file.
    pub fn create(
        directory: &Path,
        username: &str,
        resources: &[ResourceType],
    ) -> OutputResult<Self> {
        let stamp = Local::now().format("%Y-%m-%dT%H.%M.%S%.6f").to_string();
        Self::create_with_stamp(directory, username, resources, &stamp)
    }

    /// Same as `create`, with a caller-chosen file name stamp
    pub fn create_with_stamp(
        directory: &Path,
        username: &str,
        resources: &[ResourceType],
        stamp: &str,
    ) -> OutputResult<Self> {
        std::fs::create_dir_all(directory)?;

        let mut sink = Self {
            comments: None,
            posts: None,
        };

        for resource in resources {
            let path = csv_path(directory, username, *resource, stamp);
            tracing::debug!("Opening {} output {}", resource, path.display());
            match resource {
                ResourceType::Comment => {
                    sink.comments = Some(CsvFile::create(path, &COMMENT_HEADER)?)
                }
                ResourceType::Post => sink.posts = Some(CsvFile::create(path, &POST_HEADER)?),
            }
        }

        Ok(sink)
    }
}

/// Output path for one resource type
pub fn csv_path(directory: &Path, username: &str, resource: ResourceType, stamp: &str) -> PathBuf {
    let kind = match resource {
        ResourceType::Comment => "Comments",
        ResourceType::Post => "Posts",
    };
    directory.join(format!("{}-{}.{}.csv", username, kind, stamp))
}

impl RecordSink for CsvSink {
    fn append_comment(&mut self, comment: &Comment) -> OutputResult<()> {
        let file = self
            .comments
            .as_mut()
            .ok_or(OutputError::StreamNotOpened("comment"))?;
        file.writer.write_record(comment.to_row())?;
        Ok(())
    }

    fn append_post(&mut self, post: &Post) -> OutputResult<()> {
        let file = self
            .posts
            .as_mut()
            .ok_or(OutputError::StreamNotOpened("post"))?;
        file.writer.write_record(post.to_row())?;
        Ok(())
    }

    fn finish(&mut self, _report: &ScrapeReport) -> OutputResult<()> {
        for file in self.comments.iter_mut().chain(self.posts.iter_mut()) {
            file.writer.flush()?;
            tracing::info!("Wrote {}", file.path.display());
        }
        Ok(())
    }

    fn destinations(&self) -> Vec<PathBuf> {
        self.comments
            .iter()
            .chain(self.posts.iter())
            .map(|file| file.path.clone())
            .collect()
    }
}
