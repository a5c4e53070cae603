//! Extraction of typed records from listing pages
//!
//! Each listing entry yields an explicit outcome: a record, or `Skipped` when
//! the entry lacks a field (the forum soft-deletes comments by stripping the
//! comment block while keeping the parent post). A skipped entry never affects
//! its neighbours. Only a structurally broken comment entry, one without its
//! parent-post block, is reported as an error.

use crate::crawler::parser::{attr, first, text_of};
use crate::records::{Comment, Post, Record};
use scraper::html::Select;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// Errors raised while extracting entries
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("The selector could not be compiled: {0}")]
    Selector(String),

    #[error("Comment entry is missing its parent post {0}")]
    MissingParent(&'static str),
}

/// Result of extracting one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome<R> {
    Extracted(R),
    Skipped,
}

fn compile(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|_| ExtractError::Selector(css.to_string()))
}

/// Turns listing entries into records
pub trait Extractor: Send + Sync + 'static {
    type Record: Record;

    /// Selector matching one entry block on a listing page
    fn entry_selector(&self) -> &Selector;

    /// Extracts a single entry
    fn extract_entry(
        &self,
        entry: ElementRef<'_>,
    ) -> Result<EntryOutcome<Self::Record>, ExtractError>;

    /// Lazily extracts every entry of `document`, in page order
    ///
    /// Calling this again on the same document yields the same sequence.
    fn extract<'a>(&'a self, document: &'a Html) -> Entries<'a, Self>
    where
        Self: Sized,
    {
        Entries {
            extractor: self,
            inner: document.select(self.entry_selector()),
        }
    }
}

/// Iterator over the entry outcomes of one document
pub struct Entries<'a, X> {
    extractor: &'a X,
    inner: Select<'a, 'a>,
}

impl<'a, X: Extractor> Iterator for Entries<'a, X> {
    type Item = Result<EntryOutcome<X::Record>, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|entry| self.extractor.extract_entry(entry))
    }
}

/// Extracts comments from `div.comment-list` entries
#[derive(Debug, Clone)]
pub struct CommentExtractor {
    entry: Selector,
    parent: Selector,
    parent_title: Selector,
    parent_author: Selector,
    comment: Selector,
    details: Selector,
    author: Selector,
    time: Selector,
    body: Selector,
    content: Selector,
    actions: Selector,
    link: Selector,
}

/// Fields of the comment itself, all of which must resolve
struct CommentFields {
    author: String,
    author_url: String,
    time: String,
    body: String,
    permalink: String,
    context: String,
}

impl CommentExtractor {
    pub fn new() -> Result<Self, ExtractError> {
        Ok(Self {
            entry: compile("div.comment-list")?,
            parent: compile("div.comment-parent")?,
            parent_title: compile("span.title a")?,
            parent_author: compile("span.author a")?,
            comment: compile("div.comment")?,
            details: compile("div.details")?,
            author: compile("a.author")?,
            time: compile("span.since time")?,
            body: compile("div.body")?,
            content: compile("div.content")?,
            actions: compile("div.actions")?,
            link: compile("a")?,
        })
    }

    /// Href of the action link whose label is exactly `label`
    fn action_href(&self, actions: ElementRef<'_>, label: &str) -> Option<String> {
        actions
            .select(&self.link)
            .find(|link| text_of(*link).trim() == label)
            .and_then(|link| attr(link, "href"))
    }

    fn comment_fields(&self, entry: ElementRef<'_>) -> Option<CommentFields> {
        let comment = first(entry, &self.comment)?;
        let details = first(comment, &self.details)?;
        let body = first(comment, &self.body)?;

        let author_link = first(details, &self.author)?;
        let time = first(details, &self.time)?;
        let content = first(body, &self.content)?;
        let actions = first(comment, &self.actions)?;

        Some(CommentFields {
            author: text_of(author_link),
            author_url: attr(author_link, "href")?,
            time: attr(time, "title")?,
            body: text_of(content),
            permalink: self.action_href(actions, "permalink")?,
            context: self.action_href(actions, "context")?,
        })
    }
}

impl Extractor for CommentExtractor {
    type Record = Comment;

    fn entry_selector(&self) -> &Selector {
        &self.entry
    }

    fn extract_entry(&self, entry: ElementRef<'_>) -> Result<EntryOutcome<Comment>, ExtractError> {
        let parent = first(entry, &self.parent).ok_or(ExtractError::MissingParent("block"))?;
        let title_link =
            first(parent, &self.parent_title).ok_or(ExtractError::MissingParent("title"))?;
        let author_link =
            first(parent, &self.parent_author).ok_or(ExtractError::MissingParent("author"))?;
        let parent_url =
            attr(title_link, "href").ok_or(ExtractError::MissingParent("reference"))?;
        let parent_author_url =
            attr(author_link, "href").ok_or(ExtractError::MissingParent("author reference"))?;

        let Some(fields) = self.comment_fields(entry) else {
            return Ok(EntryOutcome::Skipped);
        };

        Ok(EntryOutcome::Extracted(Comment {
            time: fields.time,
            body: fields.body,
            author: fields.author,
            author_url: fields.author_url,
            permalink: fields.permalink,
            context: fields.context,
            parent_title: text_of(title_link),
            parent_url,
            parent_author: text_of(author_link),
            parent_author_url,
        }))
    }
}

/// Extracts posts from `div.post-list` entries
#[derive(Debug, Clone)]
pub struct PostExtractor {
    entry: Selector,
    body: Selector,
    title: Selector,
    since: Selector,
    time: Selector,
    author: Selector,
}

impl PostExtractor {
    pub fn new() -> Result<Self, ExtractError> {
        Ok(Self {
            entry: compile("div.post-list")?,
            body: compile("div.body")?,
            title: compile("div.top a")?,
            since: compile("span.since")?,
            time: compile("time")?,
            author: compile("a")?,
        })
    }

    fn post(&self, entry: ElementRef<'_>) -> Option<Post> {
        let body = first(entry, &self.body)?;
        let title_link = first(body, &self.title)?;
        let since = first(body, &self.since)?;
        let time = first(since, &self.time)?;
        let author_link = first(since, &self.author)?;

        Some(Post {
            time: attr(time, "title")?,
            title: text_of(title_link),
            url: attr(title_link, "href")?,
            author: text_of(author_link),
            author_url: attr(author_link, "href")?,
        })
    }
}

impl Extractor for PostExtractor {
    type Record = Post;

    fn entry_selector(&self) -> &Selector {
        &self.entry
    }

    fn extract_entry(&self, entry: ElementRef<'_>) -> Result<EntryOutcome<Post>, ExtractError> {
        Ok(match self.post(entry) {
            Some(post) => EntryOutcome::Extracted(post),
            None => EntryOutcome::Skipped,
        })
    }
}
