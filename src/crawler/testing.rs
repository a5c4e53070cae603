//! Fixtures for crawler unit tests: forum-shaped HTML and a scripted fetcher

use crate::crawler::fetcher::{FetchError, FetchErrorKind, PageFetcher};
use crate::records::{Comment, Post, ResourceType};
use crate::url::UserUrls;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

pub const BASE_URL: &str = "https://forum.example";
pub const USERNAME: &str = "alice";

pub fn urls() -> UserUrls {
    UserUrls::new(BASE_URL, USERNAME).unwrap()
}

pub fn user_page(title: &str) -> String {
    format!(
        r#"<html><head><title>{}</title></head><body><div class="container"></div></body></html>"#,
        title
    )
}

fn wrap_main_content(inner: &str) -> String {
    format!(
        r#"<html><head><title>alice - Forum</title></head><body>
<div class="container"><main class="main"><div class="main-content">
{}
</div></main></div>
</body></html>"#,
        inner
    )
}

pub fn listing_page(entries: &[String]) -> String {
    wrap_main_content(&entries.concat())
}

pub fn exhausted_page(message: &str) -> String {
    wrap_main_content(&format!(r#"<div class="empty"><p>{}</p></div>"#, message))
}

/// One comment-list entry; each flag controls whether a field is rendered
#[derive(Debug, Clone)]
pub struct CommentHtml {
    pub id: u32,
    pub parent: bool,
    pub author: bool,
    pub time: bool,
    pub body: bool,
    pub permalink: bool,
    pub context: bool,
}

impl CommentHtml {
    pub fn live(id: u32) -> Self {
        Self {
            id,
            parent: true,
            author: true,
            time: true,
            body: true,
            permalink: true,
            context: true,
        }
    }

    pub fn render(&self) -> String {
        let id = self.id;
        let parent = if self.parent {
            format!(
                r#"<div class="comment-parent">
  <span class="title"><a href="/p/{id}/post-{id}">Post {id}</a></span>
  <span class="author"><a href="/u/op{id}">op{id}</a></span>
</div>"#
            )
        } else {
            String::new()
        };
        let author = if self.author {
            r#"<a class="author" href="/u/alice">alice</a>"#.to_string()
        } else {
            String::new()
        };
        let time = if self.time {
            format!(r#"<span class="since"><time title="2023-05-01T12:00:{id:02}">1 day ago</time></span>"#)
        } else {
            String::new()
        };
        let body = if self.body {
            format!(r#"<div class="content">Comment body {id}</div>"#)
        } else {
            String::new()
        };
        let permalink = if self.permalink {
            format!(r#"<a href="/p/{id}/x/c/{id}">permalink</a>"#)
        } else {
            String::new()
        };
        let context = if self.context {
            format!(r#"<a href="/p/{id}/x/c/{id}?context=3">context</a>"#)
        } else {
            String::new()
        };

        format!(
            r##"<div class="comment-list">
{parent}
<div class="comment">
  <div class="details">{author}{time}</div>
  <div class="body">{body}</div>
  <div class="actions">{permalink}{context}<a href="#">reply</a></div>
</div>
</div>"##
        )
    }
}

pub fn comment(id: u32) -> Comment {
    Comment {
        time: format!("2023-05-01T12:00:{:02}", id),
        body: format!("Comment body {}", id),
        author: "alice".to_string(),
        author_url: "/u/alice".to_string(),
        permalink: format!("/p/{}/x/c/{}", id, id),
        context: format!("/p/{}/x/c/{}?context=3", id, id),
        parent_title: format!("Post {}", id),
        parent_url: format!("/p/{}/post-{}", id, id),
        parent_author: format!("op{}", id),
        parent_author_url: format!("/u/op{}", id),
    }
}

/// One post-list entry; each flag controls whether a field is rendered
#[derive(Debug, Clone)]
pub struct PostHtml {
    pub id: u32,
    pub title: bool,
    pub time: bool,
    pub author: bool,
}

impl PostHtml {
    pub fn live(id: u32) -> Self {
        Self {
            id,
            title: true,
            time: true,
            author: true,
        }
    }

    pub fn render(&self) -> String {
        let id = self.id;
        let title = if self.title {
            format!(r#"<a href="/p/{id}/post-{id}">Post title {id}</a>"#)
        } else {
            String::new()
        };
        let time = if self.time {
            format!(r#"<time title="2023-04-01T08:30:{id:02}">2 days ago</time>"#)
        } else {
            String::new()
        };
        let author = if self.author {
            r#" by <a href="/u/alice">alice</a>"#.to_string()
        } else {
            String::new()
        };

        format!(
            r#"<div class="post-list">
<div class="body">
  <div class="top">{title}</div>
  <div class="details"><span class="since">posted {time}{author}</span></div>
</div>
</div>"#
        )
    }
}

pub fn post(id: u32) -> Post {
    Post {
        time: format!("2023-04-01T08:30:{:02}", id),
        title: format!("Post title {}", id),
        url: format!("/p/{}/post-{}", id, id),
        author: "alice".to_string(),
        author_url: "/u/alice".to_string(),
    }
}

pub fn comment_page(ids: std::ops::RangeInclusive<u32>) -> String {
    let entries: Vec<String> = ids.map(|id| CommentHtml::live(id).render()).collect();
    listing_page(&entries)
}

pub fn post_page(ids: std::ops::RangeInclusive<u32>) -> String {
    let entries: Vec<String> = ids.map(|id| PostHtml::live(id).render()).collect();
    listing_page(&entries)
}

/// Fetcher that serves canned responses and records every request
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    pages: HashMap<String, Result<String, FetchErrorKind>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_page(self, title: &str) -> Self {
        let url = urls().user_page().to_string();
        self.with_page(&url, user_page(title))
    }

    pub fn with_listing(self, resource: ResourceType, page: u32, body: String) -> Self {
        let url = urls().listing_page(resource, page);
        self.with_page(&url, body)
    }

    pub fn with_listing_failure(
        mut self,
        resource: ResourceType,
        page: u32,
        kind: FetchErrorKind,
    ) -> Self {
        self.pages
            .insert(urls().listing_page(resource, page), Err(kind));
        self
    }

    pub fn with_page(mut self, url: &str, body: String) -> Self {
        self.pages.insert(url.to_string(), Ok(body));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Page numbers requested for one resource listing, in request order
    pub fn requested_pages(&self, resource: ResourceType) -> Vec<u32> {
        self.requests()
            .iter()
            .filter(|url| url.contains(resource.suffix()))
            .filter_map(|url| url.rsplit("&page=").next()?.parse().ok())
            .collect()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        match self.pages.get(url) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(kind)) => Err(FetchError::new(url, kind.clone())),
            None => Err(FetchError::new(
                url,
                FetchErrorKind::Other("no scripted response".to_string()),
            )),
        }
    }
}
