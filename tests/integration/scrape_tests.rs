//! Integration tests for the scraper
//!
//! These tests use wiremock to serve forum-shaped pages and drive the
//! full scrape cycle end-to-end over HTTP, through to the CSV and SQLite sinks.

use activity_harvest::config::{Config, OutputFormat};
use activity_harvest::crawler::{scrape, ScrapeError};
use activity_harvest::output::{open_sink, write_report, COMMENT_HEADER};
use activity_harvest::{HarvestError, StreamStatus};
use std::path::Path;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USERNAME: &str = "alice";

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, output_dir: &Path) -> Config {
    let mut config = Config::default();
    config.target.base_url = base_url.to_string();
    config.target.username = USERNAME.to_string();
    config.user_agent.name = "TestHarvester".to_string();
    config.user_agent.version = "1.0".to_string();
    config.output.directory = output_dir.to_path_buf();
    config
}

fn page(title: &str, main_content: &str) -> String {
    format!(
        r#"<html><head><title>{}</title></head><body>
<div class="container"><main class="main"><div class="main-content">{}</div></main></div>
</body></html>"#,
        title, main_content
    )
}

fn comment_entry(id: u32) -> String {
    format!(
        r##"<div class="comment-list">
<div class="comment-parent">
  <span class="title"><a href="/p/{id}/thread">Thread {id}</a></span>
  <span class="author"><a href="/u/op">op</a></span>
</div>
<div class="comment">
  <div class="details"><a class="author" href="/u/alice">alice</a>
    <span class="since"><time title="2024-02-0{id}T10:00:00">{id} days ago</time></span></div>
  <div class="body"><div class="content">Reply number {id}</div></div>
  <div class="actions"><a href="/p/{id}/thread/c/{id}">permalink</a><a href="/p/{id}/thread/c/{id}?context=3">context</a><a href="#">reply</a></div>
</div>
</div>"##
    )
}

fn post_entry(id: u32) -> String {
    format!(
        r#"<div class="post-list"><div class="body">
<div class="top"><a href="/p/{id}/submission">Submission {id}</a></div>
<div class="details"><span class="since">posted <time title="2024-01-0{id}T08:00:00">a week ago</time> by <a href="/u/alice">alice</a></span></div>
</div></div>"#
    )
}

fn listing(ids: std::ops::RangeInclusive<u32>, entry: fn(u32) -> String) -> String {
    page("alice - Forum", &ids.map(entry).collect::<String>())
}

fn empty_listing(kind: &str) -> String {
    page(
        "alice - Forum",
        &format!(
            r#"<div class="empty"><p>This user has no more {}.</p></div>"#,
            kind
        ),
    )
}

async fn mount_user_page(server: &MockServer, status: u16, title: &str) {
    Mock::given(method("GET"))
        .and(path("/u/alice"))
        .respond_with(ResponseTemplate::new(status).set_body_string(page(title, "")))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_listing(server: &MockServer, kind: &str, page_number: u32, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/u/alice/"))
        .and(query_param("type", kind))
        .and(query_param("sort", "new"))
        .and(query_param("page", page_number.to_string()))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

fn read_csv(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .expect("Failed to open CSV output");
    reader
        .records()
        .map(|row| {
            row.expect("Malformed CSV row")
                .iter()
                .map(str::to_string)
                .collect()
        })
        .collect()
}

#[tokio::test]
async fn test_full_scrape_to_csv() {
    let mock_server = MockServer::start().await;
    let output_dir = tempfile::tempdir().unwrap();

    mount_user_page(&mock_server, 200, "alice - Forum").await;
    mount_listing(&mock_server, "comment", 1, html(listing(1..=3, comment_entry))).await;
    mount_listing(&mock_server, "comment", 2, html(listing(4..=5, comment_entry))).await;
    mount_listing(&mock_server, "comment", 3, html(empty_listing("comments"))).await;
    mount_listing(&mock_server, "post", 1, html(listing(1..=2, post_entry))).await;
    mount_listing(&mock_server, "post", 2, html(empty_listing("posts"))).await;

    let config = create_test_config(&mock_server.uri(), output_dir.path());
    let report = scrape(&config).await.expect("Scrape failed");

    assert_eq!(report.user_url, format!("{}/u/alice", mock_server.uri()));
    assert_eq!(report.comments().len(), 5);
    assert_eq!(report.posts().len(), 2);
    assert!(!report.is_partial());

    let first = &report.comments()[0];
    assert_eq!(first.body, "Reply number 1");
    assert_eq!(first.permalink, "/p/1/thread/c/1");
    assert_eq!(first.parent_title, "Thread 1");
    assert_eq!(first.parent_author, "op");

    let mut sink = open_sink(&config.output, &report, "test-hash").unwrap();
    let stats = write_report(&report, sink.as_mut()).unwrap();
    assert_eq!(stats.comments, 5);
    assert_eq!(stats.posts, 2);

    let destinations = sink.destinations();
    assert_eq!(destinations.len(), 2);

    let comments_file = destinations
        .iter()
        .find(|p| p.to_string_lossy().contains("alice-Comments."))
        .expect("No comments file written");
    let rows = read_csv(comments_file);
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[0], COMMENT_HEADER.map(str::to_string).to_vec());
    assert_eq!(rows[1][0], "2024-02-01T10:00:00");
    assert_eq!(rows[5][1], "Reply number 5");
}

#[tokio::test]
async fn test_user_not_found_requests_no_listings() {
    let mock_server = MockServer::start().await;
    let output_dir = tempfile::tempdir().unwrap();

    // The forum answers unknown users with a 404 error page
    mount_user_page(&mock_server, 404, "User Not Found - Forum").await;
    Mock::given(method("GET"))
        .and(path("/u/alice/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), output_dir.path());
    let result = scrape(&config).await;

    assert!(matches!(
        result,
        Err(HarvestError::Scrape(ScrapeError::UserNotFound { .. }))
    ));
}

#[tokio::test]
async fn test_server_error_ends_only_that_stream() {
    let mock_server = MockServer::start().await;
    let output_dir = tempfile::tempdir().unwrap();

    mount_user_page(&mock_server, 200, "alice - Forum").await;
    mount_listing(&mock_server, "comment", 1, html(listing(1..=2, comment_entry))).await;
    mount_listing(&mock_server, "comment", 2, html(empty_listing("comments"))).await;
    mount_listing(&mock_server, "post", 1, html(listing(1..=3, post_entry))).await;
    mount_listing(&mock_server, "post", 2, ResponseTemplate::new(503)).await;

    let config = create_test_config(&mock_server.uri(), output_dir.path());
    let report = scrape(&config).await.expect("Scrape failed");

    assert_eq!(report.comments().len(), 2);
    assert_eq!(
        report.comments.as_ref().unwrap().status,
        StreamStatus::Exhausted
    );

    let posts = report.posts.as_ref().unwrap();
    assert_eq!(posts.records.len(), 3);
    assert_eq!(posts.status, StreamStatus::FailedAfterPages(1));
    assert!(posts.failure.as_deref().unwrap().contains("HTTP 503"));
    assert!(report.is_partial());
}

#[tokio::test]
async fn test_rate_limited_listing_fails_stream() {
    let mock_server = MockServer::start().await;
    let output_dir = tempfile::tempdir().unwrap();

    mount_user_page(&mock_server, 200, "alice - Forum").await;
    mount_listing(&mock_server, "comment", 1, html(empty_listing("comments"))).await;
    mount_listing(&mock_server, "post", 1, html(listing(1..=2, post_entry))).await;
    mount_listing(
        &mock_server,
        "post",
        2,
        ResponseTemplate::new(429).set_body_string("Too Many Requests"),
    )
    .await;
    // Pages after the refusal are never fetched
    for page_number in [3, 4] {
        Mock::given(method("GET"))
            .and(path("/u/alice/"))
            .and(query_param("type", "post"))
            .and(query_param("page", page_number.to_string()))
            .respond_with(html(listing(3..=4, post_entry)))
            .expect(0)
            .mount(&mock_server)
            .await;
    }

    let config = create_test_config(&mock_server.uri(), output_dir.path());
    let report = scrape(&config).await.expect("Scrape failed");

    let posts = report.posts.as_ref().unwrap();
    assert_eq!(posts.status, StreamStatus::FailedAfterPages(1));
    assert_eq!(posts.records.len(), 2);
    assert!(posts.failure.as_deref().unwrap().contains("429"));
    assert!(report.is_partial());
}

#[tokio::test]
async fn test_missing_listing_page_fails_stream() {
    let mock_server = MockServer::start().await;
    let output_dir = tempfile::tempdir().unwrap();

    mount_user_page(&mock_server, 200, "alice - Forum").await;
    mount_listing(&mock_server, "comment", 1, html(listing(1..=1, comment_entry))).await;
    mount_listing(
        &mock_server,
        "comment",
        2,
        ResponseTemplate::new(404).set_body_string(page("Error 404 - Forum", "")),
    )
    .await;
    mount_listing(&mock_server, "post", 1, html(empty_listing("posts"))).await;

    let config = create_test_config(&mock_server.uri(), output_dir.path());
    let report = scrape(&config).await.expect("Scrape failed");

    let comments = report.comments.as_ref().unwrap();
    assert_eq!(comments.status, StreamStatus::FailedAfterPages(1));
    assert_eq!(comments.records.len(), 1);
    assert!(comments.failure.as_deref().unwrap().contains("HTTP 404"));
    assert_eq!(
        report.posts.as_ref().unwrap().status,
        StreamStatus::Exhausted
    );
}

#[tokio::test]
async fn test_disabled_comments_are_never_requested() {
    let mock_server = MockServer::start().await;
    let output_dir = tempfile::tempdir().unwrap();

    mount_user_page(&mock_server, 200, "alice - Forum").await;
    mount_listing(&mock_server, "post", 1, html(empty_listing("posts"))).await;
    Mock::given(method("GET"))
        .and(path("/u/alice/"))
        .and(query_param("type", "comment"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri(), output_dir.path());
    config.scrape.comments = false;

    let report = scrape(&config).await.expect("Scrape failed");
    assert!(report.comments.is_none());
    assert!(report.posts().is_empty());

    let mut sink = open_sink(&config.output, &report, "test-hash").unwrap();
    write_report(&report, sink.as_mut()).unwrap();

    let destinations = sink.destinations();
    assert_eq!(destinations.len(), 1);
    assert!(destinations[0].to_string_lossy().contains("alice-Posts."));
    assert_eq!(read_csv(&destinations[0]).len(), 1);
}

#[tokio::test]
async fn test_user_agent_header_is_sent() {
    let mock_server = MockServer::start().await;
    let output_dir = tempfile::tempdir().unwrap();

    let mut config = create_test_config(&mock_server.uri(), output_dir.path());
    config.user_agent.contact_url = Some("https://example.com/about".to_string());
    config.scrape.comments = false;

    Mock::given(method("GET"))
        .and(path("/u/alice"))
        .and(header(
            "user-agent",
            "TestHarvester/1.0 (+https://example.com/about)",
        ))
        .respond_with(html(page("alice - Forum", "")))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_listing(&mock_server, "post", 1, html(empty_listing("posts"))).await;

    let report = scrape(&config).await.expect("Scrape failed");
    assert_eq!(
        report.posts.as_ref().unwrap().status,
        StreamStatus::Exhausted
    );
}

#[tokio::test]
async fn test_scrape_to_sqlite() {
    let mock_server = MockServer::start().await;
    let output_dir = tempfile::tempdir().unwrap();

    mount_user_page(&mock_server, 200, "alice - Forum").await;
    mount_listing(&mock_server, "comment", 1, html(listing(1..=2, comment_entry))).await;
    mount_listing(&mock_server, "comment", 2, html(empty_listing("comments"))).await;
    mount_listing(&mock_server, "post", 1, html(listing(1..=1, post_entry))).await;
    mount_listing(&mock_server, "post", 2, html(empty_listing("posts"))).await;

    let mut config = create_test_config(&mock_server.uri(), output_dir.path());
    config.output.format = OutputFormat::Sqlite;

    let report = scrape(&config).await.expect("Scrape failed");
    let mut sink = open_sink(&config.output, &report, "test-hash").unwrap();
    write_report(&report, sink.as_mut()).unwrap();

    let db_path = output_dir.path().join("alice.db");
    assert_eq!(sink.destinations(), vec![db_path.clone()]);
    drop(sink);

    let conn = rusqlite::Connection::open(&db_path).unwrap();
    let comments: i64 = conn
        .query_row("SELECT COUNT(*) FROM comments", [], |row| row.get(0))
        .unwrap();
    let status: String = conn
        .query_row("SELECT status FROM runs WHERE id = 1", [], |row| row.get(0))
        .unwrap();
    assert_eq!(comments, 2);
    assert_eq!(status, "completed");
}
