//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use sitescrape::config::{Config, UNLIMITED_PAGES};
use sitescrape::crawler::{
    scrape_single, CrawlSession, CrawlState, NON_HTML_CONTENT, NON_HTML_TITLE,
};
use sitescrape::output::CrawlEvent;
use sitescrape::{HarvestError, UrlError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with the given page budget and no pacing
fn create_test_config(max_pages: usize) -> Config {
    let mut config = Config::default();
    config.crawler.max_pages = max_pages;
    config.crawler.timeout = 5;
    config.crawler.pacing_delay = 0;
    config
}

fn html_page(title: &str, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!(
            "<html><head><title>{}</title></head><body>{}</body></html>",
            title, body
        ),
        "text/html",
    )
}

/// Mounts a GET mock that must be hit exactly once
async fn mount_page(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

/// Paths of the records' source URLs, relative to the mock server
fn paths_of(base: &str, urls: impl Iterator<Item = String>) -> Vec<String> {
    urls.map(|u| u.trim_start_matches(base).to_string()).collect()
}

#[tokio::test]
async fn test_full_crawl_breadth_first() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        html_page("Home", r#"<p>Welcome</p><a href="/a">A</a><a href="/b">B</a>"#),
    )
    .await;
    mount_page(
        &server,
        "/a",
        html_page("A", r#"<p>Page A</p><a href="/c">C</a><a href="/">Home</a>"#),
    )
    .await;
    mount_page(
        &server,
        "/b",
        html_page("B", r#"<p>Page B</p><a href="/a">A again</a>"#),
    )
    .await;
    mount_page(&server, "/c", html_page("C", "<p>Page C</p>")).await;

    let session = CrawlSession::new(&base, &create_test_config(10)).unwrap();
    let report = session.run().await;

    assert_eq!(report.state, CrawlState::Exhausted);
    assert_eq!(
        paths_of(&base, report.pages.iter().map(|p| p.source_url().to_string())),
        vec!["/", "/a", "/b", "/c"]
    );
    assert_eq!(report.pages[0].title(), "Home");
    assert_eq!(report.pages[0].content(), "Welcome A B");
    assert_eq!(report.stats.extracted, 4);
    assert_eq!(report.stats.success_rate(), 100.0);
}

#[tokio::test]
async fn test_budget_of_one_fetches_only_seed() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        html_page("Home", r#"<a href="/next">Next</a>"#),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(html_page("Next", "<p>never</p>"))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = CrawlSession::new(&base, &create_test_config(1)).unwrap();

    let first = session.next_page().await.unwrap();
    assert!(first.is_extracted());
    assert_eq!(session.state(), CrawlState::BudgetReached);
    assert_eq!(session.queue_size(), 1);

    assert!(session.next_page().await.is_none());
    assert_eq!(session.pages_produced(), 1);
}

#[tokio::test]
async fn test_http_error_page_is_recorded_and_crawl_continues() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        html_page("Home", r#"<a href="/missing">Gone</a><a href="/ok">Ok</a>"#),
    )
    .await;
    mount_page(&server, "/missing", ResponseTemplate::new(404)).await;
    mount_page(&server, "/ok", html_page("Ok", "<p>Fine</p>")).await;

    let report = CrawlSession::new(&base, &create_test_config(10))
        .unwrap()
        .run()
        .await;

    assert_eq!(report.len(), 3);
    let missing = &report.pages[1];
    assert_eq!(missing.title(), "");
    assert_eq!(
        missing.content(),
        format!("Request error: 404 Not Found for url: {}/missing", base)
    );
    assert_eq!(report.pages[2].title(), "Ok");
    assert_eq!(report.stats.http_errors, 1);
    assert_eq!(report.stats.extracted, 2);
}

#[tokio::test]
async fn test_non_html_page_gets_placeholder_and_no_discovery() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        html_page("Home", r#"<a href="/paper.pdf">Paper</a>"#),
    )
    .await;
    mount_page(
        &server,
        "/paper.pdf",
        ResponseTemplate::new(200).set_body_raw(
            r#"%PDF-1.4 <a href="/hidden">not a link</a>"#,
            "application/pdf",
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/hidden"))
        .respond_with(html_page("Hidden", ""))
        .expect(0)
        .mount(&server)
        .await;

    let report = CrawlSession::new(&base, &create_test_config(10))
        .unwrap()
        .run()
        .await;

    assert_eq!(report.len(), 2);
    assert_eq!(report.pages[1].title(), NON_HTML_TITLE);
    assert_eq!(report.pages[1].content(), NON_HTML_CONTENT);
    assert_eq!(report.stats.non_html, 1);
}

#[tokio::test]
async fn test_tracking_and_case_variants_fetched_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        html_page(
            "Home",
            r#"
            <a href="/about">About</a>
            <a href="/about?utm_source=newsletter">About (tracked)</a>
            <a href="/About/">About (shouted)</a>
            <a href="/about#team">Team</a>
            "#,
        ),
    )
    .await;
    mount_page(&server, "/about", html_page("About", "<p>Us</p>")).await;

    let report = CrawlSession::new(&base, &create_test_config(10))
        .unwrap()
        .run()
        .await;

    assert_eq!(
        paths_of(&base, report.pages.iter().map(|p| p.source_url().to_string())),
        vec!["/", "/about"]
    );
    assert!(report.stats.duplicates_skipped >= 1);
}

#[tokio::test]
async fn test_links_resolve_against_redirect_target() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        html_page("Home", r#"<a href="/old/page">Moved</a>"#),
    )
    .await;
    mount_page(
        &server,
        "/old/page",
        ResponseTemplate::new(301).insert_header("location", "/new/page"),
    )
    .await;
    mount_page(
        &server,
        "/new/page",
        html_page("New", r#"<a href="sibling">Sibling</a>"#),
    )
    .await;
    mount_page(&server, "/new/sibling", html_page("Sibling", "<p>Here</p>")).await;

    let report = CrawlSession::new(&base, &create_test_config(10))
        .unwrap()
        .run()
        .await;

    assert_eq!(
        paths_of(&base, report.pages.iter().map(|p| p.source_url().to_string())),
        vec!["/", "/old/page", "/new/sibling"]
    );
    assert_eq!(report.pages[1].title(), "New");
}

#[tokio::test]
async fn test_redirect_target_not_fetched_again() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        html_page("Home", r#"<a href="/old">Old</a><a href="/new">New</a>"#),
    )
    .await;
    mount_page(
        &server,
        "/old",
        ResponseTemplate::new(301).insert_header("location", "/new"),
    )
    .await;
    mount_page(&server, "/new", html_page("New", "<p>new</p>")).await;

    let report = CrawlSession::new(&base, &create_test_config(10))
        .unwrap()
        .run()
        .await;

    assert_eq!(
        paths_of(&base, report.pages.iter().map(|p| p.source_url().to_string())),
        vec!["/", "/old"]
    );
    assert_eq!(report.pages[1].title(), "New");
    assert_eq!(report.stats.duplicates_skipped, 1);
}

#[tokio::test]
async fn test_off_site_links_not_followed() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        html_page(
            "Home",
            r#"<a href="https://elsewhere.test/">Away</a><a href="mailto:a@b.test">Mail</a>"#,
        ),
    )
    .await;

    let report = CrawlSession::new(&base, &create_test_config(10))
        .unwrap()
        .run()
        .await;

    assert_eq!(report.len(), 1);
    assert_eq!(report.state, CrawlState::Exhausted);
}

#[tokio::test]
async fn test_unreachable_seed_yields_one_degenerate_record() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let report = CrawlSession::new(&format!("http://{}/", addr), &create_test_config(10))
        .unwrap()
        .run()
        .await;

    assert_eq!(report.len(), 1);
    assert!(report.pages[0].content().starts_with("Request error:"));
    assert_eq!(report.stats.network_errors, 1);
    assert_eq!(report.state, CrawlState::Exhausted);
}

#[tokio::test]
async fn test_stream_event_sequence() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        html_page("Home", r#"<a href="/one">1</a><a href="/two">2</a>"#),
    )
    .await;
    mount_page(&server, "/one", html_page("One", "<p>1</p>")).await;
    mount_page(&server, "/two", html_page("Two", "<p>2</p>")).await;

    let session = CrawlSession::new(&base, &create_test_config(10)).unwrap();
    let mut stream = session.stream();

    let mut events = Vec::new();
    while let Some(event) = stream.next().await {
        events.push(event);
    }

    let kinds: Vec<&str> = events.iter().map(|e| e.kind()).collect();
    assert_eq!(kinds, vec!["start", "page", "page", "page", "complete"]);

    match &events[1] {
        CrawlEvent::Page { data, progress } => {
            assert_eq!(data.title(), "Home");
            assert_eq!(progress.current, 1);
            assert_eq!(progress.total, Some(10));
            assert_eq!(progress.percentage, Some(10.0));
            assert_eq!(progress.queue_size, 2);
        }
        other => panic!("expected page event, got {:?}", other),
    }

    match &events[4] {
        CrawlEvent::Complete { total_pages, .. } => assert_eq!(*total_pages, 3),
        other => panic!("expected complete event, got {:?}", other),
    }

    for event in &events {
        let frame = event.to_sse_frame().unwrap();
        assert!(frame.starts_with("data: {"));
        assert!(frame.ends_with("}\n\n"));
    }
}

#[tokio::test]
async fn test_unlimited_stream_emits_progress_events() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        html_page("Home", r#"<a href="/one">1</a><a href="/two">2</a>"#),
    )
    .await;
    mount_page(&server, "/one", html_page("One", "<p>1</p>")).await;
    mount_page(&server, "/two", html_page("Two", "<p>2</p>")).await;

    let mut config = create_test_config(UNLIMITED_PAGES);
    config.crawler.progress_interval = 2;

    let mut stream = CrawlSession::new(&base, &config).unwrap().stream();
    let mut events = Vec::new();
    while let Some(event) = stream.next().await {
        events.push(event);
    }

    let kinds: Vec<&str> = events.iter().map(|e| e.kind()).collect();
    assert_eq!(
        kinds,
        vec!["start", "page", "page", "progress", "page", "complete"]
    );

    match &events[1] {
        CrawlEvent::Page { progress, .. } => {
            assert_eq!(progress.total, None);
            assert_eq!(progress.percentage, None);
        }
        other => panic!("expected page event, got {:?}", other),
    }
}

#[tokio::test]
async fn test_stream_completes_without_pause_after_last_page() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        html_page("Home", r#"<a href="/next">Next</a>"#),
    )
    .await;

    let mut config = create_test_config(1);
    config.crawler.pacing_delay = 3_000;

    let started = std::time::Instant::now();
    let mut stream = CrawlSession::new(&base, &config).unwrap().stream();
    let mut kinds = Vec::new();
    while let Some(event) = stream.next().await {
        kinds.push(event.kind());
    }

    assert_eq!(kinds, vec!["start", "page", "complete"]);
    assert!(started.elapsed() < std::time::Duration::from_millis(2_000));
}

#[tokio::test]
async fn test_scrape_single_does_not_follow_links() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/article",
        html_page("Article", r#"<p>Body text</p><a href="/other">Other</a>"#),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/other"))
        .respond_with(html_page("Other", ""))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = scrape_single(&format!("{}/article", base), &create_test_config(10))
        .await
        .unwrap();

    assert!(outcome.is_extracted());
    assert_eq!(outcome.record().title(), "Article");
    assert_eq!(outcome.record().content(), "Body text Other");
}

#[tokio::test]
async fn test_invalid_seed_rejected_before_fetching() {
    let config = create_test_config(10);

    assert!(matches!(
        CrawlSession::new("ftp://example.com/", &config),
        Err(HarvestError::UrlError(UrlError::InvalidScheme(_)))
    ));
    assert!(matches!(
        CrawlSession::new("", &config),
        Err(HarvestError::UrlError(_))
    ));
    assert!(scrape_single("javascript:alert(1)", &config).await.is_err());
}
