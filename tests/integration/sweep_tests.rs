//! End-to-end sweeps against a mock site

use sitemap_sweep::config::{CrawlMode, SweepConfig};
use sitemap_sweep::crawler::{CrawlOutcome, HttpTransport, Orchestrator};
use sitemap_sweep::output::{PageCapture, Progress};
use sitemap_sweep::{FetchError, SweepError, UrlError};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Writes a placeholder image instead of starting a browser
struct StubCapture;

impl PageCapture for StubCapture {
    async fn capture(&self, _url: &str, image: &Path) -> Result<(), SweepError> {
        tokio::fs::write(image, b"\x89PNG").await?;
        Ok(())
    }
}

/// Mounts a single url-set sitemap listing `pages` under the mock server
async fn mount_site(mock_server: &MockServer, pages: &[&str]) {
    let base = mock_server.uri();
    let body: String = pages
        .iter()
        .map(|page| format!("<url><loc>{}{}</loc><lastmod>2022-02-02</lastmod></url>", base, page))
        .collect();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
            body
        )))
        .mount(mock_server)
        .await;
}

fn create_test_config(mock_server: &MockServer) -> SweepConfig {
    let mut config = SweepConfig::default();
    config.sitemap.url = Some(format!("{}/sitemap.xml", mock_server.uri()));
    config.crawler.conn_limit = 2;
    config.crawler.timeout_secs = 2;
    config
}

#[tokio::test]
async fn test_quick_sweep_reports_every_page() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server, &["/", "/about", "/old", "/broken"]).await;

    for (page, status) in [("/", 200), ("/about", 200), ("/old", 301), ("/broken", 500)] {
        let mut template = ResponseTemplate::new(status);
        if status == 301 {
            template = template.insert_header("location", "/about");
        }
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(template)
            .mount(&mock_server)
            .await;
    }

    let outcome = Orchestrator::new(create_test_config(&mock_server), Progress::hidden())
        .run()
        .await
        .unwrap();

    let CrawlOutcome::Quick(results) = outcome else {
        panic!("expected quick results");
    };
    assert_eq!(results.len(), 4);

    let status_of = |suffix: &str| {
        results
            .iter()
            .find(|r| r.url == format!("{}{}", mock_server.uri(), suffix))
            .and_then(|r| r.status())
    };
    assert_eq!(status_of("/"), Some(200));
    // Redirects are followed by the client
    assert_eq!(status_of("/old"), Some(200));
    assert_eq!(status_of("/broken"), Some(500));
}

#[tokio::test]
async fn test_num_urls_limits_requests() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server, &["/first", "/second", "/third"]).await;

    Mock::given(method("GET"))
        .and(path("/first"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/second"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server);
    config.crawler.limit = Some(1);

    let outcome = Orchestrator::new(config, Progress::hidden())
        .run()
        .await
        .unwrap();
    assert_eq!(outcome.len(), 1);
}

#[tokio::test]
async fn test_unreachable_page_is_a_failed_result() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "<urlset><url><loc>{}/up</loc></url><url><loc>http://127.0.0.1:9/down</loc></url></urlset>",
            base
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/up"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let outcome = Orchestrator::new(create_test_config(&mock_server), Progress::hidden())
        .run()
        .await
        .unwrap();

    let CrawlOutcome::Quick(results) = outcome else {
        panic!("expected quick results");
    };
    assert_eq!(results.len(), 2);

    let down = results
        .iter()
        .find(|r| r.url == "http://127.0.0.1:9/down")
        .unwrap();
    assert!(matches!(
        down.outcome,
        Err(FetchError::Connect { .. }) | Err(FetchError::Timeout { .. }) | Err(FetchError::Request { .. })
    ));

    let up = results.iter().find(|r| r.url.ends_with("/up")).unwrap();
    assert_eq!(up.status(), Some(200));
}

#[tokio::test]
async fn test_invalid_target_scheme_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server);
    config.rewrite.target_host = Some("example.com".to_string());
    config.rewrite.target_scheme = Some("gopher".to_string());

    let result = Orchestrator::new(config, Progress::hidden()).run().await;
    assert!(matches!(
        result,
        Err(SweepError::Url(UrlError::InvalidScheme(_)))
    ));
}

#[tokio::test]
async fn test_screenshot_sweep_writes_pages() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server, &["/", "/docs/guide"]).await;

    let dir = TempDir::new().unwrap();
    let template = dir.path().join("page.html");
    std::fs::write(&template, "<h1>{{ url }}</h1><i>{{ lastmod }}</i><img src=\"{{ image }}\">").unwrap();

    let mut config = create_test_config(&mock_server);
    config.crawler.mode = CrawlMode::Screenshot;
    config.screenshot.output_dir = dir.path().join("shots");
    config.screenshot.page_template = Some(template);

    let transport = HttpTransport::new(&config.crawler, &config.user_agent).unwrap();
    let outcome = Orchestrator::new(config, Progress::hidden())
        .run_with(transport, StubCapture)
        .await
        .unwrap();

    let CrawlOutcome::Screenshot(results) = outcome else {
        panic!("expected screenshot results");
    };
    assert_eq!(results.len(), 2);

    let guide = dir.path().join("shots").join("docs").join("guide.html");
    assert!(guide.exists());
    assert!(dir.path().join("shots").join("docs").join("guide.png").exists());
    assert!(dir.path().join("shots").join("INDEX.html").exists());

    let html = std::fs::read_to_string(guide).unwrap();
    assert!(html.contains("<i>2022-02-02</i>"));
    assert!(html.contains(r#"<img src="guide.png">"#));
}
