//! Sitemap discovery over HTTP

use sitemap_sweep::config::{CrawlerConfig, UserAgentConfig};
use sitemap_sweep::crawler::{ConcurrencyLimiter, HttpTransport, Transport};
use sitemap_sweep::output::Progress;
use sitemap_sweep::sitemap::{DiscoveryEngine, FailurePolicy, SkipReason};
use sitemap_sweep::{FetchError, SweepError};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport() -> HttpTransport {
    let crawler = CrawlerConfig {
        timeout_secs: 1,
        connect_timeout_secs: 1,
        ..CrawlerConfig::default()
    };
    HttpTransport::new(&crawler, &UserAgentConfig::default()).expect("Failed to build client")
}

fn engine(policy: FailurePolicy) -> DiscoveryEngine<HttpTransport> {
    DiscoveryEngine::new(
        transport(),
        ConcurrencyLimiter::new(4).unwrap(),
        policy,
        Progress::hidden(),
    )
}

fn xml(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "application/xml")
}

fn index(locs: &[String]) -> String {
    let body: String = locs
        .iter()
        .map(|loc| format!("<sitemap><loc>{}</loc></sitemap>", loc))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</sitemapindex>"#,
        body
    )
}

fn urlset(entries: &[(&str, Option<&str>)]) -> String {
    let body: String = entries
        .iter()
        .map(|(loc, lastmod)| match lastmod {
            Some(lastmod) => format!("<url><loc>{}</loc><lastmod>{}</lastmod></url>", loc, lastmod),
            None => format!("<url><loc>{}</loc></url>", loc),
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        body
    )
}

#[tokio::test]
async fn test_nested_index_is_fully_discovered() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(xml(index(&[
            format!("{}/posts.xml", base),
            format!("{}/nested.xml", base),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/nested.xml"))
        .respond_with(xml(index(&[
            format!("{}/pages.xml", base),
            format!("{}/sitemap.xml", base),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/posts.xml"))
        .respond_with(xml(urlset(&[
            ("https://www.example.org/a", Some("2020-01-01")),
            ("https://www.example.org/b", None),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/pages.xml"))
        .respond_with(xml(urlset(&[
            ("https://www.example.org/a", Some("2099-09-09")),
            ("https://www.example.org/c", Some("2021-03-04")),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let discovery = engine(FailurePolicy::BestEffort)
        .discover(&format!("{}/sitemap.xml", base))
        .await
        .unwrap();

    assert_eq!(discovery.sitemaps_read, 4);
    assert!(discovery.skipped.is_empty());
    assert_eq!(discovery.urls.len(), 3);
    assert_eq!(discovery.urls.get("https://www.example.org/a"), Some("2020-01-01"));
    assert_eq!(discovery.urls.get("https://www.example.org/b"), Some("UNKNOWN"));
    assert_eq!(discovery.urls.get("https://www.example.org/c"), Some("2021-03-04"));
}

#[tokio::test]
async fn test_broken_child_is_skipped() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(xml(index(&[
            format!("{}/gone.xml", base),
            format!("{}/garbage.xml", base),
            format!("{}/good.xml", base),
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gone.xml"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/garbage.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>nope</body></html>"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/good.xml"))
        .respond_with(xml(urlset(&[("https://www.example.org/ok", None)])))
        .mount(&mock_server)
        .await;

    let discovery = engine(FailurePolicy::BestEffort)
        .discover(&format!("{}/sitemap.xml", base))
        .await
        .unwrap();

    assert_eq!(discovery.urls.len(), 1);
    assert!(discovery.urls.contains("https://www.example.org/ok"));
    assert_eq!(discovery.skipped.len(), 2);
    assert!(discovery.skipped.iter().any(|s| matches!(
        s.reason,
        SkipReason::Fetch(FetchError::Status { status: 500, .. })
    )));
    assert!(discovery
        .skipped
        .iter()
        .any(|s| matches!(s.reason, SkipReason::Parse(_))));
}

#[tokio::test]
async fn test_fail_fast_reports_broken_child() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(xml(index(&[format!("{}/gone.xml", base)])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gone.xml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let result = engine(FailurePolicy::FailFast)
        .discover(&format!("{}/sitemap.xml", base))
        .await;

    match result {
        Err(SweepError::Fetch(FetchError::Status { url, status })) => {
            assert_eq!(status, 404);
            assert!(url.ends_with("/gone.xml"));
        }
        other => panic!("expected a status failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_transport_reports_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let url = format!("{}/slow", mock_server.uri());
    let result = transport().get(&url).await;

    assert_eq!(result, Err(FetchError::Timeout { url }));
}

#[tokio::test]
async fn test_transport_sends_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ua"))
        .and(header(
            "user-agent",
            format!("sitemap-sweep/{}", env!("CARGO_PKG_VERSION")).as_str(),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = transport()
        .get(&format!("{}/ua", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body, "hello");
}
