//! HTTP transport
//!
//! This module handles all HTTP requests made by the sweep, including:
//! - Building the shared HTTP client with the configured user agent and timeouts
//! - GET requests that read the whole body as UTF-8 text
//! - Classifying failures into [`FetchError`] variants
//!
//! Discovery and the fetcher only see the [`Transport`] trait, which lets
//! tests substitute an instrumented fake for the network.

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::FetchError;
use reqwest::{redirect::Policy, Client};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Maximum number of redirects followed per request
const MAX_REDIRECTS: usize = 10;

/// A response whose body has been read to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Numeric HTTP status code
    pub status: u16,

    /// Body decoded as text
    pub body: String,
}

impl HttpResponse {
    /// Returns true for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the body of a 2xx response, or a `FetchError::Status`
    pub fn into_success_body(self, url: &str) -> Result<String, FetchError> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(FetchError::Status {
                url: url.to_string(),
                status: self.status,
            })
        }
    }
}

/// Something that can GET a URL and read the full response
///
/// `Err` is reserved for "no response" failures (timeouts, refused
/// connections, broken bodies). A non-2xx status is still a response.
pub trait Transport {
    fn get(&self, url: &str) -> impl Future<Output = Result<HttpResponse, FetchError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn get(&self, url: &str) -> impl Future<Output = Result<HttpResponse, FetchError>> + Send {
        T::get(&**self, url)
    }
}

/// Production transport backed by one shared `reqwest` client
///
/// Cloning is cheap and clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Builds a transport from the crawler and user agent configuration
    pub fn new(crawler: &CrawlerConfig, user_agent: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(crawler, user_agent)?,
        })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status().as_u16();
        tracing::trace!("{} answered {}", url, status);

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        Ok(HttpResponse { status, body })
    }
}

/// Builds an HTTP client with proper configuration
///
/// The idle pool per host is capped at the connection limit so the permit
/// pool bounds real sockets, not just logical tasks.
///
/// # Example
///
/// ```no_run
/// use sitemap_sweep::config::{CrawlerConfig, UserAgentConfig};
/// use sitemap_sweep::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default(), &UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    crawler: &CrawlerConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(crawler.timeout_secs))
        .connect_timeout(Duration::from_secs(crawler.connect_timeout_secs))
        .pool_max_idle_per_host(crawler.conn_limit)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Maps a `reqwest` send error onto the fetch error taxonomy
fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Connect {
            url: url.to_string(),
            message: error.to_string(),
        }
    } else {
        FetchError::Request {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
