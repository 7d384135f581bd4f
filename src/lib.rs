//! Sitemap-Sweep: sitemap-driven cache warmer and page snapshotter
//!
//! This crate discovers every resource URL published in a (possibly nested)
//! XML sitemap, then either requests each URL with a bounded number of
//! connections in flight or captures a full-page screenshot of each one.

pub mod config;
pub mod crawler;
pub mod output;
pub mod sitemap;
pub mod url;

use thiserror::Error;

/// Main error type for Sitemap-Sweep operations
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Sitemap parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Screenshot capture failed for {url}: {message}")]
    Capture { url: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Provided hostname is not a FQDN: '{0}'")]
    InvalidHostname(String),

    #[error("Invalid URL scheme: '{0}' (expected http or https)")]
    InvalidScheme(String),
}

/// A per-URL network failure
///
/// Fetch errors are local to the URL they concern: they are recorded as that
/// URL's result and never abort a batch or a sitemap traversal on their own.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read body of {url}: {message}")]
    Body { url: String, message: String },

    #[error("Request failed for {url}: {message}")]
    Request { url: String, message: String },

    #[error("Connection pool closed before {url} could be requested")]
    PoolClosed { url: String },
}

impl FetchError {
    /// Short label used by the result report
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "timeout",
            Self::Connect { .. } => "connect",
            Self::Status { .. } => "status",
            Self::Body { .. } => "body",
            Self::Request { .. } => "request",
            Self::PoolClosed { .. } => "pool closed",
        }
    }
}

/// A sitemap document that could not be understood
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed XML: {0}")]
    Malformed(String),

    #[error("root element <{0}> is neither <urlset> nor <sitemapindex>")]
    NotASitemap(String),

    #[error("document ended before the root element was closed")]
    Truncated,
}

/// Result type alias for Sitemap-Sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use crate::config::SweepConfig;
pub use crate::crawler::{BoundedFetcher, ConcurrencyLimiter, FetchResult, HttpTransport, Transport};
pub use crate::sitemap::{DiscoveryEngine, FailurePolicy, SitemapEntry, SitemapUrls};
pub use crate::url::{is_fqdn, rewrite_urls, UrlRewriter};
