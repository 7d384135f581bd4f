use crate::crawler::DEFAULT_CONN_LIMIT;
use crate::sitemap::FailurePolicy;
use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for Sitemap-Sweep
///
/// Every section is optional; missing sections and keys take their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub sitemap: SitemapConfig,
    pub crawler: CrawlerConfig,
    pub rewrite: RewriteConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub screenshot: ScreenshotConfig,
}

/// Where discovery starts and how it reacts to broken sitemaps
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SitemapConfig {
    /// Root sitemap URL
    pub url: Option<String>,

    /// Reaction to a sitemap that cannot be fetched
    pub failure_policy: FailurePolicy,
}

/// What to do with the discovered URLs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CrawlMode {
    /// Request every URL concurrently (cache warming)
    #[default]
    Quick,

    /// Visit every URL in a headless browser and save a snapshot page
    Screenshot,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Quick fetch or screenshot capture
    pub mode: CrawlMode,

    /// Only visit the first N discovered URLs
    pub limit: Option<usize>,

    /// Maximum number of requests in flight
    pub conn_limit: usize,

    /// Whole-request timeout (seconds)
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    pub connect_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            mode: CrawlMode::Quick,
            limit: None,
            conn_limit: DEFAULT_CONN_LIMIT,
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Host/scheme override applied to discovered URLs
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RewriteConfig {
    pub target_host: Option<String>,
    pub target_scheme: Option<String>,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler
    pub contact_url: Option<String>,
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!("{}/{} (+{})", self.crawler_name, self.crawler_version, contact),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "sitemap-sweep".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

/// Screenshot mode configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ScreenshotConfig {
    /// Directory receiving the snapshot pages and images
    pub output_dir: PathBuf,

    /// Optional page template; the built-in page is used otherwise
    pub page_template: Option<PathBuf>,

    /// Headless browser executable
    pub browser: String,

    /// Browser window width in pixels
    pub window_width: u32,
}

impl Default for ScreenshotConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            page_template: None,
            browser: "firefox".to_string(),
            window_width: 1366,
        }
    }
}
