//! Crawl orchestration
//!
//! Ties the stages of a sweep together:
//! - Validating the sitemap URL and rewrite targets before any network use
//! - Discovering every URL published by the sitemap hierarchy
//! - Keeping the first N URLs when a limit is configured
//! - Rewriting host and scheme
//! - Fetching (quick mode) or snapshotting (screenshot mode) the result

use crate::config::{CrawlMode, SweepConfig};
use crate::crawler::{BoundedFetcher, ConcurrencyLimiter, FetchResult, HttpTransport, Transport};
use crate::output::{
    load_page_template, print_fetch_report, print_render_report, BrowserCapture, PageCapture,
    Progress, RenderResult, ScreenshotRenderer, Verbosity,
};
use crate::sitemap::DiscoveryEngine;
use crate::url::UrlRewriter;
use crate::SweepError;
use std::sync::Arc;
use tracing::Level;

/// Results of a finished sweep, by mode
#[derive(Debug)]
pub enum CrawlOutcome {
    Quick(Vec<FetchResult>),
    Screenshot(Vec<RenderResult>),
}

impl CrawlOutcome {
    /// Number of URLs visited
    pub fn len(&self) -> usize {
        match self {
            Self::Quick(results) => results.len(),
            Self::Screenshot(results) => results.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Runs one complete sweep from a configuration
pub struct Orchestrator {
    config: SweepConfig,
    progress: Progress,
}

impl Orchestrator {
    pub fn new(config: SweepConfig, progress: Progress) -> Self {
        Self { config, progress }
    }

    /// Runs the sweep over HTTP, capturing screenshots with the configured
    /// browser in screenshot mode
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlOutcome)` - One result per visited URL
    /// * `Err(SweepError::InvalidInput)` - No sitemap URL configured
    /// * `Err(SweepError::Url)` - Invalid target host or scheme
    /// * `Err(SweepError::Fetch)` - A sitemap failed under the fail-fast policy
    pub async fn run(&self) -> Result<CrawlOutcome, SweepError> {
        let (root, rewriter) = self.prepare()?;
        let transport = HttpTransport::new(&self.config.crawler, &self.config.user_agent)?;
        let capture = BrowserCapture::from_config(&self.config.screenshot);
        self.execute(root, rewriter, transport, capture).await
    }

    /// Runs the sweep with the given transport and page capture
    pub async fn run_with<T, C>(&self, transport: T, capture: C) -> Result<CrawlOutcome, SweepError>
    where
        T: Transport,
        C: PageCapture,
    {
        let (root, rewriter) = self.prepare()?;
        self.execute(root, rewriter, transport, capture).await
    }

    /// Checks everything that can be checked without the network
    fn prepare(&self) -> Result<(String, UrlRewriter), SweepError> {
        let root = self
            .config
            .sitemap
            .url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| SweepError::InvalidInput("no sitemap URL given".to_string()))?
            .to_string();

        let rewriter = UrlRewriter::new(
            self.config.rewrite.target_host.as_deref(),
            self.config.rewrite.target_scheme.as_deref(),
        )?;

        Ok((root, rewriter))
    }

    async fn execute<T, C>(
        &self,
        root: String,
        rewriter: UrlRewriter,
        transport: T,
        capture: C,
    ) -> Result<CrawlOutcome, SweepError>
    where
        T: Transport,
        C: PageCapture,
    {
        let template = match self.config.crawler.mode {
            CrawlMode::Screenshot => Some(load_page_template(&self.config.screenshot)?),
            CrawlMode::Quick => None,
        };

        let transport = Arc::new(transport);
        let limiter = ConcurrencyLimiter::new(self.config.crawler.conn_limit)?;

        self.progress.set_message("Reading sitemaps");
        let engine = DiscoveryEngine::new(
            transport.clone(),
            limiter.clone(),
            self.config.sitemap.failure_policy,
            self.progress.clone(),
        );
        let discovery = engine.discover(&root).await?;
        self.progress.emit(
            Level::INFO,
            format_args!(
                "Discovered {} URL(s) in {} sitemap(s), {} sitemap(s) skipped",
                discovery.urls.len(),
                discovery.sitemaps_read,
                discovery.skipped.len()
            ),
        );

        let mut urls = discovery.urls;
        if let Some(limit) = self.config.crawler.limit {
            if limit < urls.len() {
                self.progress.emit(
                    Level::INFO,
                    format_args!("Keeping the first {} of {} URL(s)", limit, urls.len()),
                );
                urls.truncate(limit);
            }
        }

        let urls = rewriter.rewrite(urls);

        match template {
            Some(template) => {
                self.progress.set_message("Capturing pages");
                let renderer = ScreenshotRenderer::new(
                    capture,
                    self.config.screenshot.output_dir.clone(),
                    template,
                    self.progress.clone(),
                );
                Ok(CrawlOutcome::Screenshot(renderer.render_all(&urls).await))
            }
            None => {
                self.progress.set_message("Fetching pages");
                let fetcher = BoundedFetcher::new(transport, limiter, self.progress.clone());
                let results = fetcher
                    .fetch_all(urls.into_iter().map(|entry| entry.url))
                    .await;
                Ok(CrawlOutcome::Quick(results))
            }
        }
    }
}

/// Runs a complete sweep and prints its report
///
/// This is the entry point used by the command line. It will:
/// 1. Validate the sitemap URL and rewrite targets
/// 2. Discover every URL published by the sitemap hierarchy
/// 3. Apply the URL limit and the host/scheme rewrite
/// 4. Fetch or snapshot every URL
/// 5. Print the per-URL report
///
/// # Arguments
///
/// * `config` - The merged configuration
/// * `verbosity` - Log level and spinner selection
pub async fn run_sweep(config: SweepConfig, verbosity: Verbosity) -> Result<CrawlOutcome, SweepError> {
    let progress = Progress::new(verbosity);
    let outcome = Orchestrator::new(config, progress.clone()).run().await;
    progress.finish();

    let outcome = outcome?;
    match &outcome {
        CrawlOutcome::Quick(results) => print_fetch_report(results),
        CrawlOutcome::Screenshot(results) => print_render_report(results),
    }

    Ok(outcome)
}
