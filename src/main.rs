//! Sitemap-Sweep main entry point
//!
//! This is the command-line interface for the Sitemap-Sweep cache warmer.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use sitemap_sweep::config::{read_config_with_hash, validate, CrawlMode, SweepConfig};
use sitemap_sweep::crawler::{run_sweep, CrawlOutcome};
use sitemap_sweep::output::Verbosity;
use sitemap_sweep::FailurePolicy;
use tracing_subscriber::EnvFilter;

/// Sitemap-Sweep: sitemap-driven cache warmer
///
/// Sitemap-Sweep reads a (possibly nested) XML sitemap and requests every
/// page it lists with a bounded number of connections, or captures a
/// screenshot of each page with a headless browser.
#[derive(Parser, Debug)]
#[command(name = "sitemap-sweep")]
#[command(version)]
#[command(about = "Sitemap-driven cache warmer and page snapshotter", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Root sitemap URL
    #[arg(short, long, value_name = "URL", env = "SITEMAP_URL")]
    sitemap_url: Option<String>,

    /// Fetch pages (quick) or capture them in a browser (screenshot)
    #[arg(short, long, value_enum)]
    mode: Option<CrawlMode>,

    /// Only visit the first N discovered URLs
    #[arg(short, long, value_name = "N")]
    num_urls: Option<usize>,

    /// Replace the host of every discovered URL
    #[arg(long, value_name = "HOST")]
    target_host: Option<String>,

    /// Replace the scheme of every discovered URL (needs --target-host)
    #[arg(long, value_name = "SCHEME")]
    target_scheme: Option<String>,

    /// Maximum number of requests in flight
    #[arg(short = 'l', long, value_name = "N")]
    conn_limit: Option<usize>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Abort when a sitemap cannot be fetched instead of skipping it
    #[arg(long)]
    fail_fast: bool,

    /// Directory receiving screenshot pages
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// HTML template for screenshot pages
    #[arg(short, long, value_name = "FILE")]
    page_template: Option<PathBuf>,

    /// Headless browser used in screenshot mode
    #[arg(long, value_name = "PROGRAM")]
    browser: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::quiet()
        } else {
            Verbosity::new(self.verbose)
        }
    }

    /// Layers command-line values over the file configuration
    fn apply(self, mut config: SweepConfig) -> SweepConfig {
        // An empty SITEMAP_URL in the environment counts as unset
        if let Some(url) = self.sitemap_url.filter(|url| !url.trim().is_empty()) {
            config.sitemap.url = Some(url);
        }
        if self.fail_fast {
            config.sitemap.failure_policy = FailurePolicy::FailFast;
        }
        if let Some(mode) = self.mode {
            config.crawler.mode = mode;
        }
        if let Some(limit) = self.num_urls {
            config.crawler.limit = Some(limit);
        }
        if let Some(conn_limit) = self.conn_limit {
            config.crawler.conn_limit = conn_limit;
        }
        if let Some(timeout) = self.timeout {
            config.crawler.timeout_secs = timeout;
        }
        if let Some(host) = self.target_host {
            config.rewrite.target_host = Some(host);
        }
        if let Some(scheme) = self.target_scheme {
            config.rewrite.target_scheme = Some(scheme);
        }
        if let Some(dir) = self.output_dir {
            config.screenshot.output_dir = dir;
        }
        if let Some(template) = self.page_template {
            config.screenshot.page_template = Some(template);
        }
        if let Some(browser) = self.browser {
            config.screenshot.browser = browser;
        }
        config
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbosity = cli.verbosity();

    // Setup logging based on verbosity
    setup_logging(verbosity);

    match run(cli, verbosity).await {
        Ok(outcome) if outcome.is_empty() => {
            tracing::warn!("No URLs were visited");
            ExitCode::SUCCESS
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, verbosity: Verbosity) -> Result<CrawlOutcome> {
    let config = resolve_config(cli)?;

    tracing::info!(
        "Starting {:?} sweep of {} with at most {} connection(s)",
        config.crawler.mode,
        config.sitemap.url.as_deref().unwrap_or("<none>"),
        config.crawler.conn_limit
    );

    let outcome = run_sweep(config, verbosity)
        .await
        .context("Sweep failed")?;

    tracing::info!("Sweep completed: {} URL(s) visited", outcome.len());
    Ok(outcome)
}

/// Builds the effective configuration: file values, then flags, then one validation pass
fn resolve_config(cli: Cli) -> Result<SweepConfig> {
    let file_config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = read_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => SweepConfig::default(),
    };

    let config = cli.apply(file_config);
    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbosity: Verbosity) {
    let filter = EnvFilter::new(verbosity.filter_directive());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}
