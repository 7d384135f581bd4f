//! Configuration module for Sitemap-Sweep
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Command-line flags are layered on top by the binary.
//!
//! # Example
//!
//! ```no_run
//! use sitemap_sweep::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sweep.toml")).unwrap();
//! println!("Sweeping with at most {} connections", config.crawler.conn_limit);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CrawlMode, CrawlerConfig, RewriteConfig, ScreenshotConfig, SitemapConfig, SweepConfig,
    UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, parse_config, read_config, read_config_with_hash};
pub use validation::validate;
