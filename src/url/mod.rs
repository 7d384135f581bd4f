//! URL handling module for Sitemap-Sweep
//!
//! This module provides hostname validation, host/scheme rewriting of
//! discovered URLs, and the path-derived names used for screenshot pages.

mod fqdn;
mod paths;
mod rewrite;

// Re-export main functions
pub use fqdn::is_fqdn;
pub use paths::{path_components, split_path, PathComponents, INDEX_NAME};
pub use rewrite::{rewrite_urls, UrlRewriter};
