//! Sitemap module for URL discovery
//!
//! This module contains everything needed to turn a root sitemap URL into
//! the complete set of resource URLs it publishes:
//! - Parsing sitemap-index and url-set documents
//! - The de-duplicating URL → last-modified mapping
//! - Breadth-first traversal of nested sitemap indexes

mod discovery;
mod document;
mod entries;

pub use discovery::{
    Discovery, DiscoveryEngine, DiscoveryState, FailurePolicy, SkipReason, SkippedSitemap,
};
pub use document::{parse_document, SitemapDocument};
pub use entries::{SitemapEntry, SitemapUrls, UNKNOWN_LASTMOD};
