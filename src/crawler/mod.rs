//! Crawler module for fetching discovered URLs
//!
//! This module contains the core crawling logic, including:
//! - The HTTP transport and client construction
//! - The permit pool bounding requests in flight
//! - Bounded concurrent fetching of a URL batch
//! - Overall sweep orchestration

mod coordinator;
mod fetcher;
mod limiter;
mod transport;

pub use coordinator::{run_sweep, CrawlOutcome, Orchestrator};
pub use fetcher::{BoundedFetcher, FetchResult};
pub use limiter::{ConcurrencyLimiter, DEFAULT_CONN_LIMIT};
pub use transport::{build_http_client, HttpResponse, HttpTransport, Transport};
