//! Bounded concurrent fetcher
//!
//! Visits every URL of a work set with at most `limit` requests in flight.
//! Each request:
//! 1. Acquires one permit from the shared pool
//! 2. Sends a GET and reads the whole body (content is discarded)
//! 3. Releases the permit when it goes out of scope, whatever happened
//! 4. Emits one [`FetchResult`]
//!
//! Failures stay local to their URL; the batch always yields one result per
//! distinct input URL.

use crate::crawler::{ConcurrencyLimiter, Transport};
use crate::output::Progress;
use crate::FetchError;
use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::HashSet;
use tracing::Level;

/// Outcome of requesting one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    /// The requested URL
    pub url: String,

    /// Status code of the response, or why there was no response
    pub outcome: Result<u16, FetchError>,
}

impl FetchResult {
    /// Status code, if a response was received
    pub fn status(&self) -> Option<u16> {
        self.outcome.as_ref().ok().copied()
    }

    /// Returns true if no response was received
    pub fn is_failure(&self) -> bool {
        self.outcome.is_err()
    }
}

/// Fetches a batch of URLs under a connection ceiling
pub struct BoundedFetcher<T> {
    transport: T,
    limiter: ConcurrencyLimiter,
    progress: Progress,
}

impl<T: Transport> BoundedFetcher<T> {
    /// Creates a fetcher
    ///
    /// # Arguments
    ///
    /// * `transport` - Shared connection manager used for every request
    /// * `limiter` - Permit pool capping requests in flight
    /// * `progress` - Log/spinner sink; ticks once per finished request
    pub fn new(transport: T, limiter: ConcurrencyLimiter, progress: Progress) -> Self {
        Self {
            transport,
            limiter,
            progress,
        }
    }

    /// Fetches every URL and returns one result per distinct URL
    ///
    /// Results come back in completion order. Repeated URLs in the input are
    /// requested once. The call returns only after every request has reached
    /// a terminal state.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sitemap_sweep::config::{CrawlerConfig, UserAgentConfig};
    /// use sitemap_sweep::crawler::{BoundedFetcher, ConcurrencyLimiter, HttpTransport};
    /// use sitemap_sweep::output::Progress;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let transport = HttpTransport::new(&CrawlerConfig::default(), &UserAgentConfig::default())?;
    /// let fetcher = BoundedFetcher::new(transport, ConcurrencyLimiter::new(10)?, Progress::hidden());
    /// let results = fetcher
    ///     .fetch_all(vec!["https://example.com/".to_string()])
    ///     .await;
    /// assert_eq!(results.len(), 1);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn fetch_all<I>(&self, urls: I) -> Vec<FetchResult>
    where
        I: IntoIterator<Item = String>,
    {
        let mut seen = HashSet::new();
        let mut in_flight: FuturesUnordered<_> = urls
            .into_iter()
            .filter(|url| seen.insert(url.clone()))
            .map(|url| self.fetch_one(url))
            .collect();

        self.progress.emit(
            Level::INFO,
            format_args!(
                "Crawling {} URL(s) with at most {} connection(s)",
                in_flight.len(),
                self.limiter.limit()
            ),
        );

        let mut results = Vec::with_capacity(in_flight.len());
        while let Some(result) = in_flight.next().await {
            self.progress.tick();
            results.push(result);
        }

        let failures = results.iter().filter(|r| r.is_failure()).count();
        self.progress.emit(
            Level::INFO,
            format_args!(
                "Crawl finished: {} result(s), {} without response",
                results.len(),
                failures
            ),
        );

        results
    }

    /// Requests a single URL while holding a permit
    async fn fetch_one(&self, url: String) -> FetchResult {
        let outcome = match self.limiter.acquire().await {
            Some(_permit) => {
                self.progress
                    .emit(Level::DEBUG, format_args!("Starting request for {}", url));
                self.transport.get(&url).await.map(|response| response.status)
            }
            None => Err(FetchError::PoolClosed { url: url.clone() }),
        };

        if let Err(e) = &outcome {
            self.progress.emit(Level::WARN, e);
        }

        FetchResult { url, outcome }
    }
}
