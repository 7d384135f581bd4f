//! Sitemap discovery - breadth-first traversal of sitemap-index hierarchies
//!
//! The engine starts from one root sitemap, expands every sitemap-index it
//! meets and collects the entries of every url-set, until the frontier is
//! empty. Each round drains the whole frontier and fetches it concurrently,
//! bounded by the shared permit pool; results are then folded into the state
//! in frontier order, so the children of an index are queued in document
//! order.
//!
//! The visited set is the only cycle guard: an index listing itself (or any
//! already queued sitemap) is caught, but distinct URLs that serve the same
//! content are fetched once each.

use crate::crawler::{ConcurrencyLimiter, Transport};
use crate::output::Progress;
use crate::sitemap::document::{parse_document, SitemapDocument};
use crate::sitemap::entries::SitemapUrls;
use crate::{FetchError, ParseError, SweepError};
use futures::future::join_all;
use serde::Deserialize;
use std::collections::{HashSet, VecDeque};
use tracing::Level;

/// What to do when a sitemap document cannot be fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Skip the sitemap, record it, and keep traversing
    #[default]
    BestEffort,

    /// Abort the whole discovery on the first fetch failure
    FailFast,
}

/// Why a sitemap contributed nothing to the result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Fetch(FetchError),
    Parse(ParseError),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fetch(e) => write!(f, "{}", e),
            Self::Parse(e) => write!(f, "{}", e),
        }
    }
}

/// A sitemap ref that was skipped during traversal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSitemap {
    pub url: String,
    pub reason: SkipReason,
}

/// Outcome of one discovery run
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    /// Every resource URL found, with its last-modified marker
    pub urls: SitemapUrls,

    /// Number of sitemap documents requested (the root included)
    pub sitemaps_read: usize,

    /// Sitemaps that contributed nothing because of a fetch or parse failure
    pub skipped: Vec<SkippedSitemap>,
}

/// Traversal state owned by a single discovery run
#[derive(Debug, Default)]
pub struct DiscoveryState {
    /// Sitemap refs waiting to be fetched
    frontier: VecDeque<String>,

    /// Every sitemap ref ever queued; only grows
    visited: HashSet<String>,

    /// Resource URL → last-modified, first seen wins
    results: SitemapUrls,
}

impl DiscoveryState {
    /// Creates a state whose frontier holds only the root
    pub fn seeded(root: &str) -> Self {
        let mut state = Self::default();
        state.enqueue(root);
        state
    }

    /// Queues a sitemap ref unless it was seen before
    ///
    /// Returns `true` if the ref was new.
    pub fn enqueue(&mut self, sitemap_ref: &str) -> bool {
        if !self.visited.insert(sitemap_ref.to_string()) {
            return false;
        }
        self.frontier.push_back(sitemap_ref.to_string());
        true
    }

    /// Takes every pending ref, in queue order
    pub fn next_round(&mut self) -> Vec<String> {
        self.frontier.drain(..).collect()
    }

    pub fn is_done(&self) -> bool {
        self.frontier.is_empty()
    }

    pub fn pending(&self) -> usize {
        self.frontier.len()
    }

    pub fn visited(&self) -> usize {
        self.visited.len()
    }

    pub fn into_results(self) -> SitemapUrls {
        self.results
    }
}

/// Discovers every resource URL reachable from a root sitemap
pub struct DiscoveryEngine<T> {
    transport: T,
    limiter: ConcurrencyLimiter,
    policy: FailurePolicy,
    progress: Progress,
}

impl<T: Transport> DiscoveryEngine<T> {
    /// Creates an engine
    ///
    /// # Arguments
    ///
    /// * `transport` - Used to fetch sitemap documents
    /// * `limiter` - Permit pool gating each document fetch
    /// * `policy` - Reaction to a sitemap that cannot be fetched
    /// * `progress` - Log/spinner sink
    pub fn new(
        transport: T,
        limiter: ConcurrencyLimiter,
        policy: FailurePolicy,
        progress: Progress,
    ) -> Self {
        Self {
            transport,
            limiter,
            policy,
            progress,
        }
    }

    /// Runs a complete traversal from `root`
    ///
    /// # Returns
    ///
    /// * `Ok(Discovery)` - Traversal finished; the URL map may be empty
    /// * `Err(SweepError::InvalidInput)` - `root` is empty
    /// * `Err(SweepError::Fetch)` - A sitemap failed under [`FailurePolicy::FailFast`]
    pub async fn discover(&self, root: &str) -> Result<Discovery, SweepError> {
        let root = root.trim();
        if root.is_empty() {
            return Err(SweepError::InvalidInput(
                "no sitemap URL given".to_string(),
            ));
        }

        self.progress
            .emit(Level::INFO, format_args!("Reading sitemap {}", root));

        let mut state = DiscoveryState::seeded(root);
        let mut sitemaps_read = 0;
        let mut skipped = Vec::new();

        while !state.is_done() {
            let round = state.next_round();
            sitemaps_read += round.len();
            self.progress.emit(
                Level::DEBUG,
                format_args!("Fetching {} sitemap(s)", round.len()),
            );

            let bodies = join_all(round.iter().map(|url| self.fetch_document(url))).await;

            for (url, body) in round.into_iter().zip(bodies) {
                let body = match body {
                    Ok(body) => body,
                    Err(e) => match self.policy {
                        FailurePolicy::FailFast => {
                            self.progress
                                .emit(Level::ERROR, format_args!("Sitemap fetch failed: {}", e));
                            return Err(e.into());
                        }
                        FailurePolicy::BestEffort => {
                            self.progress
                                .emit(Level::WARN, format_args!("Skipping sitemap: {}", e));
                            skipped.push(SkippedSitemap {
                                url,
                                reason: SkipReason::Fetch(e),
                            });
                            continue;
                        }
                    },
                };

                match parse_document(&body) {
                    Ok(document) => self.absorb(&mut state, &url, document),
                    Err(e) => {
                        self.progress.emit(
                            Level::WARN,
                            format_args!("Ignoring unreadable sitemap {}: {}", url, e),
                        );
                        skipped.push(SkippedSitemap {
                            url,
                            reason: SkipReason::Parse(e),
                        });
                    }
                }
            }
        }

        let urls = state.into_results();
        self.progress.emit(
            Level::INFO,
            format_args!(
                "Sitemap reading complete: {} URL(s) from {} sitemap(s)",
                urls.len(),
                sitemaps_read
            ),
        );

        Ok(Discovery {
            urls,
            sitemaps_read,
            skipped,
        })
    }

    /// Fetches one sitemap document while holding a permit
    async fn fetch_document(&self, url: &str) -> Result<String, FetchError> {
        let Some(_permit) = self.limiter.acquire().await else {
            return Err(FetchError::PoolClosed {
                url: url.to_string(),
            });
        };

        self.progress
            .emit(Level::DEBUG, format_args!("Requesting sitemap {}", url));
        let response = self.transport.get(url).await?;
        self.progress.tick();
        response.into_success_body(url)
    }

    /// Folds a parsed document into the traversal state
    fn absorb(&self, state: &mut DiscoveryState, source: &str, document: SitemapDocument) {
        match document {
            SitemapDocument::Index(children) => {
                for child in children {
                    if state.enqueue(&child) {
                        self.progress
                            .emit(Level::DEBUG, format_args!("New sitemap found: {}", child));
                    }
                    self.progress.tick();
                }
                self.progress.emit(
                    Level::DEBUG,
                    format_args!("Sitemaps pending: {}", state.pending()),
                );
            }
            SitemapDocument::UrlSet(entries) => {
                for entry in entries {
                    let url = entry.url.clone();
                    if state.results.insert_first_seen(entry) {
                        self.progress.emit(Level::TRACE, format_args!("Added {}", url));
                    } else {
                        self.progress.emit(
                            Level::DEBUG,
                            format_args!("Duplicate {} in {} dropped", url, source),
                        );
                    }
                    self.progress.tick();
                }
                self.progress.emit(
                    Level::DEBUG,
                    format_args!("Sitemap data entries: {}", state.results.len()),
                );
            }
        }
    }
}
