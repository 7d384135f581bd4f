//! Global concurrency limiting
//!
//! A counting permit pool shared by sitemap discovery and the fetcher. Every
//! request holds one permit for its whole lifetime; the permit goes back to
//! the pool when it is dropped, whatever the outcome of the request.

use crate::SweepError;
use std::sync::Arc;
use tokio::sync::{Semaphore, SemaphorePermit};

/// Connection ceiling used when none is configured
pub const DEFAULT_CONN_LIMIT: usize = 100;

/// Permit pool capping the number of requests in flight
#[derive(Debug, Clone)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    limit: usize,
}

impl ConcurrencyLimiter {
    /// Creates a pool with `limit` permits
    ///
    /// # Errors
    ///
    /// * `SweepError::InvalidInput` - `limit` is zero
    pub fn new(limit: usize) -> Result<Self, SweepError> {
        if limit == 0 {
            return Err(SweepError::InvalidInput(
                "connection limit must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            semaphore: Arc::new(Semaphore::new(limit)),
            limit,
        })
    }

    /// Waits for a free permit
    ///
    /// Returns `None` only if the pool has been closed.
    pub async fn acquire(&self) -> Option<SemaphorePermit<'_>> {
        self.semaphore.acquire().await.ok()
    }

    /// Configured ceiling
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Permits not currently held
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

impl Default for ConcurrencyLimiter {
    fn default() -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(DEFAULT_CONN_LIMIT)),
            limit: DEFAULT_CONN_LIMIT,
        }
    }
}
