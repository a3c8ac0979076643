//! Concurrency Limiter
//!
//! Caps the number of outbound lookups in flight across every resolution
//! run in the process.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::{Semaphore, SemaphorePermit};

/// Limiter configuration.
#[derive(Debug, Clone)]
pub struct LimiterConfig {
    /// Maximum lookups admitted at once
    pub max_concurrent: usize,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self { max_concurrent: 5 }
    }
}

/// Returned by [`ConcurrencyLimiter::acquire`] after [`ConcurrencyLimiter::close`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("concurrency limiter is closed")]
pub struct LimiterClosed;

/// Semaphore-backed admission gate.
///
/// Waiters are admitted in FIFO order. Every admission is counted so tests
/// and logs can observe the peak concurrency actually reached.
pub struct ConcurrencyLimiter {
    config: LimiterConfig,
    semaphore: Semaphore,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    total_admitted: AtomicU64,
}

impl ConcurrencyLimiter {
    /// Create a new limiter. A zero limit is raised to one.
    pub fn new(config: LimiterConfig) -> Self {
        let permits = config.max_concurrent.max(1);
        Self {
            config: LimiterConfig {
                max_concurrent: permits,
            },
            semaphore: Semaphore::new(permits),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            total_admitted: AtomicU64::new(0),
        }
    }

    /// Wait for a slot.
    ///
    /// The slot is released when the returned permit is dropped.
    pub async fn acquire(&self) -> Result<LimiterPermit<'_>, LimiterClosed> {
        let permit = self.semaphore.acquire().await.map_err(|_| LimiterClosed)?;

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.total_admitted.fetch_add(1, Ordering::Relaxed);

        Ok(LimiterPermit {
            _permit: permit,
            in_flight: &self.in_flight,
        })
    }

    /// Stop admitting. Pending and future `acquire` calls fail.
    pub fn close(&self) {
        self.semaphore.close();
    }

    pub fn is_closed(&self) -> bool {
        self.semaphore.is_closed()
    }

    pub fn max_concurrent(&self) -> usize {
        self.config.max_concurrent
    }

    /// Lookups currently holding a slot.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest concurrent admission count seen so far.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn total_admitted(&self) -> u64 {
        self.total_admitted.load(Ordering::Relaxed)
    }

    /// Free slots right now.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

impl Default for ConcurrencyLimiter {
    fn default() -> Self {
        Self::new(LimiterConfig::default())
    }
}

/// A held slot.
pub struct LimiterPermit<'a> {
    _permit: SemaphorePermit<'a>,
    in_flight: &'a AtomicUsize,
}

impl Drop for LimiterPermit<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
