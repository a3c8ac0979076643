//! Retry Policy
//!
//! Bounded retry with a fixed pause between attempts.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Retry configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Pause between consecutive attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Run `operation` until it succeeds, fails with an error that
    /// `is_retryable` rejects, or the attempts run out.
    ///
    /// The closure receives the 1-based attempt number. The last error is
    /// returned when every attempt fails.
    pub async fn run<T, E, F, Fut, R>(
        &self,
        operation_name: &str,
        mut operation: F,
        is_retryable: R,
    ) -> Result<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        R: Fn(&E) -> bool,
        E: std::fmt::Display,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match operation(attempt).await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!("{} succeeded on attempt {}", operation_name, attempt);
                    }
                    return Ok(value);
                }
                Err(e) if is_retryable(&e) && attempt < max_attempts => {
                    warn!(
                        "{} failed (attempt {}/{}): {}; retrying in {:?}",
                        operation_name, attempt, max_attempts, e, self.delay
                    );
                    sleep(self.delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    debug!(
                        "{} gave up after {} attempt(s): {}",
                        operation_name, attempt, e
                    );
                    return Err(e);
                }
            }
        }
    }
}
