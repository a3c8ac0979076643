//! Resolution Context
//!
//! Shared state for the resolvers of one pipeline.

use crate::infrastructure::{ConcurrencyLimiter, LimiterConfig, ResultCache};
use std::sync::Arc;

/// Owns the lookup cache and the concurrency gate.
///
/// Both resolvers of a pipeline hold the same context. Two pipelines built
/// from separate contexts share nothing.
#[derive(Clone)]
pub struct ResolutionContext {
    cache: Arc<ResultCache>,
    limiter: Arc<ConcurrencyLimiter>,
}

impl ResolutionContext {
    pub fn new(cache: Arc<ResultCache>, limiter: Arc<ConcurrencyLimiter>) -> Self {
        Self { cache, limiter }
    }

    /// Fresh, empty context with the given concurrency limit.
    pub fn with_limit(max_concurrent: usize) -> Self {
        Self::new(
            Arc::new(ResultCache::new()),
            Arc::new(ConcurrencyLimiter::new(LimiterConfig { max_concurrent })),
        )
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn limiter(&self) -> &ConcurrencyLimiter {
        &self.limiter
    }
}

impl Default for ResolutionContext {
    fn default() -> Self {
        Self::new(
            Arc::new(ResultCache::new()),
            Arc::new(ConcurrencyLimiter::default()),
        )
    }
}
