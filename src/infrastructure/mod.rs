//! Infrastructure Layer
//!
//! Shared runtime components: the lookup cache, the outbound concurrency
//! gate, retry timing and shutdown coordination.

pub mod concurrency_limiter;
pub mod result_cache;
pub mod retry;
pub mod shutdown;

pub use concurrency_limiter::{ConcurrencyLimiter, LimiterClosed, LimiterConfig, LimiterPermit};
pub use result_cache::{CacheNamespace, ResultCache};
pub use retry::RetryPolicy;
pub use shutdown::{shutdown_signal, RunGuard, ShutdownController};
