//! Geocode Resolver
//!
//! Resolves an address to coordinates through the cache, the concurrency
//! gate and an ordered list of geocoding backends.

use crate::application::context::ResolutionContext;
use crate::domain::entities::{GeocodeHit, ResolvedLocation};
use crate::domain::errors::GeocodeError;
use crate::domain::ports::GeocodingBackend;
use crate::domain::value_objects::ErrorKind;
use crate::infrastructure::{CacheNamespace, RetryPolicy};
use std::sync::Arc;

/// Address to coordinates, with retry and backend fallback.
///
/// Lookups never fail: every outcome is a [`ResolvedLocation`], tagged with
/// an [`ErrorKind`] when no coordinates were found.
pub struct GeocodeResolver {
    backends: Vec<Arc<dyn GeocodingBackend>>,
    ctx: ResolutionContext,
    retry: RetryPolicy,
}

impl GeocodeResolver {
    /// Create a resolver over `backends`, tried in order.
    pub fn new(
        backends: Vec<Arc<dyn GeocodingBackend>>,
        ctx: ResolutionContext,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            backends,
            ctx,
            retry,
        }
    }

    pub fn backend_names(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    /// Resolve `address`.
    ///
    /// A cached answer short-circuits all network activity. Concurrent
    /// calls for the same address wait on one another so only the first
    /// reaches a backend.
    pub async fn resolve(&self, address: &str) -> ResolvedLocation {
        let cache = self.ctx.cache();
        if let Some(hit) = cache.get_location(address) {
            tracing::debug!("geocode cache hit for {:?}", address);
            return hit;
        }

        let _guard = cache.lock_key(CacheNamespace::Location, address).await;
        if let Some(hit) = cache.get_location(address) {
            tracing::debug!("geocode for {:?} filled while waiting", address);
            return hit;
        }

        let location = self.lookup(address).await;

        // Failures are cached too: within a run the address gets one
        // attempt sequence. The end-of-run sweep evicts place-name keys, so
        // the next run retries.
        cache.insert_location(address, location.clone());

        location
    }

    async fn lookup(&self, address: &str) -> ResolvedLocation {
        if self.backends.is_empty() {
            tracing::warn!("no geocoding backend configured, cannot resolve {:?}", address);
            return ResolvedLocation::failed(ErrorKind::Unexpected);
        }

        let mut saw_transient = false;
        let mut saw_unexpected = false;

        for backend in &self.backends {
            match self.query(backend.as_ref(), address).await {
                Ok(Some(hit)) => {
                    tracing::debug!(
                        "{} resolved {:?} to ({}, {})",
                        backend.name(),
                        address,
                        hit.latitude,
                        hit.longitude
                    );
                    return ResolvedLocation::found(hit);
                }
                Ok(None) => {
                    tracing::debug!("{} has no match for {:?}", backend.name(), address);
                }
                Err(e) => {
                    tracing::warn!("{} failed for {:?}: {}", backend.name(), address, e);
                    match e.kind() {
                        ErrorKind::TransientUnavailable => saw_transient = true,
                        _ => saw_unexpected = true,
                    }
                }
            }
        }

        let kind = if saw_transient {
            ErrorKind::TransientUnavailable
        } else if saw_unexpected {
            ErrorKind::Unexpected
        } else {
            ErrorKind::NotFound
        };
        ResolvedLocation::failed(kind)
    }

    /// One backend, with retry on transient failures.
    async fn query(
        &self,
        backend: &dyn GeocodingBackend,
        address: &str,
    ) -> Result<Option<GeocodeHit>, GeocodeError> {
        let operation = format!("geocode {:?} via {}", address, backend.name());
        self.retry
            .run(
                &operation,
                |_attempt| self.attempt(backend, address),
                GeocodeError::is_transient,
            )
            .await
    }

    /// A single call, holding a limiter slot for its duration only.
    ///
    /// The slot is released before any retry pause.
    async fn attempt(
        &self,
        backend: &dyn GeocodingBackend,
        address: &str,
    ) -> Result<Option<GeocodeHit>, GeocodeError> {
        let _permit = self
            .ctx
            .limiter()
            .acquire()
            .await
            .map_err(|e| GeocodeError::Unexpected(e.to_string()))?;
        backend.search(address).await
    }
}
