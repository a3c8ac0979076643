//! Boundary Resolver
//!
//! Fetches and parses a country outline, going through the cache and the
//! concurrency gate.

use crate::application::context::ResolutionContext;
use crate::domain::geometry::BoundaryGeometry;
use crate::domain::ports::BoundarySource;
use crate::infrastructure::CacheNamespace;
use std::sync::Arc;

/// Country identifier to boundary geometry.
///
/// One attempt per lookup, no retry. Any failure yields `None`.
pub struct BoundaryResolver {
    source: Arc<dyn BoundarySource>,
    ctx: ResolutionContext,
}

impl BoundaryResolver {
    pub fn new(source: Arc<dyn BoundarySource>, ctx: ResolutionContext) -> Self {
        Self { source, ctx }
    }

    /// Resolve the outline for `identifier` (an ISO alpha-3 code).
    ///
    /// The geometry is parsed but not validated; validity is checked when
    /// the run's results are reconciled.
    pub async fn resolve(&self, identifier: &str) -> Option<Arc<BoundaryGeometry>> {
        let cache = self.ctx.cache();
        if let Some(hit) = cache.get_boundary(identifier) {
            tracing::debug!("boundary cache hit for {}", identifier);
            return Some(hit);
        }

        let _guard = cache.lock_key(CacheNamespace::Boundary, identifier).await;
        if let Some(hit) = cache.get_boundary(identifier) {
            return Some(hit);
        }

        let raw = {
            let _permit = match self.ctx.limiter().acquire().await {
                Ok(permit) => permit,
                Err(e) => {
                    tracing::warn!("boundary lookup for {} skipped: {}", identifier, e);
                    return None;
                }
            };
            self.source.fetch_boundary(identifier).await
        };

        let value = match raw {
            Ok(Some(value)) => value,
            Ok(None) => {
                tracing::debug!("no boundary feature for {}", identifier);
                return None;
            }
            Err(e) => {
                tracing::warn!("boundary lookup for {} failed: {}", identifier, e);
                return None;
            }
        };

        match BoundaryGeometry::from_geojson(&value) {
            Ok(geometry) => {
                tracing::debug!(
                    "boundary for {}: {} polygon(s), {} positions",
                    identifier,
                    geometry.polygons().len(),
                    geometry.position_count()
                );
                let geometry = Arc::new(geometry);
                cache.insert_boundary(identifier, geometry.clone());
                Some(geometry)
            }
            Err(e) => {
                tracing::debug!("unusable boundary for {}: {}", identifier, e);
                None
            }
        }
    }
}
