//! Geocoding Backend Port
//!
//! Defines the interface for resolving a free-form address to coordinates.

use crate::domain::entities::GeocodeHit;
use crate::domain::errors::GeocodeError;
use async_trait::async_trait;

/// Backend that turns an address string into coordinates.
///
/// Implementations classify their failures: `Ok(None)` when the provider
/// affirmatively has no match, `GeocodeError::Transient` when a retry may
/// help, `GeocodeError::Unexpected` otherwise. Backends must tolerate being
/// called several times per run.
#[async_trait]
pub trait GeocodingBackend: Send + Sync {
    /// Short provider name used in logs.
    fn name(&self) -> &str;

    /// Search for `address`.
    async fn search(&self, address: &str) -> Result<Option<GeocodeHit>, GeocodeError>;
}
