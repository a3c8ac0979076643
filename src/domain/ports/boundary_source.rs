//! Boundary Source Port
//!
//! Defines the interface for fetching country outline geometry.

use crate::domain::errors::BoundaryError;
use async_trait::async_trait;

/// Source of boundary geometry for a country identifier.
///
/// Returns the GeoJSON geometry object of the best matching feature, or
/// `None` when the source has no feature for the identifier. Parsing and
/// validation are left to the caller.
#[async_trait]
pub trait BoundarySource: Send + Sync {
    /// Fetch the outline for a country name or ISO alpha-3 code.
    async fn fetch_boundary(
        &self,
        identifier: &str,
    ) -> Result<Option<serde_json::Value>, BoundaryError>;
}
