//! Domain Errors
//!
//! Failure types crossing the outbound ports. Each one is scoped to a single
//! lookup; the pipeline converts them into tagged results instead of
//! propagating them.

use crate::domain::value_objects::ErrorKind;

/// Failure reported by a geocoding backend.
///
/// "No match" is not an error: backends report it as `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeocodeError {
    /// Backend temporarily unreachable; worth retrying
    #[error("geocoder temporarily unavailable: {0}")]
    Transient(String),
    /// Malformed response or unclassified failure; retrying will not help
    #[error("unexpected geocoder failure: {0}")]
    Unexpected(String),
}

impl GeocodeError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    /// The error kind recorded on the failed lookup.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transient(_) => ErrorKind::TransientUnavailable,
            Self::Unexpected(_) => ErrorKind::Unexpected,
        }
    }
}

/// Failure reported by a boundary source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoundaryError {
    #[error("boundary request failed: {0}")]
    Request(String),
    #[error("boundary service returned status {0}")]
    Status(u16),
    #[error("malformed boundary response: {0}")]
    Malformed(String),
}

/// Failure of the entity recognizer.
///
/// Unlike lookup failures this one aborts the run: without extraction there
/// is nothing to resolve.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    #[error("entity recognizer unreachable: {0}")]
    Unavailable(String),
    #[error("entity recognizer returned status {0}")]
    Status(u16),
    #[error("malformed recognizer response: {0}")]
    Malformed(String),
}

/// Failure to read a GeoJSON geometry into a boundary.
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    #[error("unsupported geometry type: {0}")]
    UnsupportedType(String),
    #[error("malformed geometry: {0}")]
    Malformed(#[from] serde_json::Error),
}
