//! Value Objects - Immutable domain primitives
//!
//! Value objects are identified by their value rather than identity.
//! They are immutable and can be freely shared.

use serde::{Deserialize, Serialize};

/// Reason a geocode lookup produced no coordinates.
///
/// Every variant is a normal, per-lookup outcome. None of them fail a
/// resolution run; they only exclude the mention from the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The backend answered and had no match for the address
    NotFound,
    /// The backend stayed unreachable through every retry
    TransientUnavailable,
    /// Malformed response or an unclassified transport failure
    Unexpected,
}

impl ErrorKind {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::TransientUnavailable => "transient_unavailable",
            Self::Unexpected => "unexpected",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Visual style attached to every emitted country feature.
///
/// The values are constants of the map front end, not computed per country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureStyle {
    pub fill_color: String,
    pub stroke_color: String,
    pub fill_opacity: f64,
    pub stroke_width: u32,
}

impl Default for FeatureStyle {
    fn default() -> Self {
        Self {
            fill_color: "#000000".to_string(),
            stroke_color: "#000000".to_string(),
            fill_opacity: 0.5,
            stroke_width: 1,
        }
    }
}
