//! Domain Entities - Core business objects
//!
//! These entities represent the place mentions flowing through a resolution
//! run and the records it emits. They have no dependencies beyond serde.

use crate::domain::value_objects::ErrorKind;
use serde::{Deserialize, Serialize};

/// A string extracted from text naming a location.
///
/// Not unique and not validated; it lives only for the duration of one run.
pub type PlaceMention = String;

/// Label class assigned to a span by the entity recognizer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityLabel {
    /// Geopolitical entity: countries, cities, states
    Gpe,
    /// Non-GPE location: mountain ranges, bodies of water
    Loc,
    /// Facility: buildings, airports, bridges
    Fac,
    /// Any other label the recognizer emits (PERSON, ORG, ...)
    Other(String),
}

impl EntityLabel {
    /// Parse a recognizer label, case-insensitively.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "GPE" => Self::Gpe,
            "LOC" => Self::Loc,
            "FAC" => Self::Fac,
            other => Self::Other(other.to_string()),
        }
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Gpe => "GPE",
            Self::Loc => "LOC",
            Self::Fac => "FAC",
            Self::Other(label) => label,
        }
    }

    /// Whether spans with this label name a place worth geocoding.
    pub fn is_geographic(&self) -> bool {
        matches!(self, Self::Gpe | Self::Loc | Self::Fac)
    }
}

impl From<String> for EntityLabel {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<EntityLabel> for String {
    fn from(label: EntityLabel) -> Self {
        label.as_str().to_string()
    }
}

/// A labelled span returned by the entity recognizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognizedEntity {
    pub text: String,
    pub label: EntityLabel,
}

impl RecognizedEntity {
    pub fn new(text: impl Into<String>, label: EntityLabel) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

/// A country whose catalog name appears verbatim in the input text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CountryCandidate {
    /// Catalog name, exactly as matched
    pub name: String,
    /// ISO 3166-1 alpha-3 code
    pub iso3: String,
}

impl CountryCandidate {
    pub fn new(name: impl Into<String>, iso3: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            iso3: iso3.into(),
        }
    }
}

/// A successful answer from a geocoding backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeHit {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
}

/// Outcome of geocoding one address.
///
/// Coordinates and `error_kind` are mutually exclusive; the only way to
/// build one is through [`ResolvedLocation::found`] or
/// [`ResolvedLocation::failed`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub display_address: Option<String>,
    pub iso3: Option<String>,
    pub error_kind: Option<ErrorKind>,
}

impl ResolvedLocation {
    /// A location resolved to coordinates.
    pub fn found(hit: GeocodeHit) -> Self {
        Self {
            latitude: Some(hit.latitude),
            longitude: Some(hit.longitude),
            display_address: Some(hit.display_name),
            iso3: None,
            error_kind: None,
        }
    }

    /// A lookup that produced no coordinates.
    pub fn failed(kind: ErrorKind) -> Self {
        Self {
            latitude: None,
            longitude: None,
            display_address: None,
            iso3: None,
            error_kind: Some(kind),
        }
    }

    /// Tag the location with the country it was resolved for.
    pub fn with_iso3(mut self, iso3: impl Into<String>) -> Self {
        self.iso3 = Some(iso3.into());
        self
    }

    /// Latitude/longitude pair, if the lookup succeeded.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        if self.error_kind.is_some() {
            return None;
        }
        Some((self.latitude?, self.longitude?))
    }

    pub fn is_resolved(&self) -> bool {
        self.coordinates().is_some()
    }
}

/// A reconciled output row: one resolved country or city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso3: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl EntityRecord {
    /// Build the record for a country candidate, if its geocode succeeded.
    pub fn country(candidate: &CountryCandidate, location: &ResolvedLocation) -> Option<Self> {
        let (latitude, longitude) = location.coordinates()?;
        Some(Self {
            name: candidate.name.clone(),
            iso3: Some(candidate.iso3.clone()),
            latitude,
            longitude,
        })
    }

    /// Build the record for a city mention, if its geocode succeeded.
    ///
    /// The name is the first comma-separated segment of the display address
    /// ("Paris, Île-de-France, France" -> "Paris"), falling back to the
    /// mention itself.
    pub fn city(mention: &str, location: &ResolvedLocation) -> Option<Self> {
        let (latitude, longitude) = location.coordinates()?;
        let name = location
            .display_address
            .as_deref()
            .and_then(|addr| addr.split(',').next())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(mention)
            .to_string();

        Some(Self {
            name,
            iso3: None,
            latitude,
            longitude,
        })
    }
}
