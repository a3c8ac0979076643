//! Country Candidate Scanner
//!
//! Pure domain logic for spotting country names in text.
//! This service has NO external dependencies - it's pure Rust.

use crate::domain::country_catalog::{CountryEntry, COUNTRIES};
use crate::domain::entities::CountryCandidate;
use std::collections::HashSet;

/// Scans text for verbatim country names.
///
/// A country is a candidate iff its full catalog name is a substring of the
/// text. Matching is exact and case-sensitive: "france" or "the French
/// Republic" do not match, and a name embedded in a longer word
/// ("Oman" in "Romania") does.
#[derive(Debug, Clone, Copy)]
pub struct CountryScanner {
    catalog: &'static [CountryEntry],
}

impl CountryScanner {
    /// Scanner over the full ISO 3166-1 catalog.
    pub fn new() -> Self {
        Self::with_catalog(COUNTRIES)
    }

    /// Scanner over a custom catalog.
    pub fn with_catalog(catalog: &'static [CountryEntry]) -> Self {
        Self { catalog }
    }

    /// Find every catalog country named in `text`.
    ///
    /// Candidates come back in catalog order, deduplicated by alpha-3 code.
    pub fn scan(&self, text: &str) -> Vec<CountryCandidate> {
        let mut seen = HashSet::new();

        self.catalog
            .iter()
            .filter(|country| text.contains(country.name))
            .filter(|country| seen.insert(country.alpha3))
            .map(|country| CountryCandidate::new(country.name, country.alpha3))
            .collect()
    }
}

impl Default for CountryScanner {
    fn default() -> Self {
        Self::new()
    }
}
