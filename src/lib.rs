//! geo-resolve Library
//!
//! Turns free text into geographic entities: places are extracted and
//! geocoded, country names are matched against the ISO 3166 catalog and
//! paired with their boundary polygons.
//!
//! This module exposes the components for use in integration tests and as a
//! library.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use application::{PipelineError, PipelineSettings, ResolutionContext, ResolutionOutcome, ResolutionService};
pub use config::load_config;
pub use domain::entities::{EntityRecord, ResolvedLocation};
pub use domain::geometry::{BoundaryGeometry, FeatureCollection};
pub use domain::ports::{BoundarySource, EntityRecognizer, GeocodingBackend};
pub use domain::services::CountryScanner;
