//! Application Layer
//!
//! Use cases built on the domain ports: extraction, the two resolvers and
//! the pipeline that drives them.

pub mod boundary_resolver;
pub mod context;
pub mod entity_extractor;
pub mod geocode_resolver;
pub mod resolution_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use boundary_resolver::BoundaryResolver;
pub use context::ResolutionContext;
pub use entity_extractor::EntityExtractor;
pub use geocode_resolver::GeocodeResolver;
pub use resolution_service::{PipelineError, PipelineSettings, ResolutionOutcome, ResolutionService};
