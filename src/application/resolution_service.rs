//! Resolution Service - Main application use case
//!
//! Drives one resolution run: extraction, the country batch followed by
//! the city batch, reconciliation, cache sweep and feature collection assembly.
//! This is the primary interface for the inbound adapter.

use crate::application::boundary_resolver::BoundaryResolver;
use crate::application::context::ResolutionContext;
use crate::application::entity_extractor::EntityExtractor;
use crate::application::geocode_resolver::GeocodeResolver;
use crate::domain::entities::{CountryCandidate, EntityRecord, ResolvedLocation};
use crate::domain::errors::ExtractionError;
use crate::domain::geometry::{BoundaryGeometry, Feature, FeatureCollection};
use crate::domain::ports::{BoundarySource, EntityRecognizer, GeocodingBackend};
use crate::domain::services::CountryScanner;
use crate::domain::value_objects::ErrorKind;
use crate::infrastructure::RetryPolicy;
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Failure of a whole run.
///
/// Lookup failures never end up here; they only remove the affected entity
/// from the outcome.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("entity extraction failed: {0}")]
    Extraction(#[from] ExtractionError),
}

/// Result of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolutionOutcome {
    /// Countries in catalog order, then cities in first-mention order
    pub entities: Vec<EntityRecord>,
    /// One feature per emitted country
    pub feature_collection: FeatureCollection,
}

/// Tunables for a [`ResolutionService`].
#[derive(Debug, Clone, Copy)]
pub struct PipelineSettings {
    /// Retry policy for geocode lookups
    pub retry: RetryPolicy,
    /// Deadline for each individual lookup, retries included
    pub lookup_timeout: Duration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            lookup_timeout: Duration::from_secs(30),
        }
    }
}

/// The geo-entity resolution pipeline.
pub struct ResolutionService {
    scanner: CountryScanner,
    extractor: EntityExtractor,
    geocoder: GeocodeResolver,
    boundaries: BoundaryResolver,
    ctx: ResolutionContext,
    lookup_timeout: Duration,
}

impl ResolutionService {
    /// Wire a pipeline over the given ports, sharing `ctx` between both
    /// resolvers.
    pub fn new(
        ctx: ResolutionContext,
        recognizer: Arc<dyn EntityRecognizer>,
        geocoders: Vec<Arc<dyn GeocodingBackend>>,
        boundary_source: Arc<dyn BoundarySource>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            scanner: CountryScanner::new(),
            extractor: EntityExtractor::new(recognizer),
            geocoder: GeocodeResolver::new(geocoders, ctx.clone(), settings.retry),
            boundaries: BoundaryResolver::new(boundary_source, ctx.clone()),
            ctx,
            lookup_timeout: settings.lookup_timeout,
        }
    }

    pub fn context(&self) -> &ResolutionContext {
        &self.ctx
    }

    pub fn geocoder_names(&self) -> Vec<&str> {
        self.geocoder.backend_names()
    }

    /// Resolve every place named in `text`.
    ///
    /// Fails only when entity extraction fails. Lookups that fail, time
    /// out or come back without a usable boundary are logged and left out.
    pub async fn run(&self, text: &str) -> Result<ResolutionOutcome, PipelineError> {
        let started = Instant::now();

        let (candidates, mentions) =
            tokio::join!(async { self.scanner.scan(text) }, self.extractor.extract(text));
        let mentions = mentions.map_err(|e| {
            tracing::error!("entity extraction failed: {}", e);
            PipelineError::from(e)
        })?;

        tracing::debug!(
            "found {} country candidates and {} place mentions",
            candidates.len(),
            mentions.len()
        );

        // Countries first. Cities start once every country lookup is in, so
        // a place that is also a country is served from the cache.
        let country_results = join_all(candidates.iter().map(|candidate| async move {
            let (location, boundary) = tokio::join!(
                self.geocode(&candidate.name),
                self.boundary(&candidate.iso3)
            );
            (location.with_iso3(candidate.iso3.as_str()), boundary)
        }))
        .await;
        let city_results = join_all(mentions.iter().map(|mention| self.geocode(mention))).await;

        let mut entities = Vec::with_capacity(candidates.len() + mentions.len());
        let mut features = Vec::with_capacity(candidates.len());

        for (candidate, (location, boundary)) in candidates.iter().zip(country_results) {
            if let Some((record, geometry)) = reconcile_country(candidate, &location, boundary) {
                entities.push(record);
                features.push(Feature::country(candidate.iso3.as_str(), geometry));
            }
        }

        for (mention, location) in mentions.iter().zip(city_results) {
            match EntityRecord::city(mention, &location) {
                Some(record) => entities.push(record),
                None => log_dropped("place", mention, &location),
            }
        }

        let feature_collection = FeatureCollection::new(features);

        let emitted = feature_collection.iso_codes();
        let swept = self.ctx.cache().retain_keys(&emitted);
        if swept > 0 {
            tracing::debug!("swept {} cache entries not in {:?}", swept, emitted);
        }

        tracing::info!(
            "resolved {} entities ({} countries) in {:?}",
            entities.len(),
            feature_collection.len(),
            started.elapsed()
        );

        Ok(ResolutionOutcome {
            entities,
            feature_collection,
        })
    }

    async fn geocode(&self, address: &str) -> ResolvedLocation {
        match tokio::time::timeout(self.lookup_timeout, self.geocoder.resolve(address)).await {
            Ok(location) => location,
            Err(_) => {
                tracing::warn!(
                    "geocode for {:?} timed out after {:?}",
                    address,
                    self.lookup_timeout
                );
                ResolvedLocation::failed(ErrorKind::TransientUnavailable)
            }
        }
    }

    async fn boundary(&self, iso3: &str) -> Option<Arc<BoundaryGeometry>> {
        match tokio::time::timeout(self.lookup_timeout, self.boundaries.resolve(iso3)).await {
            Ok(boundary) => boundary,
            Err(_) => {
                tracing::warn!("boundary for {} timed out after {:?}", iso3, self.lookup_timeout);
                None
            }
        }
    }
}

/// Keep a country iff its geocode succeeded and its boundary is present
/// and valid.
fn reconcile_country(
    candidate: &CountryCandidate,
    location: &ResolvedLocation,
    boundary: Option<Arc<BoundaryGeometry>>,
) -> Option<(EntityRecord, BoundaryGeometry)> {
    let Some(record) = EntityRecord::country(candidate, location) else {
        log_dropped("country", &candidate.name, location);
        return None;
    };

    let Some(geometry) = boundary else {
        tracing::debug!("dropping country {}: no boundary", candidate.iso3);
        return None;
    };

    if let Err(e) = geometry.validate() {
        tracing::debug!("dropping country {}: invalid boundary: {}", candidate.iso3, e);
        return None;
    }

    Some((record, (*geometry).clone()))
}

fn log_dropped(what: &str, name: &str, location: &ResolvedLocation) {
    match location.error_kind {
        Some(ErrorKind::NotFound) | None => {
            tracing::debug!("dropping {} {:?}: not found", what, name);
        }
        Some(kind) => {
            tracing::warn!("dropping {} {:?}: {}", what, name, kind);
        }
    }
}
