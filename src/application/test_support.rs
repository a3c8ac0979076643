//! In-memory port implementations for application tests.

use crate::domain::entities::{EntityLabel, GeocodeHit, RecognizedEntity};
use crate::domain::errors::{BoundaryError, ExtractionError, GeocodeError};
use crate::domain::ports::{BoundarySource, EntityRecognizer, GeocodingBackend};
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Scripted answer for one geocoder call.
#[derive(Debug, Clone)]
pub enum Reply {
    Hit(f64, f64, &'static str),
    NotFound,
    Transient,
    Unexpected,
}

/// Geocoder with per-address scripted replies and call counting.
///
/// Each address pops its script front to back; the last reply repeats once
/// the script runs out. Unknown addresses are NotFound.
pub struct ScriptedGeocoder {
    name: String,
    scripts: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: DashMap<String, u32>,
    total: AtomicU32,
    latency: Duration,
}

impl ScriptedGeocoder {
    pub fn new() -> Self {
        Self::named("scripted")
    }

    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            scripts: Mutex::new(HashMap::new()),
            calls: DashMap::new(),
            total: AtomicU32::new(0),
            latency: Duration::ZERO,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn reply(self, address: &str, replies: Vec<Reply>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(address.to_string(), replies.into());
        self
    }

    pub fn hit(self, address: &str, lat: f64, lon: f64, display: &'static str) -> Self {
        self.reply(address, vec![Reply::Hit(lat, lon, display)])
    }

    pub fn calls(&self, address: &str) -> u32 {
        self.calls.get(address).map(|c| *c).unwrap_or(0)
    }

    pub fn total_calls(&self) -> u32 {
        self.total.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeocodingBackend for ScriptedGeocoder {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, address: &str) -> Result<Option<GeocodeHit>, GeocodeError> {
        *self.calls.entry(address.to_string()).or_insert(0) += 1;
        self.total.fetch_add(1, Ordering::SeqCst);

        let reply = {
            let mut scripts = self.scripts.lock().unwrap();
            match scripts.get_mut(address) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        match reply.unwrap_or(Reply::NotFound) {
            Reply::Hit(latitude, longitude, display) => Ok(Some(GeocodeHit {
                latitude,
                longitude,
                display_name: display.to_string(),
            })),
            Reply::NotFound => Ok(None),
            Reply::Transient => Err(GeocodeError::Transient("503".into())),
            Reply::Unexpected => Err(GeocodeError::Unexpected("garbage".into())),
        }
    }
}

/// Recognizer returning a fixed entity list regardless of input.
pub struct StaticRecognizer {
    entities: Vec<RecognizedEntity>,
    fail: bool,
}

impl StaticRecognizer {
    pub fn new(entities: &[(&str, &str)]) -> Self {
        Self {
            entities: entities
                .iter()
                .map(|(text, label)| RecognizedEntity::new(*text, EntityLabel::parse(label)))
                .collect(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            entities: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl EntityRecognizer for StaticRecognizer {
    async fn recognize(&self, _text: &str) -> Result<Vec<RecognizedEntity>, ExtractionError> {
        if self.fail {
            return Err(ExtractionError::Unavailable("connection refused".into()));
        }
        Ok(self.entities.clone())
    }
}

/// Boundary source backed by a map of identifier to GeoJSON geometry.
pub struct StaticBoundarySource {
    geometries: HashMap<String, serde_json::Value>,
    calls: DashMap<String, u32>,
    fail: bool,
}

impl StaticBoundarySource {
    pub fn new() -> Self {
        Self {
            geometries: HashMap::new(),
            calls: DashMap::new(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn with(mut self, identifier: &str, geometry: serde_json::Value) -> Self {
        self.geometries.insert(identifier.to_string(), geometry);
        self
    }

    /// Register a valid unit square offset by `x`.
    pub fn square(self, identifier: &str, x: f64) -> Self {
        self.with(identifier, square_geojson(x))
    }

    pub fn calls(&self, identifier: &str) -> u32 {
        self.calls.get(identifier).map(|c| *c).unwrap_or(0)
    }
}

#[async_trait]
impl BoundarySource for StaticBoundarySource {
    async fn fetch_boundary(
        &self,
        identifier: &str,
    ) -> Result<Option<serde_json::Value>, BoundaryError> {
        *self.calls.entry(identifier.to_string()).or_insert(0) += 1;
        if self.fail {
            return Err(BoundaryError::Status(500));
        }
        Ok(self.geometries.get(identifier).cloned())
    }
}

pub fn square_geojson(x: f64) -> serde_json::Value {
    json!({
        "type": "Polygon",
        "coordinates": [[[x, 0.0], [x + 1.0, 0.0], [x + 1.0, 1.0], [x, 1.0], [x, 0.0]]]
    })
}

pub fn bowtie_geojson() -> serde_json::Value {
    json!({
        "type": "Polygon",
        "coordinates": [[[0.0, 0.0], [1.0, 1.0], [1.0, 0.0], [0.0, 1.0], [0.0, 0.0]]]
    })
}
