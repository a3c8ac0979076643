//! Bing Maps Geocoder Adapter
//!
//! Implements GeocodingBackend using the Bing Maps Locations REST API.

use crate::adapters::outbound::http_support::{endpoint, status_error, transport_error};
use crate::domain::entities::GeocodeHit;
use crate::domain::errors::GeocodeError;
use crate::domain::ports::GeocodingBackend;
use async_trait::async_trait;
use serde::Deserialize;

/// Bing Maps configuration.
#[derive(Debug, Clone)]
pub struct BingConfig {
    /// Base URL of the REST service
    pub base_url: String,
    /// Bing Maps key
    pub api_key: String,
}

impl Default for BingConfig {
    fn default() -> Self {
        Self {
            base_url: "http://dev.virtualearth.net".to_string(),
            api_key: String::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocationsResponse {
    #[serde(default)]
    resource_sets: Vec<ResourceSet>,
}

#[derive(Debug, Deserialize)]
struct ResourceSet {
    #[serde(default)]
    resources: Vec<LocationResource>,
}

#[derive(Debug, Deserialize)]
struct LocationResource {
    name: Option<String>,
    point: Point,
}

#[derive(Debug, Deserialize)]
struct Point {
    /// `[latitude, longitude]`
    coordinates: [f64; 2],
}

/// Geocoder backed by `GET /REST/v1/Locations`.
pub struct BingGeocoder {
    config: BingConfig,
    client: reqwest::Client,
}

impl BingGeocoder {
    pub fn new(config: BingConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn parse(address: &str, body: LocationsResponse) -> Option<GeocodeHit> {
        let resource = body
            .resource_sets
            .into_iter()
            .next()?
            .resources
            .into_iter()
            .next()?;

        let [latitude, longitude] = resource.point.coordinates;
        Some(GeocodeHit {
            latitude,
            longitude,
            display_name: resource
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| address.to_string()),
        })
    }
}

#[async_trait]
impl GeocodingBackend for BingGeocoder {
    fn name(&self) -> &str {
        "bing"
    }

    async fn search(&self, address: &str) -> Result<Option<GeocodeHit>, GeocodeError> {
        let url = endpoint(&self.config.base_url, "/REST/v1/Locations");
        let response = self
            .client
            .get(&url)
            .query(&[("q", address), ("key", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(status_error(response.status()));
        }

        let body: LocationsResponse = response.json().await.map_err(transport_error)?;
        Ok(Self::parse(address, body))
    }
}
