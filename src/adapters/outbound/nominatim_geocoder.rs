//! Nominatim Geocoder Adapter
//!
//! Implements GeocodingBackend using the OpenStreetMap Nominatim search API.
//! Nominatim's usage policy requires an identifying User-Agent, which the
//! adapter sends on every request.

use crate::adapters::outbound::http_support::{endpoint, status_error, transport_error};
use crate::domain::entities::GeocodeHit;
use crate::domain::errors::GeocodeError;
use crate::domain::ports::GeocodingBackend;
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use serde::Deserialize;

/// Nominatim configuration.
#[derive(Debug, Clone)]
pub struct NominatimConfig {
    /// Base URL of the Nominatim instance
    pub base_url: String,
    /// User-Agent sent with each request
    pub user_agent: String,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: "city-extractor".to_string(),
        }
    }
}

/// One search result. Coordinates arrive as decimal strings.
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
    display_name: Option<String>,
}

/// Geocoder backed by `GET /search`.
pub struct NominatimGeocoder {
    config: NominatimConfig,
    client: reqwest::Client,
}

impl NominatimGeocoder {
    pub fn new(config: NominatimConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn parse(address: &str, places: Vec<Place>) -> Result<Option<GeocodeHit>, GeocodeError> {
        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };

        let latitude = parse_coordinate(&place.lat)?;
        let longitude = parse_coordinate(&place.lon)?;

        Ok(Some(GeocodeHit {
            latitude,
            longitude,
            display_name: place.display_name.unwrap_or_else(|| address.to_string()),
        }))
    }
}

fn parse_coordinate(raw: &str) -> Result<f64, GeocodeError> {
    raw.trim()
        .parse()
        .map_err(|_| GeocodeError::Unexpected(format!("bad coordinate {:?}", raw)))
}

#[async_trait]
impl GeocodingBackend for NominatimGeocoder {
    fn name(&self) -> &str {
        "nominatim"
    }

    async fn search(&self, address: &str) -> Result<Option<GeocodeHit>, GeocodeError> {
        let url = endpoint(&self.config.base_url, "/search");
        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, self.config.user_agent.as_str())
            .query(&[("q", address), ("format", "jsonv2"), ("limit", "1")])
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(status_error(response.status()));
        }

        let places: Vec<Place> = response.json().await.map_err(transport_error)?;
        Self::parse(address, places)
    }
}
