//! geocode.maps.co Boundary Adapter
//!
//! Implements BoundarySource using the geocode.maps.co search API with
//! polygon output enabled.

use crate::adapters::outbound::http_support::endpoint;
use crate::domain::country_catalog::by_alpha3;
use crate::domain::errors::BoundaryError;
use crate::domain::ports::BoundarySource;
use async_trait::async_trait;
use serde::Deserialize;

/// Boundary service configuration.
#[derive(Debug, Clone)]
pub struct BoundaryServiceConfig {
    /// Base URL of the search service
    pub base_url: String,
    /// API key, sent as the `api_key` query parameter when set
    pub api_key: Option<String>,
}

impl Default for BoundaryServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://geocode.maps.co".to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    features: Option<Vec<SearchFeature>>,
}

#[derive(Debug, Deserialize)]
struct SearchFeature {
    geometry: Option<serde_json::Value>,
}

/// Boundary source backed by `GET /search?format=geojson&polygon_geojson=1`.
///
/// ISO alpha-3 identifiers are searched by their catalog country name, which
/// the service matches far more reliably than the bare code.
pub struct GeocodeMapsBoundarySource {
    config: BoundaryServiceConfig,
    client: reqwest::Client,
}

impl GeocodeMapsBoundarySource {
    pub fn new(config: BoundaryServiceConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn search_term(identifier: &str) -> &str {
        by_alpha3(identifier).map_or(identifier, |country| country.name)
    }
}

#[async_trait]
impl BoundarySource for GeocodeMapsBoundarySource {
    async fn fetch_boundary(
        &self,
        identifier: &str,
    ) -> Result<Option<serde_json::Value>, BoundaryError> {
        let url = endpoint(&self.config.base_url, "/search");
        let mut query = vec![
            ("q", Self::search_term(identifier)),
            ("format", "geojson"),
            ("polygon_geojson", "1"),
        ];
        if let Some(key) = &self.config.api_key {
            query.push(("api_key", key.as_str()));
        }

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| BoundaryError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BoundaryError::Status(status.as_u16()));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| BoundaryError::Malformed(e.to_string()))?;

        Ok(body
            .features
            .and_then(|features| features.into_iter().next())
            .and_then(|feature| feature.geometry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source(server: &MockServer, api_key: Option<&str>) -> GeocodeMapsBoundarySource {
        GeocodeMapsBoundarySource::new(
            BoundaryServiceConfig {
                base_url: server.uri(),
                api_key: api_key.map(str::to_string),
            },
            reqwest::Client::new(),
        )
    }

    fn square() -> serde_json::Value {
        json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]]
        })
    }

    #[test]
    fn test_search_term_maps_iso_codes() {
        assert_eq!(GeocodeMapsBoundarySource::search_term("FRA"), "France");
        assert_eq!(GeocodeMapsBoundarySource::search_term("deu"), "Germany");
        assert_eq!(GeocodeMapsBoundarySource::search_term("Atlantis"), "Atlantis");
    }

    #[tokio::test]
    async fn test_fetch_first_feature_geometry() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "France"))
            .and(query_param("format", "geojson"))
            .and(query_param("polygon_geojson", "1"))
            .and(query_param("api_key", "k"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "type": "FeatureCollection",
                "features": [
                    {"type": "Feature", "properties": {}, "geometry": square()},
                    {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [0, 0]}}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let geometry = source(&server, Some("k")).fetch_boundary("FRA").await.unwrap();
        assert_eq!(geometry, Some(square()));
    }

    #[tokio::test]
    async fn test_fetch_no_features_is_none() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "type": "FeatureCollection",
                "features": []
            })))
            .mount(&server)
            .await;

        assert_eq!(source(&server, None).fetch_boundary("ATA").await, Ok(None));
    }

    #[tokio::test]
    async fn test_fetch_missing_features_key_is_none() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "quota"})))
            .mount(&server)
            .await;

        assert_eq!(source(&server, None).fetch_boundary("FRA").await, Ok(None));
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        assert_eq!(
            source(&server, None).fetch_boundary("FRA").await,
            Err(BoundaryError::Status(401))
        );
    }

    #[tokio::test]
    async fn test_fetch_malformed_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        assert!(matches!(
            source(&server, None).fetch_boundary("FRA").await,
            Err(BoundaryError::Malformed(_))
        ));
    }
}
