mod bing_geocoder;
mod gazetteer_recognizer;
mod geocode_maps_boundary_source;
mod http_entity_recognizer;
mod http_support;
mod nominatim_geocoder;

pub use bing_geocoder::{BingConfig, BingGeocoder};
pub use gazetteer_recognizer::GazetteerRecognizer;
pub use geocode_maps_boundary_source::{BoundaryServiceConfig, GeocodeMapsBoundarySource};
pub use http_entity_recognizer::HttpEntityRecognizer;
pub use http_support::build_client;
pub use nominatim_geocoder::{NominatimConfig, NominatimGeocoder};
