mod boundary_source;
mod entity_recognizer;
mod geocoding_backend;

pub use boundary_source::BoundarySource;
pub use entity_recognizer::EntityRecognizer;
pub use geocoding_backend::GeocodingBackend;
