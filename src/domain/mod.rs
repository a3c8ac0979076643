//! Domain Layer
//!
//! Entities, value objects, geometry and the outbound ports of the
//! resolution pipeline.

pub mod country_catalog;
pub mod entities;
pub mod errors;
pub mod geometry;
pub mod ports;
pub mod services;
pub mod value_objects;
