//! Adapters
//!
//! Inbound adapters drive the application (HTTP API); outbound adapters
//! implement the domain ports against external services.

pub mod inbound;
pub mod outbound;
