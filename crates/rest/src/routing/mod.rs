//! Route configuration.
//!
//! [`fhir_routes`] wires axum paths to handlers. [`pattern`] is the ordered
//! route table the dispatch pipeline resolves request paths against.

pub mod fhir_routes;
pub mod pattern;

pub use fhir_routes::create_routes;
pub use pattern::{PathPattern, ResourceRoute, RouteState, RouteTable};
