//! HTTP middleware.
//!
//! - [`cors`] - static CORS response headers

pub mod cors;

pub use cors::CorsHeaders;
