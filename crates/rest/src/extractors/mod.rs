//! Axum extractors.
//!
//! - [`BearerCredentials`] - the caller's bearer token, if any

mod bearer;

pub use bearer::BearerCredentials;
