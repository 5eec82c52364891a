//! HTTP request handlers.
//!
//! - [`dispatch`] - the request pipeline shared by every resource path
//! - [`patient`] - reads a patient and maps it to a FHIR `Patient`
//! - [`glucose`] - reads glucose readings and maps them to `Observation`s
//! - [`health`] - health check endpoint

pub mod dispatch;
pub mod glucose;
pub mod health;
pub mod patient;

pub use dispatch::{dispatch_handler, preflight_handler};
pub use glucose::read_glucose;
pub use health::health_handler;
pub use patient::read_patient;
