//! # fhirbridge-store - backing-store access for the FHIR bridge
//!
//! This crate owns everything the bridge knows about the systems it reads
//! from: the raw row types, the query model, and the two collaborator traits
//! the REST layer depends on.
//!
//! - [`DataStore`] - filtered, read-only queries keyed by table name
//! - [`IdentityProvider`] - resolves a caller's bearer token to an [`Identity`]
//!
//! Two implementations are provided:
//!
//! - [`backends::postgrest::PostgrestBackend`] - talks to a PostgREST data API
//!   and a GoTrue auth API over HTTP (the Supabase layout)
//! - [`backends::memory::InMemoryBackend`] - table rows held in memory, used by
//!   tests and local demos
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fhirbridge_store::backends::postgrest::{PostgrestBackend, PostgrestConfig};
//! use fhirbridge_store::{AccessToken, DataStore, Query};
//!
//! let backend = PostgrestBackend::new(PostgrestConfig::new(
//!     "https://project.supabase.co",
//!     "anon-key",
//! ))?;
//!
//! let query = Query::from_table("diabetes_sugar")
//!     .select(["id", "patient_id", "created_at", "sugar_level"])
//!     .eq("patient_id", "42");
//! let rows = backend.select(&AccessToken::new("user-jwt"), &query).await?;
//! ```

#![warn(missing_docs)]

pub mod backends;
pub mod core;
pub mod error;
pub mod query;
pub mod types;

pub use crate::core::{AccessToken, DataStore, Identity, IdentityProvider};
pub use error::{AuthError, StoreError, StoreResult};
pub use query::{Filter, Query};
pub use types::{RawAddress, RawGlucoseReading, RawPatient, RawTelecom, Scalar};
