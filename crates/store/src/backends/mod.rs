//! Store backend implementations.
//!
//! - [`postgrest`] - PostgREST data API plus GoTrue auth API over HTTP
//! - [`memory`] - in-memory tables and a static token table

pub mod memory;
pub mod postgrest;
