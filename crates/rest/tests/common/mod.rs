//! Common test utilities for the bridge HTTP surface.
//!
//! - [`harness`] - a test server over in-memory collaborators
//! - [`fixtures`] - seed rows and tokens

#![allow(dead_code)]

pub mod fixtures;
pub mod harness;
