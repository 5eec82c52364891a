//! # fhirbridge-rest - HTTP surface of the FHIR bridge
//!
//! Exposes patient demographics and glucose readings held in a relational
//! backing store as FHIR `Patient` and `Observation` resources. Every call is
//! made with the caller's own bearer token, so the store's row-level access
//! rules still apply.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fhirbridge_rest::{create_app_with_config, ServerConfig};
//! use fhirbridge_store::backends::postgrest::{PostgrestBackend, PostgrestConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = PostgrestBackend::new(PostgrestConfig::new(
//!         "https://project.supabase.co",
//!         "anon-key",
//!     ))?;
//!
//!     let app = create_app_with_config(backend.clone(), backend, ServerConfig::default());
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Method | Path | Response |
//! |--------|------|----------|
//! | `OPTIONS` | any | `200`, body `ok` |
//! | `GET` | `/get-patient/{id}` | `200 { "fhirData": Patient }` |
//! | `GET` | `/get-patient/{id}/glucose` | `200 { "fhirData": [Observation] }` |
//! | `GET` | `/health` | `200 { status, backend, timestamp }` |
//!
//! Anything else is answered with `400 { "error": "Invalid request" }`.
//!
//! ## Error Handling
//!
//! Every failure is rendered as `{ "error": message }`. Under the default
//! `uniform` status policy all failures other than authentication (`401`)
//! and authorization (`403`) use `400`. The `semantic` policy distinguishes
//! them:
//!
//! | Failure | uniform | semantic |
//! |---------|---------|----------|
//! | invalid request | 400 | 400 |
//! | patient not found | 400 | 404 |
//! | store query failed | 400 | 502 |
//! | upstream timeout | 400 | 504 |
//! | internal | 400 | 500 |
//!
//! ## Architecture
//!
//! - [`config`] - Server configuration
//! - [`error`] - Error types and status mapping
//! - [`state`] - Application state (store, identity provider, configuration)
//! - [`auth`] - Caller authentication and access policy
//! - [`extractors`] - Axum extractors
//! - [`routing`] - Route table and axum routes
//! - [`handlers`] - The request pipeline and resource handlers
//! - [`fetcher`] - Store queries
//! - [`mapper`] - Row to resource mapping
//! - [`sanitize`] - Placeholder substitution for missing values
//! - [`fhir_types`] - Output resource shapes
//! - [`responses`] - Response envelopes
//! - [`middleware`] - CORS headers

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod fetcher;
pub mod fhir_types;
pub mod handlers;
pub mod mapper;
pub mod middleware;
pub mod responses;
pub mod routing;
pub mod sanitize;
pub mod state;

// Re-export commonly used types
pub use config::{AccessPolicy, ServerConfig};
pub use error::{RestError, RestResult, StatusPolicy};
pub use state::AppState;

use std::sync::Arc;

use axum::Router;
use fhirbridge_store::{DataStore, IdentityProvider};
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

use crate::middleware::CorsHeaders;

/// Creates the Axum application with default configuration.
///
/// For more control, use [`create_app_with_config`].
pub fn create_app<S, I>(store: S, identity: I) -> Router
where
    S: DataStore + 'static,
    I: IdentityProvider + 'static,
{
    create_app_with_config(store, identity, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// # Arguments
///
/// * `store` - The backing store rows are read from
/// * `identity` - Resolves bearer tokens to callers
/// * `config` - Server configuration
pub fn create_app_with_config<S, I>(store: S, identity: I, config: ServerConfig) -> Router
where
    S: DataStore + 'static,
    I: IdentityProvider + 'static,
{
    create_app_from_state(AppState::new(Arc::new(store), Arc::new(identity), config))
}

/// Creates the Axum application around existing state.
///
/// Useful when the caller keeps its own handle on the store, as the
/// integration tests do.
pub fn create_app_from_state<S, I>(state: AppState<S, I>) -> Router
where
    S: DataStore + 'static,
    I: IdentityProvider + 'static,
{
    info!(
        backend = state.store().backend_name(),
        access_policy = ?state.config().access_policy,
        status_policy = ?state.status_policy(),
        "Creating FHIR bridge"
    );

    let config = state.config().clone();
    let router = routing::create_routes(state);

    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            config.request_timeout(),
        ));
    let router = router.layer(service_builder);

    match CorsHeaders::from_config(&config) {
        Some(cors) => cors.apply(router),
        None => router,
    }
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup. `RUST_LOG` overrides
/// `level` when set.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "fhirbridge_rest={level},fhirbridge_store={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
