//! Health check endpoint handler.
//!
//! Unauthenticated and never touches the backing store.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fhirbridge_store::{DataStore, IdentityProvider};
use serde::Serialize;
use tracing::debug;

use crate::state::AppState;

/// Body of the health response.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    /// Always `"healthy"` while the process serves requests.
    pub status: &'static str,
    /// Name of the configured backing store.
    pub backend: &'static str,
    /// Time of the check, RFC 3339.
    pub timestamp: String,
}

/// Handler for the health check endpoint.
///
/// # HTTP Request
///
/// `GET [base]/health`
pub async fn health_handler<S, I>(State(state): State<AppState<S, I>>) -> Response
where
    S: DataStore,
    I: IdentityProvider,
{
    debug!("Processing health check request");

    let body = HealthStatus {
        status: "healthy",
        backend: state.store().backend_name(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    (StatusCode::OK, Json(body)).into_response()
}
