//! Bridge route configuration.

use axum::{
    Router,
    routing::{any, get},
};
use fhirbridge_store::{DataStore, IdentityProvider};

use crate::handlers;
use crate::state::AppState;

/// Creates the bridge routes.
///
/// # Routes
///
/// - `GET /health` - Health check, no authentication
/// - `GET /get-patient/{id}` - Patient read
/// - `GET /get-patient/{id}/glucose` - Glucose observations
/// - `OPTIONS` on any path - Preflight acknowledgement
///
/// The resource paths and the fallback all go through the dispatch pipeline,
/// which authenticates before it resolves the path. Anything that does not
/// resolve is answered with `Invalid request`.
pub fn create_routes<S, I>(state: AppState<S, I>) -> Router
where
    S: DataStore + 'static,
    I: IdentityProvider + 'static,
{
    Router::new()
        .route(
            "/health",
            get(handlers::health_handler::<S, I>)
                .options(handlers::preflight_handler)
                .fallback(handlers::dispatch_handler::<S, I>),
        )
        .route(
            "/get-patient/{id}",
            any(handlers::dispatch_handler::<S, I>),
        )
        .route(
            "/get-patient/{id}/glucose",
            any(handlers::dispatch_handler::<S, I>),
        )
        .fallback(handlers::dispatch_handler::<S, I>)
        .with_state(state)
}
