//! The request pipeline.
//!
//! Every resource request runs the same stages, in order:
//!
//! 1. `OPTIONS` short-circuits with the preflight acknowledgement
//! 2. the bearer credential must be present
//! 3. the identity provider must accept it
//! 4. the path must resolve to a route
//! 5. the access policy must allow the caller to read the patient
//! 6. the matching handler fetches, maps, and renders
//!
//! Any failure stops the pipeline and is rendered as `{ "error": message }`
//! under the configured status policy.

use axum::{
    extract::State,
    http::{Method, Uri},
    response::Response,
};
use fhirbridge_store::{DataStore, IdentityProvider};
use tracing::{debug, error, warn};

use crate::auth::{authenticate, authorize};
use crate::error::{RestError, RestResult};
use crate::extractors::BearerCredentials;
use crate::fetcher::Fetcher;
use crate::handlers::{read_glucose, read_patient};
use crate::responses::preflight_response;
use crate::routing::pattern::RouteState;
use crate::state::AppState;

/// Acknowledges a preflight request.
pub async fn preflight_handler() -> Response {
    preflight_response()
}

/// Runs the full pipeline for one request.
pub async fn dispatch_handler<S, I>(
    State(state): State<AppState<S, I>>,
    method: Method,
    uri: Uri,
    credentials: BearerCredentials,
) -> Response
where
    S: DataStore,
    I: IdentityProvider,
{
    if method == Method::OPTIONS {
        debug!(path = %uri.path(), "Preflight request");
        return preflight_response();
    }

    match handle(&state, &method, uri.path(), &credentials).await {
        Ok(response) => response,
        Err(err) => {
            let policy = state.status_policy();
            let status = err.status(policy);
            if err.is_upstream() || status.is_server_error() {
                error!(method = %method, path = %uri.path(), status = %status, error = %err, "Request failed");
            } else {
                warn!(method = %method, path = %uri.path(), status = %status, error = %err, "Request rejected");
            }
            err.into_response_with(policy)
        }
    }
}

async fn handle<S, I>(
    state: &AppState<S, I>,
    method: &Method,
    path: &str,
    credentials: &BearerCredentials,
) -> RestResult<Response>
where
    S: DataStore,
    I: IdentityProvider,
{
    let token = credentials.require()?;
    let timeout = state.config().upstream_timeout();

    let identity = authenticate(state.identity(), token, timeout).await?;
    let route = state.routes().resolve(method, path)?;

    let fetcher = Fetcher::new(state.store(), token, timeout);
    match route {
        RouteState::MatchedPatient { id } => {
            authorize(state.config().access_policy, &identity, &id)?;
            read_patient(&fetcher, &id).await
        }
        RouteState::MatchedGlucose { id } => {
            authorize(state.config().access_policy, &identity, &id)?;
            read_glucose(&fetcher, &id, state.config().observation_id).await
        }
        RouteState::Unmatched => Err(RestError::InvalidRequest),
    }
}
