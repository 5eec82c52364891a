//! Error types for the FHIR bridge REST layer.
//!
//! Every failure a request can hit is funnelled into [`RestError`] and
//! rendered at the handler boundary as a JSON body `{ "error": "<message>" }`.
//! Clients never see a stack trace.
//!
//! # Status Mapping
//!
//! | Error | `uniform` | `semantic` |
//! |-------|-----------|------------|
//! | InvalidRequest | 400 | 400 |
//! | Unauthorized | 401 | 401 |
//! | Forbidden | 403 | 403 |
//! | NotFound | 400 | 404 |
//! | Fetch | 400 | 502 |
//! | Timeout | 400 | 504 |
//! | Internal | 400 | 500 |
//!
//! `uniform` matches the behavior existing clients depend on; `semantic`
//! distinguishes the failure kinds.

use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use clap::ValueEnum;
use fhirbridge_store::{AuthError, StoreError};

use crate::mapper::MappingError;

/// Message returned when no route matches the request.
pub const INVALID_REQUEST_MESSAGE: &str = "Invalid request";

/// How error kinds map to HTTP status codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StatusPolicy {
    /// Every request/data failure is a 400; only authentication and
    /// authorization failures are distinguished.
    #[default]
    Uniform,
    /// Each failure kind gets its own status code.
    Semantic,
}

/// The primary error type for REST operations.
#[derive(Debug, Clone, PartialEq)]
pub enum RestError {
    /// No route matched, or the method is not supported.
    InvalidRequest,

    /// The caller did not present valid credentials.
    Unauthorized {
        /// Error message.
        message: String,
    },

    /// The caller is authenticated but may not read this resource.
    Forbidden {
        /// Error message.
        message: String,
    },

    /// The requested record does not exist.
    NotFound {
        /// The resource type (e.g., "Patient").
        resource_type: String,
        /// The requested id.
        id: String,
    },

    /// The backing store failed the query.
    Fetch {
        /// The store's own message.
        message: String,
    },

    /// An upstream call did not complete in time.
    Timeout {
        /// Description of the call that timed out.
        message: String,
    },

    /// Anything else.
    Internal {
        /// Error message.
        message: String,
    },
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::InvalidRequest => f.write_str(INVALID_REQUEST_MESSAGE),
            RestError::Unauthorized { message } => write!(f, "Unauthorized: {}", message),
            RestError::Forbidden { message } => write!(f, "Forbidden: {}", message),
            RestError::NotFound { resource_type, id } => {
                write!(f, "Resource not found: {}/{}", resource_type, id)
            }
            RestError::Fetch { message } => f.write_str(message),
            RestError::Timeout { message } => write!(f, "Timeout: {}", message),
            RestError::Internal { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for RestError {}

impl RestError {
    /// Returns the HTTP status for this error under `policy`.
    pub fn status(&self, policy: StatusPolicy) -> StatusCode {
        match (self, policy) {
            (RestError::Unauthorized { .. }, _) => StatusCode::UNAUTHORIZED,
            (RestError::Forbidden { .. }, _) => StatusCode::FORBIDDEN,
            (RestError::InvalidRequest, _) | (_, StatusPolicy::Uniform) => StatusCode::BAD_REQUEST,
            (RestError::NotFound { .. }, StatusPolicy::Semantic) => StatusCode::NOT_FOUND,
            (RestError::Fetch { .. }, StatusPolicy::Semantic) => StatusCode::BAD_GATEWAY,
            (RestError::Timeout { .. }, StatusPolicy::Semantic) => StatusCode::GATEWAY_TIMEOUT,
            (RestError::Internal { .. }, StatusPolicy::Semantic) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns true for failures caused by an upstream service rather than
    /// the request itself.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            RestError::Fetch { .. } | RestError::Timeout { .. } | RestError::Internal { .. }
        )
    }

    /// Renders the error as a response under `policy`.
    pub fn into_response_with(self, policy: StatusPolicy) -> Response {
        let status = self.status(policy);
        (status, Json(error_body(&self.to_string()))).into_response()
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        self.into_response_with(StatusPolicy::Uniform)
    }
}

/// Creates the JSON error body.
pub fn error_body(message: &str) -> serde_json::Value {
    serde_json::json!({ "error": message })
}

impl From<StoreError> for RestError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Timeout { .. } => RestError::Timeout {
                message: err.to_string(),
            },
            StoreError::Config(_) => RestError::Internal {
                message: err.to_string(),
            },
            _ => RestError::Fetch {
                message: err.to_string(),
            },
        }
    }
}

impl From<AuthError> for RestError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials | AuthError::InvalidToken(_) => {
                RestError::Unauthorized {
                    message: err.to_string(),
                }
            }
            AuthError::Timeout { .. } => RestError::Timeout {
                message: err.to_string(),
            },
            AuthError::Provider(_) => RestError::Internal {
                message: err.to_string(),
            },
        }
    }
}

impl From<MappingError> for RestError {
    fn from(err: MappingError) -> Self {
        match err {
            MappingError::NotFound { resource_type, id } => RestError::NotFound {
                resource_type: resource_type.to_string(),
                id,
            },
        }
    }
}

/// Result type alias for REST operations.
pub type RestResult<T> = Result<T, RestError>;
