//! Error types for store and identity access.
//!
//! [`StoreError`] covers everything that can go wrong while reading rows;
//! [`AuthError`] covers resolving a caller's identity. Upstream messages are
//! carried through unchanged so the REST layer can surface them to clients.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// Errors raised while querying the backing store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// The store rejected or failed the query. The message is the store's own.
    #[error("{message}")]
    Query {
        table: String,
        status: Option<u16>,
        message: String,
    },

    /// A returned row did not have the expected shape.
    #[error("malformed {table} row: {message}")]
    Decode { table: String, message: String },

    /// The store could not be reached.
    #[error("store unreachable: {0}")]
    Transport(String),

    /// The call did not complete within the configured timeout.
    #[error("{operation} timed out after {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    /// The backend was constructed with an unusable configuration.
    #[error("invalid store configuration: {0}")]
    Config(String),
}

impl StoreError {
    /// Builds a decode error for the given table from any displayable cause.
    pub fn decode(table: &str, cause: impl std::fmt::Display) -> Self {
        StoreError::Decode {
            table: table.to_string(),
            message: cause.to_string(),
        }
    }

    /// Returns true when the error came from the call exceeding its deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, StoreError::Timeout { .. })
    }
}

/// Errors raised while resolving a caller's identity.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    /// No usable bearer credential was presented.
    #[error("missing bearer credentials")]
    MissingCredentials,

    /// The identity provider rejected the token.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// The identity provider failed or answered with something unexpected.
    #[error("identity provider error: {0}")]
    Provider(String),

    /// The identity lookup did not complete within the configured timeout.
    #[error("identity lookup timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
