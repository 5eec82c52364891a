//! Collaborator traits.
//!
//! The REST layer only ever talks to the outside world through these two
//! traits. Both are called once per request stage and hold no per-request
//! state, so a single instance is shared across all requests.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AuthError, StoreResult};
use crate::query::Query;

/// A caller's bearer token, forwarded verbatim to the store and identity
/// provider.
///
/// `Debug` never prints the token.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a raw token (without the `Bearer ` prefix).
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(..)")
    }
}

/// The authenticated caller, as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable user id.
    pub id: String,
    /// Email, when the provider knows one.
    pub email: Option<String>,
    /// Patient record this user is bound to, from provider-controlled metadata.
    pub patient_id: Option<String>,
}

impl Identity {
    /// Creates an identity with only a user id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
            patient_id: None,
        }
    }

    /// Sets the bound patient id.
    #[must_use]
    pub fn with_patient_id(mut self, patient_id: impl Into<String>) -> Self {
        self.patient_id = Some(patient_id.into());
        self
    }

    /// Sets the email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Read access to the backing store.
///
/// Rows come back as JSON objects with embedded child tables as nested arrays.
/// Implementations do no shaping beyond that.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Returns a human-readable name for this backend.
    fn backend_name(&self) -> &'static str;

    /// Runs `query` on behalf of the caller holding `token`.
    ///
    /// # Errors
    ///
    /// Any upstream failure is returned with the upstream message preserved.
    async fn select(&self, token: &AccessToken, query: &Query) -> StoreResult<Vec<Value>>;
}

/// Resolves bearer tokens to caller identities.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Looks up the user behind `token`.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidToken`] when the provider rejects the token,
    /// [`AuthError::Provider`] for any other failure.
    async fn get_user(&self, token: &AccessToken) -> Result<Identity, AuthError>;
}
