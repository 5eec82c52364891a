//! PostgREST / GoTrue HTTP backend.
//!
//! Reads rows through a PostgREST data API (`{base}/rest/v1/{table}`) and
//! resolves identities through a GoTrue auth API (`{base}/auth/v1/user`), the
//! layout a Supabase project exposes. Every request carries the project API
//! key in `apikey` and the caller's own token in `Authorization`, so row-level
//! security is evaluated for the caller.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, header::ACCEPT};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

use crate::core::{AccessToken, DataStore, Identity, IdentityProvider};
use crate::error::{AuthError, StoreError, StoreResult};
use crate::query::Query;

/// Connection settings for [`PostgrestBackend`].
#[derive(Debug, Clone)]
pub struct PostgrestConfig {
    /// Project base URL, e.g. `https://abc.supabase.co`.
    pub base_url: String,
    /// Project API key sent as `apikey`.
    pub anon_key: String,
    /// Per-request HTTP timeout.
    pub timeout: Option<Duration>,
}

impl PostgrestConfig {
    /// Creates a configuration with no HTTP timeout.
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            anon_key: anon_key.into(),
            timeout: None,
        }
    }

    /// Sets the per-request HTTP timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// HTTP client for a PostgREST data API and a GoTrue auth API.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct PostgrestBackend {
    http: Client,
    base_url: String,
    anon_key: String,
    timeout: Option<Duration>,
}

impl PostgrestBackend {
    /// Creates a backend after validating the configuration.
    ///
    /// # Errors
    ///
    /// [`StoreError::Config`] if the URL is not an absolute http(s) URL, the
    /// key is empty, or the HTTP client cannot be built.
    pub fn new(config: PostgrestConfig) -> StoreResult<Self> {
        let url = Url::parse(&config.base_url)
            .map_err(|e| StoreError::Config(format!("invalid base URL: {}", e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(StoreError::Config(format!(
                "unsupported URL scheme: {}",
                url.scheme()
            )));
        }
        if config.anon_key.trim().is_empty() {
            return Err(StoreError::Config("API key is empty".to_string()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| StoreError::Config(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key,
            timeout: config.timeout,
        })
    }

    /// URL of the PostgREST endpoint for `table`.
    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// URL of the GoTrue user endpoint.
    pub fn user_url(&self) -> String {
        format!("{}/auth/v1/user", self.base_url)
    }

    fn authorized(&self, builder: RequestBuilder, token: &AccessToken) -> RequestBuilder {
        builder
            .header("apikey", &self.anon_key)
            .bearer_auth(token.as_str())
            .header(ACCEPT, "application/json")
    }

    fn timeout_ms(&self) -> u64 {
        self.timeout.map(|t| t.as_millis() as u64).unwrap_or_default()
    }

    fn transport_error(&self, operation: String, err: reqwest::Error) -> StoreError {
        if err.is_timeout() {
            StoreError::Timeout {
                operation,
                timeout_ms: self.timeout_ms(),
            }
        } else {
            StoreError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl DataStore for PostgrestBackend {
    fn backend_name(&self) -> &'static str {
        "postgrest"
    }

    async fn select(&self, token: &AccessToken, query: &Query) -> StoreResult<Vec<Value>> {
        let table = query.table();
        debug!(table = %table, select = %query.select_clause(), "PostgREST select");

        let request = self
            .http
            .get(self.table_url(table))
            .query(&query.to_query_pairs());
        let response = self
            .authorized(request, token)
            .send()
            .await
            .map_err(|e| self.transport_error(format!("select {}", table), e))?;

        let status = response.status();
        if !status.is_success() {
            let message = upstream_message(status, response).await;
            warn!(table = %table, status = status.as_u16(), message = %message, "PostgREST query failed");
            return Err(StoreError::Query {
                table: table.to_string(),
                status: Some(status.as_u16()),
                message,
            });
        }

        response
            .json::<Vec<Value>>()
            .await
            .map_err(|e| StoreError::decode(table, e))
    }
}

#[derive(Debug, Deserialize)]
struct GoTrueUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    app_metadata: Option<Map<String, Value>>,
}

impl From<GoTrueUser> for Identity {
    fn from(user: GoTrueUser) -> Self {
        // app_metadata is only writable server-side; user_metadata is not trusted.
        let patient_id = user
            .app_metadata
            .as_ref()
            .and_then(|metadata| metadata.get("patient_id"))
            .and_then(|value| match value {
                Value::String(text) if !text.is_empty() => Some(text.clone()),
                Value::Number(number) => Some(number.to_string()),
                _ => None,
            });

        Identity {
            id: user.id,
            email: user.email.filter(|email| !email.is_empty()),
            patient_id,
        }
    }
}

#[async_trait]
impl IdentityProvider for PostgrestBackend {
    async fn get_user(&self, token: &AccessToken) -> Result<Identity, AuthError> {
        let response = self
            .authorized(self.http.get(self.user_url()), token)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AuthError::Timeout {
                        timeout_ms: self.timeout_ms(),
                    }
                } else {
                    AuthError::Provider(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AuthError::InvalidToken(upstream_message(status, response).await));
        }
        if !status.is_success() {
            return Err(AuthError::Provider(upstream_message(status, response).await));
        }

        let user: GoTrueUser = response
            .json()
            .await
            .map_err(|e| AuthError::Provider(format!("unexpected user payload: {}", e)))?;
        Ok(user.into())
    }
}

/// Extracts the most specific error message an upstream service returned.
///
/// Tries the JSON fields PostgREST and GoTrue use, then the raw body, then
/// the status line.
async fn upstream_message(status: StatusCode, response: Response) -> String {
    let body = response.text().await.unwrap_or_default();

    if let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(&body) {
        for key in ["message", "msg", "error_description", "error"] {
            if let Some(Value::String(message)) = fields.get(key) {
                if !message.is_empty() {
                    return message.clone();
                }
            }
        }
    }

    let body = body.trim();
    if body.is_empty() {
        status.to_string()
    } else {
        body.to_string()
    }
}
