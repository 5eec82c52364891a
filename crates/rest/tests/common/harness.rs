//! Bridge test harness.

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum_test::{TestResponse, TestServer};
use fhirbridge_rest::{AppState, ServerConfig, create_app_from_state};
use fhirbridge_store::backends::memory::InMemoryBackend;

use super::fixtures;

const AUTHORIZATION: HeaderName = HeaderName::from_static("authorization");

/// A running test server plus a handle on its store.
pub struct BridgeTestHarness {
    /// The test server instance.
    pub server: TestServer,
    /// The in-memory store behind the server.
    pub backend: Arc<InMemoryBackend>,
}

impl BridgeTestHarness {
    /// Creates a seeded harness with the testing configuration.
    pub fn new() -> Self {
        Self::with_config(ServerConfig::for_testing())
    }

    /// Creates a seeded harness with `config`.
    pub fn with_config(config: ServerConfig) -> Self {
        let backend = Arc::new(InMemoryBackend::new());
        fixtures::seed(&backend);

        let state = AppState::new(
            Arc::clone(&backend),
            Arc::new(fixtures::identities()),
            config,
        );
        let server =
            TestServer::new(create_app_from_state(state)).expect("Failed to create test server");

        Self { server, backend }
    }

    /// `GET path` as the caller holding `token`.
    pub async fn get_as(&self, path: &str, token: &str) -> TestResponse {
        self.server
            .get(path)
            .add_header(AUTHORIZATION, bearer(token))
            .await
    }
}

/// Builds a `Bearer` header value.
pub fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).expect("valid header value")
}
