//! Application state for the FHIR bridge.
//!
//! Shared, immutable per process: the store client, the identity client,
//! the configuration, and the route table. Requests never mutate it.

use std::sync::Arc;

use fhirbridge_store::{DataStore, IdentityProvider};

use crate::config::ServerConfig;
use crate::error::StatusPolicy;
use crate::routing::pattern::RouteTable;

/// Shared application state.
///
/// # Type Parameters
///
/// * `S` - The backing store (must implement [`DataStore`])
/// * `I` - The identity provider (must implement [`IdentityProvider`])
pub struct AppState<S, I> {
    store: Arc<S>,
    identity: Arc<I>,
    config: Arc<ServerConfig>,
    routes: Arc<RouteTable>,
}

// Manually implement Clone since S and I are wrapped in Arc and need not be Clone
impl<S, I> Clone for AppState<S, I> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            identity: Arc::clone(&self.identity),
            config: Arc::clone(&self.config),
            routes: Arc::clone(&self.routes),
        }
    }
}

impl<S: DataStore, I: IdentityProvider> AppState<S, I> {
    /// Creates state with the standard route table.
    pub fn new(store: Arc<S>, identity: Arc<I>, config: ServerConfig) -> Self {
        Self {
            store,
            identity,
            config: Arc::new(config),
            routes: Arc::new(RouteTable::default()),
        }
    }

    /// Returns a reference to the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns a reference to the identity provider.
    pub fn identity(&self) -> &I {
        &self.identity
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the route table.
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Returns the configured status policy.
    pub fn status_policy(&self) -> StatusPolicy {
        self.config.status_policy
    }
}
