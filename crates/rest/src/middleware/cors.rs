//! Static CORS response headers.
//!
//! Preflight requests are answered by the dispatch pipeline with a plain
//! `ok` body, so this only stamps the two allow headers onto every response.

use axum::{
    Router,
    http::{
        HeaderValue,
        header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_ORIGIN},
    },
};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::warn;

use crate::config::ServerConfig;

/// Parsed CORS header values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsHeaders {
    /// `Access-Control-Allow-Origin`
    pub allow_origin: HeaderValue,
    /// `Access-Control-Allow-Headers`
    pub allow_headers: HeaderValue,
}

impl CorsHeaders {
    /// Builds the header values from configuration.
    ///
    /// Returns `None` when CORS is disabled or a configured value is not a
    /// valid header value.
    pub fn from_config(config: &ServerConfig) -> Option<Self> {
        if !config.enable_cors {
            return None;
        }

        let allow_origin = HeaderValue::from_str(config.cors_origin.trim());
        let allow_headers = HeaderValue::from_str(config.cors_headers.trim());
        match (allow_origin, allow_headers) {
            (Ok(allow_origin), Ok(allow_headers)) => Some(Self {
                allow_origin,
                allow_headers,
            }),
            _ => {
                warn!(
                    origin = %config.cors_origin,
                    headers = %config.cors_headers,
                    "Invalid CORS header value, CORS headers disabled"
                );
                None
            }
        }
    }

    /// Applies the headers to every response from `router`.
    pub fn apply(self, router: Router) -> Router {
        router
            .layer(SetResponseHeaderLayer::overriding(
                ACCESS_CONTROL_ALLOW_ORIGIN,
                self.allow_origin,
            ))
            .layer(SetResponseHeaderLayer::overriding(
                ACCESS_CONTROL_ALLOW_HEADERS,
                self.allow_headers,
            ))
    }
}
