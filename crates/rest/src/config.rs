//! Server configuration for the FHIR bridge.
//!
//! Every setting can be given as a command line flag or an environment
//! variable. The store URL and API key have no defaults: startup fails when
//! either is absent.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `BRIDGE_SERVER_PORT` | 8080 | Server port |
//! | `BRIDGE_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `BRIDGE_LOG_LEVEL` | info | Log level |
//! | `BRIDGE_REQUEST_TIMEOUT` | 30 | Whole-request timeout (seconds) |
//! | `BRIDGE_UPSTREAM_TIMEOUT` | 10 | Store and identity call timeout (seconds) |
//! | `SUPABASE_URL` | *required* | Backing store base URL |
//! | `SUPABASE_ANON_KEY` | *required* | Backing store API key |
//! | `BRIDGE_ENABLE_CORS` | true | Emit CORS headers |
//! | `BRIDGE_CORS_ORIGIN` | * | `Access-Control-Allow-Origin` value |
//! | `BRIDGE_CORS_HEADERS` | authorization, x-client-info, apikey | `Access-Control-Allow-Headers` value |
//! | `BRIDGE_ACCESS_POLICY` | authenticated | `authenticated` or `patient-bound` |
//! | `BRIDGE_STATUS_POLICY` | uniform | `uniform` or `semantic` |
//! | `BRIDGE_OBSERVATION_ID` | patient | `patient` or `reading` |
//!
//! # Example
//!
//! ```rust
//! use fhirbridge_rest::ServerConfig;
//!
//! let config = ServerConfig {
//!     store_url: Some("https://abc.supabase.co".to_string()),
//!     store_anon_key: Some("anon-key".to_string()),
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use std::time::Duration;

use axum::http::HeaderValue;
use clap::{Parser, ValueEnum};

use crate::error::StatusPolicy;
use crate::mapper::ObservationIdSource;

/// Who may read which patient.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum AccessPolicy {
    /// Any authenticated caller may read any patient.
    #[default]
    Authenticated,
    /// A caller may only read the patient bound to their identity.
    PatientBound,
}

/// Server configuration.
///
/// Built from the command line and environment with [`ServerConfig::parse`],
/// or programmatically.
#[derive(Debug, Clone, Parser)]
#[command(name = "fhirbridge")]
#[command(about = "Serves patient and glucose records as FHIR resources")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "BRIDGE_SERVER_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "BRIDGE_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "BRIDGE_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Whole-request timeout in seconds.
    #[arg(long, env = "BRIDGE_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Timeout in seconds for each backing store or identity provider call.
    #[arg(long, env = "BRIDGE_UPSTREAM_TIMEOUT", default_value = "10")]
    pub upstream_timeout: u64,

    /// Backing store base URL.
    #[arg(long, env = "SUPABASE_URL")]
    pub store_url: Option<String>,

    /// Backing store API key.
    #[arg(long, env = "SUPABASE_ANON_KEY", hide_env_values = true)]
    pub store_anon_key: Option<String>,

    /// Emit CORS headers on every response.
    #[arg(long, env = "BRIDGE_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Value of `Access-Control-Allow-Origin`.
    #[arg(long, env = "BRIDGE_CORS_ORIGIN", default_value = "*")]
    pub cors_origin: String,

    /// Value of `Access-Control-Allow-Headers`.
    #[arg(
        long,
        env = "BRIDGE_CORS_HEADERS",
        default_value = "authorization, x-client-info, apikey"
    )]
    pub cors_headers: String,

    /// Authorization policy for patient reads.
    #[arg(long, env = "BRIDGE_ACCESS_POLICY", value_enum, default_value = "authenticated")]
    pub access_policy: AccessPolicy,

    /// How error kinds map to HTTP status codes.
    #[arg(long, env = "BRIDGE_STATUS_POLICY", value_enum, default_value = "uniform")]
    pub status_policy: StatusPolicy,

    /// Column used as the id of each glucose `Observation`.
    #[arg(long, env = "BRIDGE_OBSERVATION_ID", value_enum, default_value = "patient")]
    pub observation_id: ObservationIdSource,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            request_timeout: 30,
            upstream_timeout: 10,
            store_url: None,
            store_anon_key: None,
            enable_cors: true,
            cors_origin: "*".to_string(),
            cors_headers: "authorization, x-client-info, apikey".to_string(),
            access_policy: AccessPolicy::Authenticated,
            status_policy: StatusPolicy::Uniform,
            observation_id: ObservationIdSource::Patient,
        }
    }
}

impl ServerConfig {
    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Timeout applied to each store and identity call.
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout)
    }

    /// Timeout applied to a whole request.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Validates the configuration, returning every problem found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.upstream_timeout == 0 {
            errors.push("Upstream timeout cannot be 0".to_string());
        }

        match self.store_url.as_deref().map(str::trim) {
            None | Some("") => errors.push("Store URL is required (SUPABASE_URL)".to_string()),
            Some(raw) => match url::Url::parse(raw) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => {}
                Ok(url) => errors.push(format!("Store URL scheme not supported: {}", url.scheme())),
                Err(e) => errors.push(format!("Store URL is invalid: {}", e)),
            },
        }

        if self
            .store_anon_key
            .as_deref()
            .is_none_or(|key| key.trim().is_empty())
        {
            errors.push("Store API key is required (SUPABASE_ANON_KEY)".to_string());
        }

        if self.enable_cors {
            if HeaderValue::from_str(&self.cors_origin).is_err() {
                errors.push("CORS origin is not a valid header value".to_string());
            }
            if HeaderValue::from_str(&self.cors_headers).is_err() {
                errors.push("CORS headers is not a valid header value".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// Points at a local store with a dummy key; nothing is contacted unless a
    /// test wires in the HTTP backend itself.
    pub fn for_testing() -> Self {
        Self {
            port: 0,
            log_level: "debug".to_string(),
            request_timeout: 5,
            upstream_timeout: 2,
            store_url: Some("http://127.0.0.1:54321".to_string()),
            store_anon_key: Some("test-anon-key".to_string()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> ServerConfig {
        ServerConfig {
            store_url: Some("https://abc.supabase.co".to_string()),
            store_anon_key: Some("anon".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
        assert!(config.enable_cors);
        assert_eq!(config.cors_headers, "authorization, x-client-info, apikey");
        assert_eq!(config.access_policy, AccessPolicy::Authenticated);
        assert_eq!(config.status_policy, StatusPolicy::Uniform);
        assert_eq!(config.observation_id, ObservationIdSource::Patient);
    }

    #[test]
    fn test_default_has_no_store_credentials() {
        let errors = ServerConfig::default().validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("SUPABASE_URL")));
        assert!(errors.iter().any(|e| e.contains("SUPABASE_ANON_KEY")));
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            port: 3000,
            host: "0.0.0.0".to_string(),
            ..Default::default()
        };
        assert_eq!(config.socket_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_validate_valid() {
        assert!(configured().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_key_and_bad_url() {
        let config = ServerConfig {
            store_url: Some("ftp://files.example.com".to_string()),
            store_anon_key: Some("   ".to_string()),
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("scheme"));
    }

    #[test]
    fn test_validate_zero_timeouts() {
        let config = ServerConfig {
            request_timeout: 0,
            upstream_timeout: 0,
            ..configured()
        };
        assert_eq!(config.validate().unwrap_err().len(), 2);
    }

    #[test]
    fn test_validate_cors_header_values() {
        let config = ServerConfig {
            cors_origin: "bad\norigin".to_string(),
            ..configured()
        };
        assert!(config.validate().is_err());

        let config = ServerConfig {
            enable_cors: false,
            cors_origin: "bad\norigin".to_string(),
            ..configured()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_from_args() {
        let config = ServerConfig::try_parse_from([
            "fhirbridge",
            "--store-url",
            "https://abc.supabase.co",
            "--store-anon-key",
            "anon",
            "--access-policy",
            "patient-bound",
            "--status-policy",
            "semantic",
            "--observation-id",
            "reading",
        ])
        .unwrap();
        assert_eq!(config.access_policy, AccessPolicy::PatientBound);
        assert_eq!(config.status_policy, StatusPolicy::Semantic);
        assert_eq!(config.observation_id, ObservationIdSource::Reading);
        assert_eq!(config.store_url.as_deref(), Some("https://abc.supabase.co"));
    }

    #[test]
    fn test_for_testing() {
        let config = ServerConfig::for_testing();
        assert_eq!(config.port, 0);
        assert_eq!(config.upstream_timeout(), Duration::from_secs(2));
        assert!(config.store_url.is_some());
    }
}
