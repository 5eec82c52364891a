//! FHIR bridge server.
//!
//! Serves patient demographics and glucose readings from a Supabase project
//! as FHIR resources.

use clap::Parser;
use fhirbridge_rest::{ServerConfig, create_app_with_config, init_logging};
use fhirbridge_store::backends::postgrest::{PostgrestBackend, PostgrestConfig};
use tracing::info;

/// Creates the HTTP backend from the server configuration.
///
/// The same client answers both data queries and identity lookups.
fn create_backend(config: &ServerConfig) -> anyhow::Result<PostgrestBackend> {
    let base_url = config
        .store_url
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("SUPABASE_URL is not set"))?;
    let anon_key = config
        .store_anon_key
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("SUPABASE_ANON_KEY is not set"))?;

    info!(store = %base_url, "Initializing PostgREST backend");

    let backend_config =
        PostgrestConfig::new(base_url, anon_key).with_timeout(config.upstream_timeout());
    Ok(PostgrestBackend::new(backend_config)?)
}

/// Starts the Axum HTTP server.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        port = config.port,
        host = %config.host,
        access_policy = ?config.access_policy,
        status_policy = ?config.status_policy,
        "Starting FHIR bridge"
    );

    let backend = create_backend(&config)?;
    let app = create_app_with_config(backend.clone(), backend, config.clone());
    serve(app, &config).await
}
