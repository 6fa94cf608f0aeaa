//! sqlbox-gateway server entry point.
//!
//! Starts the Axum HTTP server for the SQL sandbox: opens the durable
//! metadata store, seeds the in-memory sample dataset, and serves the
//! REST API.

use std::sync::Arc;
use std::time::Duration;

use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use sqlbox_gateway::api;
use sqlbox_gateway::app_state::AppState;
use sqlbox_gateway::config::GatewayConfig;
use sqlbox_gateway::persistence::{MetadataStore, SandboxDataset};
use sqlbox_gateway::service::{PlaygroundService, QueryService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = GatewayConfig::from_env().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    tracing::info!(addr = %config.listen_addr, "starting sqlbox-gateway");

    // Build persistence layer: durable metadata store + ephemeral sandbox.
    let store = MetadataStore::connect(
        &config.database_url,
        config.database_max_connections,
        Duration::from_secs(config.database_connect_timeout_secs),
    )
    .await?;
    let sandbox = SandboxDataset::create().await?;
    tracing::info!(database_url = %config.database_url, "metadata store ready, sandbox seeded");

    // Build service layer
    let playgrounds = Arc::new(PlaygroundService::new(store.clone()));
    let queries = Arc::new(QueryService::new(store, sandbox));

    // Build application state
    let app_state = AppState {
        playgrounds,
        queries,
    };

    // Build router
    let app = api::build_router()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
