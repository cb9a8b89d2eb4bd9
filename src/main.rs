//! Flight aggregator server.
//!
//! Loads configuration, builds one client per configured provider and
//! serves the REST API.

use anyhow::Context;
use clap::Parser;
use flight_aggregator::api::rest::{create_router, AppState};
use flight_aggregator::application::services::AggregationEngine;
use flight_aggregator::infrastructure::config::AppConfig;
use flight_aggregator::infrastructure::logging::init_tracing;
use flight_aggregator::infrastructure::providers::ProviderRegistry;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(name = "flight-aggregator", version, about)]
struct Cli {
    /// Configuration file; defaults to `config/default.toml` when present.
    #[arg(short, long, env = "FLIGHTS_CONFIG")]
    config: Option<PathBuf>,

    /// Overrides `server.port`.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    init_tracing(&config.logging)?;
    config.validate()?;

    let registry = ProviderRegistry::from_config(&config).context("building provider clients")?;
    if registry.is_empty() {
        tracing::warn!("no providers configured; searches will return 503");
    }

    let engine = AggregationEngine::new(registry, config.aggregation.engine_config());
    let router = create_router(Arc::new(AppState::new(Arc::new(engine))));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.server.host, config.server.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    tracing::info!(%addr, "flight aggregator listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("flight aggregator stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
