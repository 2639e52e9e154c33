//! fulltrack-search - Music search aggregator service
//!
//! Queries Jamendo, SoundCloud, Audiomack and the Internet Archive in
//! parallel, keeps only streamable sources, and ranks them.

use anyhow::{Context, Result};
use clap::Parser;
use fulltrack_search::config::{Args, ServiceConfig};
use fulltrack_search::providers::{build_http_client, default_adapters};
use fulltrack_search::{build_router, Aggregator, AppState};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fulltrack_search=info,fulltrack_common=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting fulltrack-search v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let config = ServiceConfig::load(&args).context("Failed to load configuration")?;

    let client = build_http_client(config.providers.timeout)
        .context("Failed to initialize HTTP client")?;
    let aggregator = Aggregator::new(default_adapters(&config.providers, client));

    let configured = aggregator.configured_providers();
    for provider in aggregator.provider_names() {
        if configured.contains(&provider) {
            info!(provider = %provider, "Provider enabled");
        } else {
            warn!(provider = %provider, "Provider disabled (credential not configured)");
        }
    }
    info!(
        timeout_secs = config.providers.timeout.as_secs(),
        result_limit = config.providers.result_limit,
        "Provider settings"
    );

    let state = AppState::new(aggregator);
    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("fulltrack-search stopped");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => warn!("Failed to listen for shutdown signal: {}", e),
    }
}
