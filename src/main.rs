mod api;
mod config;
mod ratings;

use crate::api::AppState;
use crate::config::AppConfig;
use crate::ratings::RatingsClient;
use anyhow::Context;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("reviews_service=info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .compact(),
        )
        .init();

    info!("🚀 Starting Reviews Service");

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;
    info!("📋 Configuration loaded");
    info!("   - Ratings Enabled: {}", config.ratings.enabled);
    info!("   - Ratings Service: {}", config.ratings.base_url());
    info!("   - Star Color: {}", config.ratings.star_color);
    info!("   - Ratings Timeout: {:?}", config.ratings.timeout());

    // Initialize ratings client
    let client = reqwest::Client::builder()
        .build()
        .context("Failed to build http client")?;
    let ratings_client = RatingsClient::from_config(&config.ratings, client).map(Arc::new);
    if ratings_client.is_none() {
        info!("⚠️  Ratings disabled, reviews will be served without stars");
    }

    // Create application state
    let state = AppState {
        ratings_client,
        star_color: config.ratings.star_color.as_str().into(),
    };

    let app = api::router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📡 Available endpoints:");
    info!("   GET  /                       - Status");
    info!("   GET  /health                 - Health check");
    info!("   GET  /reviews/{{product_id}}   - Reviews for a product");
    info!("");
    info!("✨ Server is ready to accept requests!");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server terminated unexpectedly")?;

    info!("👋 Server shutting down gracefully");

    Ok(())
}

/// Graceful shutdown handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("🛑 Shutdown signal received");
}
