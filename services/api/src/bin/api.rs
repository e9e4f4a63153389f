//! services/api/src/bin/api.rs

use api_lib::{
    adapters::DeepgramAdapter,
    config::Config,
    error::ApiError,
    web::{build_router, state::load_index_template, AppState},
};
use std::sync::Arc;
use text_intelligence_core::SystemClock;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize the Provider Adapter ---
    let analyzer = Arc::new(DeepgramAdapter::new(
        config.deepgram_api_key.clone(),
        &config.deepgram_api_url,
        config.deepgram_timeout,
    )?);

    // --- 3. Build the Shared AppState ---
    let index_template = load_index_template(&config.frontend_dist);
    let app_state = Arc::new(AppState::new(
        config.clone(),
        analyzer,
        Arc::new(SystemClock),
        index_template,
    ));

    // --- 4. Create the Web Router ---
    let app = build_router(app_state);

    // --- 5. Start the Server ---
    let bind_address = config.bind_address();
    let nonce_status = if config.requires_nonce() { " (nonce required)" } else { "" };
    info!("Text Intelligence server running at http://{}", bind_address);
    info!("Available routes:");
    info!("  GET  /api/session{}", nonce_status);
    info!("  POST /api/text-intelligence (auth required)");
    info!("  GET  /api/metadata");
    info!("  GET  /health");
    info!("  GET  /docs (OpenAPI documentation)");

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
