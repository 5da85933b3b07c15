//! Discord media upload relay.
//!
//! Runs two halves off one process: a Discord bot serving the slash command
//! surface, and an axum HTTP server receiving browser uploads from the
//! uploader page. Uploaded files are forwarded into a staging channel to
//! obtain CDN URLs and the formatted listing is posted to a result channel.
//!
//! # Architecture
//!
//! - **Controller Layer** (`controller/`) - HTTP request handlers and
//!   multipart parsing
//! - **Service Layer** (`service/`) - Relay pipeline, listing formatter,
//!   playlist importer, workspace lifecycle
//! - **Bot** (`bot/`) - Slash command registration and dispatch
//! - **Model Layer** (`model/`) - Domain models and API DTOs
//! - **Error Layer** (`error/`) - Application error types and HTTP response
//!   mapping

mod bot;
mod config;
mod controller;
mod error;
mod model;
mod router;
mod service;
mod startup;
mod state;
mod util;

use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Arc::new(Config::from_env()?);

    let http_client = startup::setup_http_client()?;
    let discord_http = startup::setup_discord_http(&config);

    let state = AppState::new(config.clone(), http_client, discord_http);

    // Start the Discord bot in a separate task; keep the shard manager for
    // shutdown.
    let bot_client = bot::start::init_bot(state.clone()).await?;
    let shard_manager = bot_client.shard_manager.clone();
    tokio::spawn(async move {
        if let Err(e) = bot::start::start_bot(bot_client).await {
            tracing::error!("Discord bot error: {}", e);
        }
    });

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!("Server running on port {}", config.port);

    axum::serve(listener, router::router(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // HTTP is down; disconnect the gateway and destroy any workspaces a
    // cancelled request left behind.
    shard_manager.shutdown_all().await;
    state.workspaces.sweep_all().await;

    tracing::info!("Shutdown complete");

    Ok(())
}

/// Waits for a shutdown signal (SIGTERM or Ctrl+C).
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
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        },
    }
}
