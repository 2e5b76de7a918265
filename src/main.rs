use std::sync::Arc;

use anyhow::{Context, Result};
use memory_trainer_backend::{build_app, config::Config, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memory_trainer_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Memory Trainer backend server...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    let addr = config.server_addr();
    let users_file = config.storage.users_file.clone();

    // Load users
    let state = Arc::new(
        AppState::new(config)
            .with_context(|| format!("Failed to open user store {}", users_file))?,
    );
    tracing::info!("User store ready with {} users", state.users.user_count());

    let app = build_app(state.clone());

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("Game frontend: http://{}/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped, saving state");
    if let Err(e) = state.shutdown() {
        tracing::error!("Failed to save users on shutdown: {}", e);
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        // Without a signal handler there is no way to stop gracefully
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
