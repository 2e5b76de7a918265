pub mod auth;
pub mod config;
pub mod error;
pub mod game;
pub mod models;
pub mod routes;
pub mod services;
pub mod storage;

use std::sync::Arc;

use axum::Router;
use config::Config;
use services::{MemoryService, UserService};
use storage::StorageError;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

/// Application state shared across all handlers
pub struct AppState {
    pub config: Config,
    /// Live games
    pub games: MemoryService,
    /// Accounts, sessions and the leaderboard
    pub users: UserService,
}

impl AppState {
    /// Open the user store named in the config. The game registry starts empty.
    pub fn new(config: Config) -> Result<Self, StorageError> {
        let users = UserService::open(&config.storage.users_file)?;
        Ok(Self {
            config,
            games: MemoryService::new(),
            users,
        })
    }

    /// Drop all games and flush users to disk
    pub fn shutdown(&self) -> Result<(), StorageError> {
        let dropped = self.games.cleanup();
        tracing::info!("Dropped {} live games", dropped);
        self.users.save()
    }
}

/// Build the router: API routes, then static files for everything else
pub fn build_app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_files = ServeDir::new(&state.config.server.static_dir);

    Router::new()
        .merge(routes::create_routes())
        .fallback_service(static_files)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
