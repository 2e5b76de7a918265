pub mod auth;
pub mod game;
pub mod health;
pub mod leaderboard;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes())
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/game", post(game::create_game))
        .route("/game/{id}", get(game::get_game).delete(game::delete_game))
        .route("/game/{id}/check", post(game::check_answer))
        .route("/game/{id}/flip", post(game::flip_card))
        .route("/game/{id}/check-pair", post(game::check_card_pair))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::get_current_user))
        .route("/leaderboard", get(leaderboard::get_leaderboard))
}
