use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::AppState;

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "memory-trainer-backend",
        "version": env!("CARGO_PKG_VERSION"),
        "activeGames": state.games.len(),
    }))
}
