use crate::{
    auth::{AuthenticatedUser, MaybeSession},
    error::AppError,
    models::UserStats,
    AppState,
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub success: bool,
    pub user_id: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    /// Token to send back as `Authorization: Bearer <sessionId>`
    pub session_id: String,
    pub username: String,
    pub total_score: i64,
    pub games_played: u32,
    pub games_won: u32,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub success: bool,
    pub user: UserStats,
}

/// Create an account
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let user_id = state
        .users
        .register_user(&payload.username, &payload.email, &payload.password)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            user_id,
            message: "User registered successfully".to_string(),
        }),
    ))
}

/// Check credentials and open a session
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let session_id = state
        .users
        .login_user(&payload.username, &payload.password)?;

    // The session can only vanish if a logout raced us
    let user = state.users.get_user_by_session(&session_id).ok_or_else(|| {
        tracing::error!("Session {} disappeared right after login", session_id);
        AppError::Internal("Failed to get user data".to_string())
    })?;

    Ok(Json(LoginResponse {
        success: true,
        session_id,
        username: user.username,
        total_score: user.total_score,
        games_played: user.games_played,
        games_won: user.games_won,
    }))
}

/// End the caller's session. Succeeds with `false` when there was none.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    MaybeSession(session): MaybeSession,
) -> Json<LogoutResponse> {
    let success = session
        .map(|s| state.users.logout_user(&s))
        .unwrap_or(false);
    Json(LogoutResponse { success })
}

/// Get current user's profile
pub async fn get_current_user(user: AuthenticatedUser) -> Json<UserResponse> {
    Json(UserResponse {
        success: true,
        user: user.user.to_stats(),
    })
}
