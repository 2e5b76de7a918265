use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use sha2::{Digest, Sha256};
use std::{convert::Infallible, sync::Arc};

use crate::{error::AppError, models::User, AppState};

/// Header carrying the session token when `Authorization` is not used
pub const SESSION_HEADER: &str = "x-session-id";
/// Query parameter carrying the session token
pub const SESSION_QUERY_PARAM: &str = "sessionId";

/// Session token supplied by the client, if any. Never rejects.
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<String>);

/// A valid session resolved to its user
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub session_id: String,
    pub user: User,
}

impl<S> FromRequestParts<S> for MaybeSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeSession(session_token(parts)))
    }
}

/// Extractor for logged-in users from the session token
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = Arc::<AppState>::from_ref(state);

        let session_id = session_token(parts)
            .ok_or_else(|| AppError::Unauthorized("Missing session".to_string()))?;

        let user = app_state
            .users
            .get_user_by_session(&session_id)
            .ok_or_else(|| AppError::Unauthorized("User not found or session expired".to_string()))?;

        Ok(AuthenticatedUser { session_id, user })
    }
}

/// Find the session token: `Authorization: Bearer`, then the session header,
/// then the query string
fn session_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .or_else(|| {
            parts
                .headers
                .get(SESSION_HEADER)
                .and_then(|h| h.to_str().ok())
        })
        .map(|s| s.trim().to_string())
        .or_else(|| {
            parts
                .uri
                .query()
                .and_then(|q| serde_urlencoded::from_str::<Vec<(String, String)>>(q).ok())
                .and_then(|params| {
                    params
                        .into_iter()
                        .find(|(k, _)| k == SESSION_QUERY_PARAM)
                        .map(|(_, v)| v)
                })
        })
        .filter(|token| !token.is_empty())
}

/// Hex-encoded SHA-256 of the password.
///
/// Single round, no salt: acceptable for a toy deployment only. Anything
/// real needs a salted, memory-hard scheme.
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    hash_password(password) == hash
}
