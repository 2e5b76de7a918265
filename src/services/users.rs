use std::{collections::HashMap, path::Path, sync::Mutex};

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    auth::{hash_password, verify_password},
    models::{LeaderboardEntry, User},
    services::lock,
    storage::{StorageError, UserFile},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserError {
    #[error("Username already exists")]
    DuplicateUsername,
    #[error("Email already exists")]
    DuplicateEmail,
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("{0}")]
    InvalidInput(&'static str),
    #[error("User {0} not found")]
    UnknownUser(String),
}

#[derive(Default)]
struct UserStore {
    users: HashMap<String, User>,
    /// session token -> user id, memory only
    sessions: HashMap<String, String>,
}

impl UserStore {
    fn find_by_username(&self, username: &str) -> Option<&User> {
        self.users.values().find(|u| u.username == username)
    }
}

/// Accounts, sessions and the leaderboard.
///
/// Every operation runs under one store-wide lock. Mutations rewrite the
/// user file before the lock is released; a failed write is logged and the
/// in-memory change stands.
pub struct UserService {
    store: Mutex<UserStore>,
    file: UserFile,
}

impl UserService {
    /// Open the store backed by `path`, loading any existing users
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let file = UserFile::new(path);
        let users = file
            .load()?
            .into_iter()
            .map(|u| (u.id.clone(), u))
            .collect();

        Ok(Self {
            store: Mutex::new(UserStore {
                users,
                sessions: HashMap::new(),
            }),
            file,
        })
    }

    pub fn register_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<String, UserError> {
        let username = username.trim();
        let email = email.trim();
        validate_registration(username, email, password)?;

        let mut store = lock(&self.store);

        for user in store.users.values() {
            if user.username == username {
                return Err(UserError::DuplicateUsername);
            }
            if user.email == email {
                return Err(UserError::DuplicateEmail);
            }
        }

        let user_id = generate_id();
        let user = User::new(
            user_id.clone(),
            username.to_string(),
            email.to_string(),
            hash_password(password),
        );
        store.users.insert(user_id.clone(), user);
        self.persist(&store);

        tracing::info!("Registered user {} ({})", username, user_id);
        Ok(user_id)
    }

    /// Check credentials and open a session, returning its token
    pub fn login_user(&self, username: &str, password: &str) -> Result<String, UserError> {
        let mut store = lock(&self.store);

        let user_id = match store.find_by_username(username.trim()) {
            Some(user) if verify_password(password, &user.password_hash) => user.id.clone(),
            _ => {
                tracing::warn!("Rejected login for {}", username);
                return Err(UserError::InvalidCredentials);
            }
        };

        let session_id = generate_id();
        store.sessions.insert(session_id.clone(), user_id.clone());
        if let Some(user) = store.users.get_mut(&user_id) {
            user.last_login = Utc::now();
        }
        self.persist(&store);

        tracing::info!("User {} logged in", user_id);
        Ok(session_id)
    }

    /// End a session. Returns whether it existed.
    pub fn logout_user(&self, session_id: &str) -> bool {
        let removed = lock(&self.store).sessions.remove(session_id);
        if let Some(user_id) = &removed {
            tracing::info!("User {} logged out", user_id);
        }
        removed.is_some()
    }

    pub fn get_user_by_id(&self, user_id: &str) -> Option<User> {
        lock(&self.store).users.get(user_id).cloned()
    }

    pub fn get_user_by_session(&self, session_id: &str) -> Option<User> {
        let store = lock(&self.store);
        let user_id = store.sessions.get(session_id)?;
        store.users.get(user_id).cloned()
    }

    pub fn get_user_by_username(&self, username: &str) -> Option<User> {
        lock(&self.store).find_by_username(username).cloned()
    }

    /// Record a finished game for the user
    pub fn update_user_stats(&self, user_id: &str, score: u32, won: bool) -> Result<(), UserError> {
        let mut store = lock(&self.store);

        let user = store
            .users
            .get_mut(user_id)
            .ok_or_else(|| UserError::UnknownUser(user_id.to_string()))?;
        user.total_score += i64::from(score);
        user.games_played += 1;
        if won {
            user.games_won += 1;
        }
        self.persist(&store);

        Ok(())
    }

    /// Users ranked by total score, highest first; equal scores are ordered
    /// by username. Ranks are assigned over the full ranking before the list
    /// is cut to `limit`.
    pub fn get_leaderboard(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = {
            let store = lock(&self.store);
            store
                .users
                .values()
                .map(|user| LeaderboardEntry {
                    rank: 0,
                    user_id: user.id.clone(),
                    username: user.username.clone(),
                    total_score: user.total_score,
                    games_won: user.games_won,
                    win_rate: user.win_rate(),
                })
                .collect()
        };

        entries.sort_by(|a, b| {
            b.total_score
                .cmp(&a.total_score)
                .then_with(|| a.username.cmp(&b.username))
        });
        for (index, entry) in entries.iter_mut().enumerate() {
            entry.rank = index + 1;
        }
        entries.truncate(limit);
        entries
    }

    /// Write the current users to disk
    pub fn save(&self) -> Result<(), StorageError> {
        let store = lock(&self.store);
        self.file.save(store.users.values())
    }

    pub fn user_count(&self) -> usize {
        lock(&self.store).users.len()
    }

    pub fn session_count(&self) -> usize {
        lock(&self.store).sessions.len()
    }

    fn persist(&self, store: &UserStore) {
        if let Err(e) = self.file.save(store.users.values()) {
            tracing::warn!(
                "Failed to persist users to {}: {}",
                self.file.path().display(),
                e
            );
        }
    }
}

fn validate_registration(username: &str, email: &str, password: &str) -> Result<(), UserError> {
    if username.is_empty() {
        return Err(UserError::InvalidInput("username is required"));
    }
    if email.is_empty() {
        return Err(UserError::InvalidInput("email is required"));
    }
    if password.trim().is_empty() {
        return Err(UserError::InvalidInput("password is required"));
    }
    // Records are line oriented
    if username.contains(['\n', '\r']) || email.contains(['\n', '\r']) {
        return Err(UserError::InvalidInput(
            "username and email must be a single line",
        ));
    }
    Ok(())
}

fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}
