use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    /// Unique across the store
    pub username: String,
    /// Unique across the store
    pub email: String,
    /// Hex-encoded SHA-256 of the password. Unsalted, demo-grade only.
    pub password_hash: String,
    pub total_score: i64,
    pub games_played: u32,
    pub games_won: u32,
    pub created_at: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
}

/// Public view of a user, safe to hand to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub total_score: i64,
    pub games_played: u32,
    pub games_won: u32,
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user_id: String,
    pub username: String,
    pub total_score: i64,
    pub games_won: u32,
    pub win_rate: f64,
}

impl User {
    pub fn new(id: String, username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            username,
            email,
            password_hash,
            total_score: 0,
            games_played: 0,
            games_won: 0,
            created_at: now,
            last_login: now,
        }
    }

    /// Percentage of played games that were won, 0 when nothing was played yet
    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            (self.games_won as f64 / self.games_played as f64) * 100.0
        }
    }

    pub fn to_stats(&self) -> UserStats {
        UserStats {
            user_id: self.id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            total_score: self.total_score,
            games_played: self.games_played,
            games_won: self.games_won,
            win_rate: self.win_rate(),
        }
    }
}
