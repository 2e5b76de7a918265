use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub game: GameConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory served for every non-API path
    pub static_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub users_file: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    pub leaderboard_default_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                static_dir: "web".to_string(),
            },
            storage: StorageConfig {
                users_file: "users.dat".to_string(),
            },
            game: GameConfig {
                leaderboard_default_limit: 10,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Config::default();

        let server = ServerConfig {
            host: env::var("HOST").unwrap_or(defaults.server.host),
            port: match env::var("PORT") {
                Ok(port) => port.parse().context("PORT must be a number")?,
                Err(_) => defaults.server.port,
            },
            static_dir: env::var("STATIC_DIR").unwrap_or(defaults.server.static_dir),
        };

        let storage = StorageConfig {
            users_file: env::var("USERS_FILE").unwrap_or(defaults.storage.users_file),
        };

        let game = GameConfig {
            leaderboard_default_limit: env::var("LEADERBOARD_DEFAULT_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.game.leaderboard_default_limit),
        };

        Ok(Config {
            server,
            storage,
            game,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.storage.users_file, "users.dat");
        assert_eq!(config.game.leaderboard_default_limit, 10);
    }
}
