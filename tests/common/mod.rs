use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;

use memory_trainer_backend::config::Config;
use memory_trainer_backend::{build_app, AppState};

pub struct TestServer {
    pub addr: SocketAddr,
    pub state: Arc<AppState>,
    pub client: reqwest::Client,
    dir: TempDir,
    _shutdown: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Start a server with an empty user store in a fresh temp directory.
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.storage.users_file = dir.path().join("users.dat").display().to_string();
        config.server.static_dir = dir.path().display().to_string();

        let state = Arc::new(AppState::new(config).unwrap());
        let app = build_app(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            state,
            client: reqwest::Client::new(),
            dir,
            _shutdown: handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn users_file(&self) -> PathBuf {
        self.dir.path().join("users.dat")
    }

    /// POST /api/game and return the snapshot body.
    pub async fn create_game(&self, game_type: &str, difficulty: &str) -> Value {
        let resp = self
            .client
            .post(self.url(&format!(
                "/api/game?type={}&difficulty={}",
                game_type, difficulty
            )))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 201);
        resp.json().await.unwrap()
    }

    pub async fn post_json(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    pub async fn post_json_as(&self, path: &str, session: &str, body: Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .bearer_auth(session)
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    /// Register and log in, returning the session id.
    pub async fn login_new_user(&self, username: &str) -> String {
        let resp = self
            .post_json(
                "/api/auth/register",
                json!({
                    "username": username,
                    "email": format!("{}@example.com", username),
                    "password": "hunter2",
                }),
            )
            .await;
        assert_eq!(resp.status(), 201);

        let resp = self
            .post_json(
                "/api/auth/login",
                json!({ "username": username, "password": "hunter2" }),
            )
            .await;
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        body["sessionId"].as_str().unwrap().to_string()
    }
}

/// Card ids from a snapshot's `cards` array, grouped into matching pairs.
pub fn matching_pairs(cards: &Value) -> Vec<(u64, u64)> {
    let cards = cards.as_array().unwrap();
    let mut pending: Vec<(u64, u64)> = Vec::new();
    let mut pairs = Vec::new();
    for card in cards {
        let id = card["id"].as_u64().unwrap();
        let value = card["value"].as_u64().unwrap();
        match pending.iter().position(|(_, v)| *v == value) {
            Some(index) => {
                let (other, _) = pending.remove(index);
                pairs.push((other, id));
            }
            None => pending.push((id, value)),
        }
    }
    assert!(pending.is_empty(), "every value should appear in pairs");
    pairs
}
