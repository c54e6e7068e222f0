//! Shared helpers for end-to-end tests
//!
//! Boots the whole service in-process on an ephemeral port and talks to
//! it over real HTTP, so the tests cover the listener, middleware and
//! router exactly as deployed.

use reqwest::Client;
use sendgate_rs::api::auth::JwtConfig;
use sendgate_rs::api::ApiServer;
use sendgate_rs::config::Config;
use sendgate_rs::limiter::SendLimiter;
use sendgate_rs::settings::SettingsManager;
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;

pub struct TestEnv {
    pub base_url: String,
    client: Client,
    jwt: JwtConfig,
}

impl TestEnv {
    /// Start the service with a fresh in-memory database and a small
    /// quota (5 sends per 24h) so exhaustion is cheap to reach.
    pub async fn spawn() -> Self {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("failed to open in-memory database");

        let mut config = Config::default();
        config.auth.jwt_secret = "e2e-secret".to_string();
        config.quota.send_limit = 5;

        SettingsManager::new(pool.clone())
            .init_db()
            .await
            .expect("settings init_db failed");
        SendLimiter::new(pool.clone(), &config.quota)
            .init_db()
            .await
            .expect("limiter init_db failed");

        let server = ApiServer::new(pool, &config);
        let router = server.router();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test listener");
        let addr = listener.local_addr().expect("no local addr");

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("server exited");
        });

        Self {
            base_url: format!("http://{}", addr),
            client: Client::new(),
            jwt: JwtConfig::new("e2e-secret".to_string(), 1),
        }
    }

    pub fn token(&self, user_id: &str) -> String {
        self.jwt.create_token(user_id, false).expect("token")
    }

    pub fn admin_token(&self, user_id: &str) -> String {
        self.jwt.create_token(user_id, true).expect("token")
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (u16, Value) {
        let mut req = self.client.get(format!("{}{}", self.base_url, path));
        if let Some(t) = token {
            req = req.bearer_auth(t);
        }
        let resp = req.send().await.expect("request failed");
        let status = resp.status().as_u16();
        let body = resp.json().await.unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn get_text(&self, path: &str) -> (u16, String) {
        let resp = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("request failed");
        let status = resp.status().as_u16();
        let body = resp.text().await.expect("body read failed");
        (status, body)
    }

    pub async fn post(&self, path: &str, token: &str) -> (u16, Value) {
        let resp = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
            .send()
            .await
            .expect("request failed");
        let status = resp.status().as_u16();
        let body = resp.json().await.unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn patch(&self, path: &str, token: &str, body: Value) -> (u16, Value) {
        let resp = self
            .client
            .patch(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .expect("request failed");
        let status = resp.status().as_u16();
        let body = resp.json().await.unwrap_or(Value::Null);
        (status, body)
    }
}
