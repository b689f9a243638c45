#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use staffdir_api::config::{AppConfig, ImageStorage};
use staffdir_api::database::{seed, MemoryStore, Store};
use staffdir_api::services::{DiskImageStore, ImageStore, InlineImageStore};
use staffdir_api::state::AppState;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "pastibisa";

/// A seeded in-memory server running on an ephemeral port of this test's runtime
pub struct TestServer {
    pub base_url: String,
    pub state: AppState,
    pub http: reqwest::Client,
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security.bcrypt_cost = 4;
    config.api.enable_request_logging = false;
    config
}

/// Spawn with inline image storage
pub async fn spawn_server() -> Result<TestServer> {
    spawn_with(test_config()).await
}

/// Spawn with files written below `dir` and served from /storage
pub async fn spawn_with_disk_images(dir: &std::path::Path) -> Result<TestServer> {
    let mut config = test_config();
    config.images.storage = ImageStorage::Disk;
    config.images.directory = dir.to_path_buf();
    spawn_with(config).await
}

pub async fn spawn_with(config: AppConfig) -> Result<TestServer> {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    seed::seed(store.as_ref(), config.security.bcrypt_cost)
        .await
        .context("failed to seed memory store")?;

    let images: Arc<dyn ImageStore> = match config.images.storage {
        ImageStorage::Inline => Arc::new(InlineImageStore),
        ImageStorage::Disk => Arc::new(DiskImageStore::new(config.images.directory.clone())),
    };
    let state = AppState::new(config, store, images);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind ephemeral port")?;
    let addr = listener.local_addr()?;
    tokio::spawn(staffdir_api::serve(listener, state.clone()));

    Ok(TestServer {
        base_url: format!("http://{}", addr),
        state,
        http: reqwest::Client::new(),
    })
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST /login and return the raw status and body
    pub async fn try_login(&self, username: &str, password: &str) -> Result<(StatusCode, Value)> {
        let res = self
            .http
            .post(self.url("/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?;
        let status = res.status();
        Ok((status, res.json().await?))
    }

    /// Log in as the seeded admin and return the bearer token
    pub async fn login(&self) -> Result<String> {
        let (status, body) = self.try_login(ADMIN_USERNAME, ADMIN_PASSWORD).await?;
        anyhow::ensure!(status == StatusCode::OK, "login failed: {} {}", status, body);
        body["data"]["token"]
            .as_str()
            .map(str::to_string)
            .context("login response has no token")
    }

    pub async fn get(&self, path: &str, token: &str) -> Result<(StatusCode, Value)> {
        let res = self.http.get(self.url(path)).bearer_auth(token).send().await?;
        let status = res.status();
        Ok((status, res.json().await?))
    }

    /// First division id, as listed by the API
    pub async fn division_id(&self, token: &str, name: &str) -> Result<String> {
        let body: Value = self
            .http
            .get(self.url("/divisions"))
            .query(&[("name", name)])
            .bearer_auth(token)
            .send()
            .await?
            .json()
            .await?;
        body["data"]["divisions"][0]["id"]
            .as_str()
            .map(str::to_string)
            .with_context(|| format!("division '{}' not found: {}", name, body))
    }
}

/// Smallest well-formed PNG header; enough for magic-byte sniffing
pub fn png_bytes() -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&[0u8; 24]);
    bytes
}
