// Unit-test helpers: in-memory application state and one-shot router requests
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use crate::config::AppConfig;
use crate::database::{seed, MemoryStore, Store};
use crate::services::{InlineImageStore, LoginInput};
use crate::state::AppState;

/// Development config tuned for tests: cheap bcrypt, no request tracing
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security.bcrypt_cost = 4;
    config.api.enable_request_logging = false;
    config
}

/// Memory-backed state with the demo data loaded
pub async fn seeded_state() -> AppState {
    let config = test_config();
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    seed::seed(store.as_ref(), config.security.bcrypt_cost)
        .await
        .expect("seed memory store");
    AppState::new(config, store, Arc::new(InlineImageStore))
}

/// Log in as the seeded admin and return the bearer token
pub async fn login(state: &AppState) -> String {
    state
        .auth
        .login(LoginInput {
            username: Some(seed::ADMIN_USERNAME.to_string()),
            password: Some(seed::ADMIN_PASSWORD.to_string()),
        })
        .await
        .expect("seeded admin can log in")
        .token
}

/// Small request builder for driving the router without a socket
pub struct TestRequest {
    builder: axum::http::request::Builder,
    body: Body,
}

impl TestRequest {
    pub fn get(uri: &str) -> Self {
        Self {
            builder: Request::builder().method("GET").uri(uri),
            body: Body::empty(),
        }
    }

    pub fn post_json(uri: &str, json: &'static str) -> Self {
        Self {
            builder: Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json"),
            body: Body::from(json),
        }
    }

    pub fn post_form(uri: &str, form: &'static str) -> Self {
        Self {
            builder: Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded"),
            body: Body::from(form),
        }
    }

    pub fn bearer(mut self, token: &str) -> Self {
        self.builder = self
            .builder
            .header(header::AUTHORIZATION, format!("Bearer {}", token));
        self
    }

    /// Send through `router` and return the status plus the JSON body (`Null` when empty)
    pub async fn send(self, router: Router) -> (StatusCode, Value) {
        let request = self.builder.body(self.body).expect("valid test request");
        let response = router.oneshot(request).await.expect("router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read response body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }
}
