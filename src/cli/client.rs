use reqwest::{multipart, Method, RequestBuilder, StatusCode};
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::cli::config::ConfigStore;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid server URL '{0}'")]
    InvalidUrl(String),

    #[error("Not logged in. Run `staffdir auth login <username>` first.")]
    NotLoggedIn,

    #[error("{message}")]
    Unauthenticated { message: String },

    #[error("{message} (HTTP {status})")]
    Api {
        status: StatusCode,
        message: String,
        errors: Option<Value>,
    },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Thin HTTP client for the staffdir API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    token: Option<String>,
    // session cleared when the server rejects our token
    config: Option<ConfigStore>,
}

impl ApiClient {
    pub fn new(base: &str) -> Result<Self, ClientError> {
        let base = Url::parse(base).map_err(|_| ClientError::InvalidUrl(base.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(base.to_string()));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base,
            token: None,
            config: None,
        })
    }

    /// Attach a bearer token; a 401 on any later call removes the session stored in `config`
    pub fn with_token(mut self, token: impl Into<String>, config: ConfigStore) -> Self {
        self.token = Some(token.into());
        self.config = Some(config);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|_| ClientError::InvalidUrl(format!("{}{}", self.base, path)))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let mut builder = self
            .http
            .request(method, self.url(path)?)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ClientError> {
        let builder = self.request(Method::GET, path)?.query(query);
        self.send(builder).await
    }

    pub async fn send_json(&self, method: Method, path: &str, body: &Value) -> Result<Value, ClientError> {
        let builder = self.request(method, path)?.json(body);
        self.send(builder).await
    }

    pub async fn send_multipart(&self, path: &str, form: multipart::Form) -> Result<Value, ClientError> {
        let builder = self.request(Method::POST, path)?.multipart(form);
        self.send(builder).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ClientError> {
        let builder = self.request(Method::DELETE, path)?;
        self.send(builder).await
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Value, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let body: Value = serde_json::from_str(&text).unwrap_or(Value::Null);

        if status.is_success() {
            return Ok(body);
        }

        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());

        if status == StatusCode::UNAUTHORIZED && self.token.is_some() {
            if let Some(config) = &self.config {
                if let Err(e) = config.clear_session() {
                    tracing::warn!("Failed to clear stored session: {}", e);
                }
            }
            return Err(ClientError::Unauthenticated { message });
        }

        Err(ClientError::Api {
            status,
            message,
            errors: body.get("errors").cloned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_http_urls() {
        assert!(matches!(ApiClient::new("ftp://example.com"), Err(ClientError::InvalidUrl(_))));
        assert!(matches!(ApiClient::new("not a url"), Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn joins_paths_onto_base() {
        let client = ApiClient::new("http://127.0.0.1:8000").unwrap();
        assert_eq!(client.url("/employees").unwrap().as_str(), "http://127.0.0.1:8000/employees");
        assert_eq!(client.url("employees/abc").unwrap().as_str(), "http://127.0.0.1:8000/employees/abc");
    }
}
