// handlers/query.rs - lenient query-string extractor for the list endpoints
//
// Repeated keys keep the last value and undecodable bytes are replaced, so a
// query string never turns into a framework-level 400.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::collections::HashMap;

use crate::error::ApiError;

#[derive(Debug, Clone, Default)]
pub struct QueryParams(HashMap<String, String>);

impl QueryParams {
    pub fn parse(query: &str) -> Self {
        Self(url::form_urlencoded::parse(query.as_bytes()).into_owned().collect())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for QueryParams
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::parse(parts.uri.query().unwrap_or_default()))
    }
}
