// handlers/form.rs - body extractor shared by the form-style endpoints
//
// Accepts multipart/form-data, application/x-www-form-urlencoded and JSON
// bodies and flattens them into one field map. Text values are trimmed.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::header,
};
use serde_json::Value;
use std::collections::HashMap;

use crate::error::ApiError;
use crate::services::ImageInput;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    File(Vec<u8>),
}

#[derive(Debug, Clone, Default)]
pub struct FormData {
    fields: HashMap<String, FormValue>,
}

impl FormData {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut form = Self::default();
        for (name, value) in pairs {
            form.insert_text(name.into(), value.as_ref());
        }
        form
    }

    fn insert_text(&mut self, name: String, value: &str) {
        self.fields.insert(name, FormValue::Text(value.trim().to_string()));
    }

    pub fn has(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Text value of `name`; a file part in that slot reads as absent
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.fields.get(name)? {
            FormValue::Text(value) => Some(value),
            FormValue::File(_) => None,
        }
    }

    pub fn take_text(&mut self, name: &str) -> Option<String> {
        match self.fields.remove(name)? {
            FormValue::Text(value) => Some(value),
            // a file where text is expected is treated as a blank value
            FormValue::File(_) => Some(String::new()),
        }
    }

    pub fn take_image(&mut self, name: &str) -> Option<ImageInput> {
        match self.fields.remove(name)? {
            FormValue::File(bytes) => Some(ImageInput::File(bytes)),
            FormValue::Text(text) => Some(ImageInput::Text(text)),
        }
    }

    async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(body_error)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if field.file_name().is_some() {
                let bytes = field.bytes().await.map_err(body_error)?;
                form.fields.insert(name, FormValue::File(bytes.to_vec()));
            } else {
                let text = field.text().await.map_err(body_error)?;
                form.insert_text(name, &text);
            }
        }

        Ok(form)
    }

    fn from_json(bytes: &[u8]) -> Result<Self, ApiError> {
        let value: Value = serde_json::from_slice(bytes).map_err(body_error)?;
        let Value::Object(map) = value else {
            return Err(ApiError::field("body", "The request body must be a JSON object."));
        };

        let mut form = Self::default();
        for (name, value) in map {
            let text = match value {
                Value::String(s) => s,
                Value::Null => String::new(),
                other => other.to_string(),
            };
            form.insert_text(name, &text);
        }
        Ok(form)
    }

    fn from_urlencoded(bytes: &[u8]) -> Self {
        Self::from_pairs(url::form_urlencoded::parse(bytes).into_owned())
    }
}

fn body_error(err: impl std::fmt::Display) -> ApiError {
    ApiError::field("body", format!("The request body could not be parsed: {}", err))
}

#[async_trait]
impl<S> FromRequest<S> for FormData
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state).await.map_err(body_error)?;
            return Self::from_multipart(multipart).await;
        }

        let bytes = Bytes::from_request(req, state).await.map_err(body_error)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        if content_type.starts_with("application/json") || content_type.contains("+json") {
            Self::from_json(&bytes)
        } else {
            Ok(Self::from_urlencoded(&bytes))
        }
    }
}
