use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::types::PaginationMeta;

/// Wrapper for API responses that adds the `{status: "success", message, ...}` envelope
#[derive(Debug)]
pub struct ApiResponse<T: Serialize = ()> {
    pub message: String,
    pub data: Option<T>,
    pub pagination: Option<PaginationMeta>,
    pub status_code: Option<StatusCode>,
}

impl ApiResponse<()> {
    /// Message-only envelope
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
            pagination: None,
            status_code: None,
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            pagination: None,
            status_code: None,
        }
    }

    /// List payload plus its pagination block
    pub fn paginated(message: impl Into<String>, data: T, pagination: PaginationMeta) -> Self {
        Self {
            pagination: Some(pagination),
            ..Self::success(message, data)
        }
    }

    pub fn with_status(mut self, status_code: StatusCode) -> Self {
        self.status_code = Some(status_code);
        self
    }

    /// Create a 201 Created response
    pub fn created(self) -> Self {
        self.with_status(StatusCode::CREATED)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        let mut envelope = json!({
            "status": "success",
            "message": self.message,
        });

        if let Some(data) = &self.data {
            match serde_json::to_value(data) {
                Ok(value) => envelope["data"] = value,
                Err(e) => {
                    tracing::error!("Failed to serialize response data: {}", e);
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({
                            "status": "error",
                            "message": "Failed to serialize response data"
                        })),
                    )
                        .into_response();
                }
            }
        }

        if let Some(pagination) = &self.pagination {
            envelope["pagination"] = json!(pagination);
        }

        (status, Json(envelope)).into_response()
    }
}

// Convenience type alias
pub type ApiResult<T = ()> = Result<ApiResponse<T>, crate::error::ApiError>;
