// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::validation::FieldErrors;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 401 Unauthorized - wrong username or password on /login
    InvalidCredentials(String),

    // 401 Unauthorized - missing, unknown or revoked bearer token
    Unauthenticated(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 405 Method Not Allowed (unsupported `_method` override)
    MethodNotAllowed(String),

    // 422 Unprocessable Entity
    Validation {
        message: String,
        errors: FieldErrors,
    },

    // 500 Internal Server Error - detail is only shown outside production
    Internal(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidCredentials(_) => StatusCode::UNAUTHORIZED,
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get the raw error message (may contain internal detail for `Internal`)
    pub fn message(&self) -> &str {
        match self {
            ApiError::InvalidCredentials(msg) => msg,
            ApiError::Unauthenticated(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::MethodNotAllowed(msg) => msg,
            ApiError::Validation { message, .. } => message,
            ApiError::Internal(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Message safe to show the client given the deployment environment
    pub fn public_message(&self, production: bool) -> &str {
        match self {
            ApiError::Internal(_) if production => "Internal Server Error",
            _ => self.message(),
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self, production: bool) -> Value {
        let mut body = json!({
            "status": "error",
            "message": self.public_message(production),
        });

        if let ApiError::Validation { errors, .. } = self {
            body["errors"] = json!(errors);
        }

        body
    }
}

// Static constructor methods
impl ApiError {
    pub fn invalid_credentials() -> Self {
        ApiError::InvalidCredentials("Invalid username or password".to_string())
    }

    pub fn unauthenticated() -> Self {
        ApiError::Unauthenticated("Unauthenticated. Please log in first.".to_string())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        ApiError::MethodNotAllowed(message.into())
    }

    pub fn validation(errors: FieldErrors) -> Self {
        ApiError::Validation {
            message: errors.summary(),
            errors,
        }
    }

    /// Single-field validation failure
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(field, message);
        Self::validation(errors)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

// Convert other error types to ApiError
impl From<crate::database::DatabaseError> for ApiError {
    fn from(err: crate::database::DatabaseError) -> Self {
        use crate::database::DatabaseError;

        match err {
            DatabaseError::NotFound(msg) => ApiError::not_found(msg),
            DatabaseError::Duplicate { field, .. } => {
                ApiError::field(&field, format!("The {} has already been taken.", field))
            }
            DatabaseError::ConfigMissing(name) => {
                tracing::error!("Missing database configuration: {}", name);
                ApiError::service_unavailable("Database is not configured")
            }
            DatabaseError::Sqlx(sqlx_err) => {
                // Log the real error but return generic message
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::internal(format!("Database error: {}", sqlx_err))
            }
            DatabaseError::Migration(migrate_err) => {
                tracing::error!("Migration error: {}", migrate_err);
                ApiError::service_unavailable("Service is being updated, please try again later")
            }
        }
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(err: bcrypt::BcryptError) -> Self {
        tracing::error!("Password hashing error: {}", err);
        ApiError::internal(format!("Password hashing failed: {}", err))
    }
}

impl From<crate::services::images::ImageError> for ApiError {
    fn from(err: crate::services::images::ImageError) -> Self {
        tracing::error!("Image storage error: {}", err);
        ApiError::internal(format!("Failed to store image: {}", err))
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

/// Response extension set on 500s rendered from `ApiError::Internal`
#[derive(Debug, Clone, Copy)]
pub struct InternalErrorRendered;

// Automatic HTTP response conversion for Axum. Detail hiding here follows the
// process-wide CONFIG; the router re-checks its own AppConfig for 500s in
// `middleware::envelope::redact_internal_errors`.
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let production = crate::is_production!();
        let mut response = (self.status_code(), Json(self.to_json(production))).into_response();
        if matches!(self, ApiError::Internal(_)) {
            response.extensions_mut().insert(InternalErrorRendered);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_status_codes() {
        assert_eq!(ApiError::invalid_credentials().status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::unauthenticated().status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::field("name", "x").status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ApiError::internal("boom").status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_body_carries_field_errors() {
        let body = ApiError::field("division_id", "Division not found.").to_json(false);
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Division not found.");
        assert_eq!(body["errors"]["division_id"][0], "Division not found.");
    }

    #[test]
    fn internal_detail_hidden_in_production() {
        let err = ApiError::internal("connection reset by peer");
        assert_eq!(err.to_json(true)["message"], "Internal Server Error");
        assert_eq!(err.to_json(false)["message"], "connection reset by peer");
        assert!(err.to_json(true).get("errors").is_none());
    }

    #[test]
    fn unauthenticated_message() {
        let body = ApiError::unauthenticated().to_json(true);
        assert!(body["message"].as_str().unwrap().starts_with("Unauthenticated"));
    }
}
