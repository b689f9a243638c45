// handlers/public/system.rs - service info, health and the 404 fallback

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET / - name, version and the route map
pub async fn root() -> ApiResult<serde_json::Value> {
    Ok(ApiResponse::success(
        "Staff Directory API",
        json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "login": "POST /login (guest)",
                "logout": "POST /logout",
                "profile": "PUT /profile",
                "divisions": "GET /divisions?name=&page=",
                "employees": "GET|POST /employees, PUT|DELETE /employees/:id",
                "health": "GET /health",
            }
        }),
    ))
}

/// GET /health - liveness plus a store round trip
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "message": "OK",
                "data": {
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "error",
                    "message": "Database unavailable",
                    "data": {
                        "timestamp": now,
                        "database": "unavailable"
                    }
                })),
            )
        }
    }
}

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
