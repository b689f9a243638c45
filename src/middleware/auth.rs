use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::database::models::Admin;
use crate::error::ApiError;
use crate::services::auth_service::hash_token;
use crate::state::AppState;

/// Authenticated admin context resolved from the bearer token
#[derive(Clone, Debug)]
pub struct AuthAdmin {
    pub admin: Admin,
    /// Digest of the token that authenticated this request
    pub token_hash: String,
}

/// Bearer token middleware for protected routes
pub async fn bearer_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(request.headers()).ok_or_else(ApiError::unauthenticated)?;
    let admin = state.auth.validate(&token).await?;

    request.extensions_mut().insert(AuthAdmin {
        admin,
        token_hash: hash_token(&token),
    });

    Ok(next.run(request).await)
}

/// Rejects requests that already carry a valid token
pub async fn guest_only_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(token) = extract_bearer_token(request.headers()) {
        if state.auth.validate(&token).await.is_ok() {
            return Err(ApiError::forbidden("Already authenticated"));
        }
    }

    Ok(next.run(request).await)
}

/// Extract the token from `Authorization: Bearer <token>`
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}
