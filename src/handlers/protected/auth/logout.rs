// handlers/protected/auth/logout.rs - POST /logout handler

use axum::{extract::State, Extension};

use crate::middleware::{ApiResponse, ApiResult, AuthAdmin};
use crate::state::AppState;

/// Revoke the token used for this request. Other sessions are unaffected.
pub async fn logout_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthAdmin>,
) -> ApiResult {
    state.auth.revoke(&auth.token_hash).await?;
    tracing::info!("Admin '{}' logged out", auth.admin.username);
    Ok(ApiResponse::message("Logout successful"))
}
