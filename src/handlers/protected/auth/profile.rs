// handlers/protected/auth/profile.rs - PUT /profile handler

use axum::{extract::State, Extension};
use serde::Serialize;

use crate::database::models::AdminProfile;
use crate::handlers::FormData;
use crate::middleware::{ApiResponse, ApiResult, AuthAdmin};
use crate::services::ProfileInput;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileData {
    pub user: AdminProfile,
}

/// Replace the caller's name, phone and email. All three are required.
pub async fn profile_put(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthAdmin>,
    mut form: FormData,
) -> ApiResult<ProfileData> {
    let input = ProfileInput {
        name: form.take_text("name"),
        phone: form.take_text("phone"),
        email: form.take_text("email"),
    };

    let updated = state.auth.update_profile(&auth.admin, input).await?;

    Ok(ApiResponse::success(
        "Profile updated successfully",
        ProfileData {
            user: AdminProfile::from(&updated),
        },
    ))
}
