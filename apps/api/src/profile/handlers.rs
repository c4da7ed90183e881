//! Axum route handlers for user records and learning profiles.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{required, AppError};
use crate::models::user::Profile;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub uid: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    pub success: bool,
    pub message: String,
    pub uid: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: Option<Profile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveProfileRequest {
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub profile_data: Option<Profile>,
}

#[derive(Debug, Serialize)]
pub struct SaveProfileResponse {
    pub success: bool,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// POST /api/auth/create-user
///
/// Registers the identity provider's uid. Existing users are merged, not replaced.
pub async fn handle_create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<CreateUserResponse>, AppError> {
    let uid = required(request.uid.as_deref(), "uid")?;
    let email = required(request.email.as_deref(), "email")?;

    let user = state
        .store
        .upsert_user(uid, Some(email), non_blank(&request.name))
        .await?;
    info!("Registered user {}", user.id);

    Ok(Json(CreateUserResponse {
        success: true,
        message: "User created successfully".to_string(),
        uid: user.id,
    }))
}

/// GET /api/profile?userId=
///
/// Unknown users have no profile rather than a 404.
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Query(query): Query<ProfileQuery>,
) -> Result<Json<ProfileResponse>, AppError> {
    let user_id = required(query.user_id.as_deref(), "userId")?;
    let profile = state
        .store
        .get_user(user_id)
        .await?
        .and_then(|u| u.profile.map(|p| p.0));
    Ok(Json(ProfileResponse { profile }))
}

/// POST /api/profile
///
/// Upserts the user, then replaces their profile.
pub async fn handle_save_profile(
    State(state): State<AppState>,
    Json(request): Json<SaveProfileRequest>,
) -> Result<Json<SaveProfileResponse>, AppError> {
    let user_id = required(request.user_id.as_deref(), "userId")?;
    let profile = request
        .profile_data
        .ok_or_else(|| AppError::Validation("profileData is required".to_string()))?;

    let store = state.store.as_ref();
    store
        .upsert_user(user_id, non_blank(&request.email), non_blank(&request.name))
        .await?;
    store.save_profile(user_id, &profile).await?;
    info!("Saved profile for user {user_id}");

    Ok(Json(SaveProfileResponse { success: true }))
}
