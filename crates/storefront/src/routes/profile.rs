//! Profile route handlers.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::error::{ApiJson, Result};
use crate::middleware::RequireAuth;
use crate::services::{Profile, ProfilePatch, ProfileService};
use crate::state::AppState;

/// `{"user": {...}}`, optionally with a message.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub user: Profile,
}

/// Show the caller's profile.
pub async fn show(State(state): State<AppState>, auth: RequireAuth) -> Json<ProfileResponse> {
    let user = ProfileService::new(state.pool()).get_profile(&auth.user);

    Json(ProfileResponse {
        message: None,
        user,
    })
}

/// Partially update the caller's profile.
pub async fn update(
    State(state): State<AppState>,
    auth: RequireAuth,
    ApiJson(patch): ApiJson<ProfilePatch>,
) -> Result<Json<ProfileResponse>> {
    let user = ProfileService::new(state.pool())
        .update_profile(&auth.user, &patch)
        .await?;

    Ok(Json(ProfileResponse {
        message: Some("Profile updated successfully"),
        user,
    }))
}
