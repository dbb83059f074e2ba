//! Authentication route handlers.
//!
//! Signup and login return a fresh bearer token; logout revokes the one
//! presented.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::{ApiJson, Result, clear_sentry_user};
use crate::middleware::RequireAuth;
use crate::services::AuthService;
use crate::state::AppState;

use super::MessageResponse;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Signup request body.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub fio: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response carrying a newly issued session token.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub message: &'static str,
    pub user_token: String,
}

fn auth_service(state: &AppState) -> AuthService<'_> {
    AuthService::new(state.pool(), state.tokens(), state.config().session_ttl)
}

// =============================================================================
// Handlers
// =============================================================================

/// Register an account and log it in.
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SignupRequest>,
) -> Result<(StatusCode, Json<TokenResponse>)> {
    let (_, session) = auth_service(&state)
        .signup(&body.email, &body.password, &body.fio)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            message: "Registered successfully",
            user_token: session.token.into_inner(),
        }),
    ))
}

/// Exchange email and password for a session token.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    let (_, session) = auth_service(&state)
        .login(&body.email, &body.password)
        .await?;

    Ok(Json(TokenResponse {
        message: "Logged in successfully",
        user_token: session.token.into_inner(),
    }))
}

/// Revoke the presented session token.
pub async fn logout(
    State(state): State<AppState>,
    auth: RequireAuth,
) -> Result<Json<MessageResponse>> {
    auth_service(&state).logout(&auth.token).await?;

    tracing::info!(user_id = %auth.user.id, "User logged out");
    clear_sentry_user();

    Ok(Json(MessageResponse::new("Logged out successfully")))
}
