//! Authentication extractors.
//!
//! Requests authenticate with `Authorization: Bearer <token>`. The token is
//! resolved against the `sessions` table on every request.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::{AppError, set_sentry_user};
use crate::models::User;
use crate::services::AuthService;
use crate::state::AppState;

/// Extractor that requires a valid bearer session.
///
/// Missing header, wrong scheme, empty, unknown and expired tokens all reject
/// with `401`.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(auth: RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", auth.user.name)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAuth {
    /// The authenticated user.
    pub user: User,
    /// The presented token, needed to revoke the session on logout.
    pub token: String,
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
///
/// The scheme is matched case-insensitively.
#[must_use]
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or(AppError::Unauthorized)?
            .to_owned();

        let auth = AuthService::new(state.pool(), state.tokens(), state.config().session_ttl);
        let user = auth.resolve(&token).await?;

        set_sentry_user(&user.id, Some(user.email.as_str()));
        tracing::Span::current().record("user_id", user.id.as_i32());

        Ok(Self { user, token })
    }
}

/// Extractor that requires a bearer session belonging to an admin.
///
/// Rejects with `401` like [`RequireAuth`], then with `403` for non-admins.
/// Handlers list it before any body extractor so a non-admin is refused
/// whatever the body holds.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub User);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAuth { user, .. } = RequireAuth::from_request_parts(parts, state).await?;
        admin_only(user).map(Self)
    }
}

fn admin_only(user: User) -> Result<User, AppError> {
    if user.is_admin {
        Ok(user)
    } else {
        tracing::info!(user_id = %user.id, "Admin-only request refused");
        Err(AppError::Forbidden)
    }
}
