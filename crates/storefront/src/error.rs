//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`, and every error leaves as a JSON object with a
//! `message` key.

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{AuthError, CartError, CatalogError, FieldErrors, ProfileError};

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// One or more inputs are invalid.
    #[error("Validation error: {0}")]
    Validation(FieldErrors),

    /// Missing, unknown or expired credentials.
    #[error("Login failed")]
    Unauthorized,

    /// Authenticated, but lacking the admin privilege.
    #[error("Forbidden for you")]
    Forbidden,

    /// Resource not found.
    #[error("{0}")]
    NotFound(&'static str),

    /// The request conflicts with current state.
    #[error("{0}")]
    BadRequest(String),

    /// Database operation failed.
    #[error(transparent)]
    Database(#[from] RepositoryError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),

    /// An extractor refused the request.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Rejected { status, .. } => *status,
        }
    }

    /// JSON body: `message` plus one key per invalid field.
    fn body(&self) -> Value {
        let mut body = Map::new();
        let message = match self {
            Self::Validation(_) => "Validation error".to_owned(),
            other => other.to_string(),
        };
        body.insert("message".to_owned(), Value::String(message));

        if let Self::Validation(errors) = self
            && let Ok(Value::Object(fields)) = serde_json::to_value(errors)
        {
            body.extend(fields);
        }

        Value::Object(body)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.status().is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (self.status(), Json(self.body())).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(errors) => Self::Validation(errors),
            AuthError::InvalidCredentials | AuthError::Unauthenticated => Self::Unauthorized,
            AuthError::Repository(e) => Self::Database(e),
            AuthError::PasswordHash | AuthError::InvalidTokenKey => Self::Internal(err.to_string()),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Forbidden => Self::Forbidden,
            CatalogError::Validation(errors) => Self::Validation(errors),
            CatalogError::NoInput => Self::BadRequest("No input provided".to_owned()),
            CatalogError::NotFound => Self::NotFound("Product not found"),
            CatalogError::Conflict(message) => Self::BadRequest(message),
            CatalogError::Repository(e) => Self::Database(e),
        }
    }
}

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::Conflict(message) => Self::BadRequest(message),
            CartError::LineNotFound => Self::NotFound("Cart item not found"),
            CartError::EmptyCart => Self::BadRequest("Cart is empty".to_owned()),
            CartError::Repository(e) => Self::Database(e),
        }
    }
}

impl From<ProfileError> for AppError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::NoInput => Self::BadRequest("No input provided".to_owned()),
            ProfileError::Validation(errors) => Self::Validation(errors),
            ProfileError::PasswordHash => Self::Internal(err.to_string()),
            ProfileError::Repository(e) => Self::Database(e),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        // Syntax errors are 400, missing or mistyped fields are 422.
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        match rejection {
            PathRejection::FailedToDeserializePathParams(_) => Self::NotFound("Not found"),
            other => Self::Rejected {
                status: other.status(),
                message: other.body_text(),
            },
        }
    }
}

/// `axum::Json` with rejections rendered as [`AppError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Path` with rejections rendered as [`AppError`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Fallback for unmatched routes.
pub async fn not_found() -> AppError {
    AppError::NotFound("Not found")
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
