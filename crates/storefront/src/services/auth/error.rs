//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::FieldErrors;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Signup input failed validation.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// Invalid credentials (wrong password or unknown email).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Bearer token missing, unknown or expired.
    #[error("not authenticated")]
    Unauthenticated,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// The token signing key was rejected.
    #[error("invalid token signing key")]
    InvalidTokenKey,
}
