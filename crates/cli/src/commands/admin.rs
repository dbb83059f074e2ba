//! Admin account management commands.
//!
//! The admin flag can only be changed here; the HTTP API never exposes it
//! for writing.

use simpletobuy_core::{Email, FullName};
use simpletobuy_storefront::db::{RepositoryError, UserRepository};
use simpletobuy_storefront::models::User;
use simpletobuy_storefront::services::FieldErrors;
use simpletobuy_storefront::services::auth::hash_password;
use simpletobuy_storefront::services::validation::validate_password;
use sqlx::PgPool;

use super::CliError;

/// Create a new admin account.
///
/// Input is validated like a signup.
///
/// # Errors
///
/// Returns `CliError::Validation` for invalid input, or
/// `CliError::UserExists` if the email is taken.
pub async fn create(
    pool: &PgPool,
    email: &str,
    fio: &str,
    password: &str,
) -> Result<User, CliError> {
    let mut errors = FieldErrors::new();
    let parsed_email = errors.check("email", Email::parse(email));
    errors.check("password", validate_password(password));
    let name = errors.check("fio", FullName::parse(fio));

    let (Some(parsed_email), Some(name)) = (parsed_email, name) else {
        return Err(CliError::Validation(errors));
    };
    if !errors.is_empty() {
        return Err(CliError::Validation(errors));
    }

    let password_hash = hash_password(password).map_err(|_| CliError::PasswordHash)?;

    tracing::info!("Creating admin account: {}", parsed_email);

    let user = UserRepository::new(pool)
        .create(&parsed_email, &name, &password_hash, true)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => CliError::UserExists(email.to_owned()),
            other => CliError::Repository(other),
        })?;

    tracing::info!(
        "Admin account created successfully! ID: {}, Email: {}",
        user.id,
        user.email
    );

    Ok(user)
}

/// Set or clear the admin flag on an existing account.
///
/// # Errors
///
/// Returns `CliError::UserNotFound` if no account uses this email.
pub async fn set_admin(pool: &PgPool, email: &str, is_admin: bool) -> Result<(), CliError> {
    let parsed_email =
        Email::parse(email).map_err(|e| CliError::Validation(FieldErrors::single("email", e)))?;

    let user = UserRepository::new(pool)
        .set_admin(&parsed_email, is_admin)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => CliError::UserNotFound(email.to_owned()),
            other => CliError::Repository(other),
        })?;

    if is_admin {
        tracing::info!(user_id = %user.id, "Admin flag granted to {}", user.email);
    } else {
        tracing::info!(user_id = %user.id, "Admin flag revoked from {}", user.email);
    }

    Ok(())
}
