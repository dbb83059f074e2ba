//! CLI command implementations.

pub mod admin;
pub mod migrate;
pub mod seed;
pub mod sessions;

use simpletobuy_storefront::config::{self, ConfigError};
use simpletobuy_storefront::db::{self, RepositoryError};
use simpletobuy_storefront::services::FieldErrors;
use sqlx::PgPool;
use thiserror::Error;

/// Pool size for one-shot operator commands.
const CLI_MAX_CONNECTIONS: u32 = 2;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// A migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A repository operation failed.
    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Command arguments failed validation.
    #[error("Invalid input: {0}")]
    Validation(FieldErrors),

    /// An account with this email already exists.
    #[error("Account already exists with email: {0}")]
    UserExists(String),

    /// No account uses this email.
    #[error("No account with email: {0}")]
    UserNotFound(String),

    /// Password hashing failed.
    #[error("Password hashing failed")]
    PasswordHash,
}

/// Connect to the storefront database named by the environment.
///
/// # Errors
///
/// Returns `CliError::Config` if no database URL is set, or
/// `CliError::Database` if the connection fails.
pub async fn connect() -> Result<PgPool, CliError> {
    dotenvy::dotenv().ok();

    let database_url = config::get_database_url("SIMPLETOBUY_DATABASE_URL")?;

    tracing::info!("Connecting to storefront database...");
    Ok(db::create_pool(&database_url, CLI_MAX_CONNECTIONS).await?)
}
