//! Database migration command.
//!
//! Applies the migrations embedded from `crates/storefront/migrations/`.
//! Already-applied migrations are skipped.

use simpletobuy_storefront::db;
use sqlx::PgPool;

use super::CliError;

/// Run storefront database migrations.
///
/// # Errors
///
/// Returns `CliError::Migration` if a migration fails.
pub async fn run(pool: &PgPool) -> Result<(), CliError> {
    tracing::info!("Running storefront migrations...");
    db::run_migrations(pool).await?;
    tracing::info!("Storefront migrations complete!");
    Ok(())
}
