//! Session maintenance commands.

use chrono::Utc;
use simpletobuy_storefront::db::SessionRepository;
use sqlx::PgPool;

use super::CliError;

/// Delete every session whose expiry has passed.
///
/// Returns the number of sessions removed.
///
/// # Errors
///
/// Returns `CliError::Repository` if the delete fails.
pub async fn prune(pool: &PgPool) -> Result<u64, CliError> {
    let removed = SessionRepository::new(pool)
        .delete_expired(Utc::now())
        .await?;

    tracing::info!(removed, "Expired sessions pruned");

    Ok(removed)
}
