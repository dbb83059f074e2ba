//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use simpletobuy_core::{Email, FullName, SessionToken, UserId};

use super::RepositoryError;
use super::sessions::SessionRow;
use crate::models::{ProfileChanges, Session, User};

/// Columns selected for every [`UserRow`].
pub(crate) const USER_COLUMNS: &str =
    "id, name, surname, middle_name, email, profile_picture, admin, created_at";

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` user queries.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UserRow {
    id: i32,
    name: String,
    surname: String,
    middle_name: Option<String>,
    email: String,
    profile_picture: String,
    admin: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let name = FullName::from_parts(&row.name, &row.surname, row.middle_name.as_deref())
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid name in database: {e}"))
            })?;

        Ok(Self {
            id: UserId::new(row.id),
            name,
            email,
            avatar: row.profile_picture,
            is_admin: row.admin,
            created_at: row.created_at,
        })
    }
}

/// User row plus the stored password hash, for credential checks only.
#[derive(Debug, sqlx::FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user and their password hash by email.
    ///
    /// Returns `None` if no account uses this email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, CredentialRow>(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some((row.user.try_into()?, row.password_hash)))
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        email: &Email,
        name: &FullName,
        password_hash: &str,
        is_admin: bool,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r"
            INSERT INTO users (name, surname, middle_name, email, password_hash, admin)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(name.name())
        .bind(name.surname())
        .bind(name.middle_name())
        .bind(email.as_str())
        .bind(password_hash)
        .bind(is_admin)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_constraint(e, "email already exists"))?;

        row.try_into()
    }

    /// Create a new user and their first session in one transaction.
    ///
    /// Either both rows exist afterward or neither does.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email (or, improbably, the
    /// token) already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_with_session(
        &self,
        email: &Email,
        name: &FullName,
        password_hash: &str,
        token: &SessionToken,
        expires_at: DateTime<Utc>,
    ) -> Result<(User, Session), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, UserRow>(&format!(
            r"
            INSERT INTO users (name, surname, middle_name, email, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(name.name())
        .bind(name.surname())
        .bind(name.middle_name())
        .bind(email.as_str())
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_constraint(e, "email already exists"))?;

        let user: User = row.try_into()?;

        let session_row = sqlx::query_as::<_, SessionRow>(
            r"
            INSERT INTO sessions (user_id, token, expires_at)
            VALUES ($1, $2, $3)
            RETURNING token, user_id, created_at, expires_at
            ",
        )
        .bind(user.id)
        .bind(token.as_str())
        .bind(expires_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_constraint(e, "session token already exists"))?;

        tx.commit().await?;

        Ok((user, session_row.into()))
    }

    /// Apply validated profile changes to one user in a single `UPDATE`.
    ///
    /// Columns are written in the order email, password, name, avatar.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist or
    /// `changes` is empty.
    /// Returns `RepositoryError::Conflict` if the new email belongs to another account.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_profile(
        &self,
        id: UserId,
        changes: &ProfileChanges,
    ) -> Result<User, RepositoryError> {
        if changes.is_empty() {
            return Err(RepositoryError::NotFound);
        }

        let mut query: QueryBuilder<'_, Postgres> = QueryBuilder::new("UPDATE users SET ");
        let mut set = query.separated(", ");

        if let Some(email) = &changes.email {
            set.push("email = ").push_bind_unseparated(email.as_str());
        }
        if let Some(password_hash) = &changes.password_hash {
            set.push("password_hash = ")
                .push_bind_unseparated(password_hash.as_str());
        }
        if let Some(name) = &changes.name {
            set.push("name = ").push_bind_unseparated(name.name());
            set.push("surname = ").push_bind_unseparated(name.surname());
            set.push("middle_name = ")
                .push_bind_unseparated(name.middle_name());
        }
        if let Some(avatar) = &changes.avatar {
            set.push("profile_picture = ")
                .push_bind_unseparated(avatar.as_str());
        }

        query.push(" WHERE id = ").push_bind(id);
        query.push(" RETURNING ").push(USER_COLUMNS);

        let row = query
            .build_query_as::<UserRow>()
            .fetch_optional(self.pool)
            .await
            .map_err(|e| RepositoryError::from_constraint(e, "email already exists"))?
            .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Set or clear the admin flag for the account with this email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no account uses this email.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_admin(&self, email: &Email, is_admin: bool) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET admin = $1 WHERE email = $2 RETURNING {USER_COLUMNS}"
        ))
        .bind(is_admin)
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    /// Lock a user's row until the surrounding transaction ends.
    ///
    /// Serializes operations that must not interleave for the same user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub(crate) async fn lock_for_update(
        tx: &mut sqlx::PgConnection,
        id: UserId,
    ) -> Result<(), RepositoryError> {
        sqlx::query_scalar::<_, i32>("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(tx)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        Ok(())
    }
}
