//! Authentication service.
//!
//! Signup, password login, bearer session resolution and logout. Sessions
//! are opaque tokens stored server-side with an expiry that is checked on
//! every read.

mod credentials;
mod error;

pub use credentials::{TokenIssuer, hash_password, verify_password};
pub use error::AuthError;

use chrono::{Duration, Utc};
use sqlx::PgPool;

use simpletobuy_core::{Email, FullName, UserId};

use crate::db::{RepositoryError, SessionRepository, UserRepository};
use crate::models::{Session, User};
use crate::services::FieldErrors;
use crate::services::validation::validate_password;

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    sessions: SessionRepository<'a>,
    issuer: &'a TokenIssuer,
    session_ttl: Duration,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, issuer: &'a TokenIssuer, session_ttl: Duration) -> Self {
        Self {
            users: UserRepository::new(pool),
            sessions: SessionRepository::new(pool),
            issuer,
            session_ttl,
        }
    }

    /// Register a new user and open their first session.
    ///
    /// Fields are validated in the order email, password, fio, and every
    /// invalid one is reported. The user row and session row are written in
    /// one transaction.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` for invalid input or an email that is
    /// already registered.
    /// Returns `AuthError::PasswordHash` if hashing fails.
    /// Returns `AuthError::Repository` for other storage failures.
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        fio: &str,
    ) -> Result<(User, Session), AuthError> {
        let mut errors = FieldErrors::new();
        let email = errors.check("email", Email::parse(email));
        errors.check("password", validate_password(password));
        let name = errors.check("fio", FullName::parse(fio));

        let (Some(email), Some(name)) = (email, name) else {
            return Err(AuthError::Validation(errors));
        };
        if !errors.is_empty() {
            return Err(AuthError::Validation(errors));
        }

        let password_hash = hash_password(password)?;
        let now = Utc::now();
        let token = self.issuer.issue(now);

        let (user, session) = self
            .users
            .create_with_session(&email, &name, &password_hash, &token, now + self.session_ttl)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::Validation(FieldErrors::single(
                    "email",
                    "email is already registered",
                )),
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok((user, session))
    }

    /// Login with email and password, opening a new session.
    ///
    /// No session row is written unless the password verifies.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email is malformed or
    /// unknown, or the password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, Session), AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &password_hash) {
            tracing::info!(user_id = %user.id, "Login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let session = self.start_session(user.id).await?;
        tracing::info!(user_id = %user.id, "User logged in");

        Ok((user, session))
    }

    /// Issue a token for `user_id` and persist it with the configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the session cannot be stored.
    pub async fn start_session(&self, user_id: UserId) -> Result<Session, AuthError> {
        let now = Utc::now();
        let token = self.issuer.issue(now);
        let session = self
            .sessions
            .create(user_id, &token, now + self.session_ttl)
            .await?;
        Ok(session)
    }

    /// Resolve a bearer token to the user it authenticates.
    ///
    /// Expired sessions are deleted as they are encountered.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthenticated` for empty, unknown or expired tokens.
    /// Returns `AuthError::Repository` for storage failures.
    pub async fn resolve(&self, token: &str) -> Result<User, AuthError> {
        if token.is_empty() {
            return Err(AuthError::Unauthenticated);
        }

        self.sessions
            .resolve(token, Utc::now())
            .await?
            .ok_or(AuthError::Unauthenticated)
    }

    /// Revoke the session identified by `token`.
    ///
    /// Returns `true` if a session was deleted.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` for storage failures.
    pub async fn logout(&self, token: &str) -> Result<bool, AuthError> {
        Ok(self.sessions.delete(token).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;
    use sqlx::postgres::PgPoolOptions;

    use super::*;

    fn lazy_pool() -> PgPool {
        PgPoolOptions::new()
            .connect_lazy("postgres://localhost/simpletobuy_unreachable")
            .unwrap()
    }

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(&SecretString::from("k9Q2vX7mR4tL8wZ1pB6nC3yF5hJ0sD4g")).unwrap()
    }

    #[tokio::test]
    async fn test_signup_reports_every_invalid_field_before_storage() {
        let pool = lazy_pool();
        let issuer = issuer();
        let auth = AuthService::new(&pool, &issuer, Duration::hours(1));

        let err = auth.signup("not-an-email", "", "Ivan").await.unwrap_err();
        let AuthError::Validation(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec!["email", "password", "fio"]
        );
    }

    #[tokio::test]
    async fn test_signup_rejects_four_part_name() {
        let pool = lazy_pool();
        let issuer = issuer();
        let auth = AuthService::new(&pool, &issuer, Duration::hours(1));

        let err = auth
            .signup("ivan@example.com", "secret", "a b c d")
            .await
            .unwrap_err();
        let AuthError::Validation(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["fio"]);
    }

    #[tokio::test]
    async fn test_login_with_malformed_email_is_invalid_credentials() {
        let pool = lazy_pool();
        let issuer = issuer();
        let auth = AuthService::new(&pool, &issuer, Duration::hours(1));

        let err = auth.login("nope", "secret").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_resolve_empty_token_is_unauthenticated() {
        let pool = lazy_pool();
        let issuer = issuer();
        let auth = AuthService::new(&pool, &issuer, Duration::hours(1));

        let err = auth.resolve("").await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated));
    }
}
