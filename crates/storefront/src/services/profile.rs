//! Profile service: read and partially update the caller's own account.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;

use simpletobuy_core::{Email, FullName, UserId};

use crate::db::{RepositoryError, UserRepository};
use crate::models::{ProfileChanges, User};
use crate::services::FieldErrors;
use crate::services::auth::{AuthError, hash_password};
use crate::services::validation::validate_password;

/// Longest accepted avatar path or URL, in characters.
pub const MAX_AVATAR_CHARS: usize = 255;

/// Errors from profile operations.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// An update supplied no fields.
    #[error("no input provided")]
    NoInput,

    /// Input failed validation, or the new email is taken.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Public view of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub id: UserId,
    pub fio: String,
    pub email: Email,
    pub avatar: String,
    pub is_admin: bool,
}

impl From<&User> for Profile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            fio: user.name.to_string(),
            email: user.email.clone(),
            avatar: user.avatar.clone(),
            is_admin: user.is_admin,
        }
    }
}

/// Body of a profile update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePatch {
    pub email: Option<String>,
    pub fio: Option<String>,
    pub password: Option<String>,
    pub avatar: Option<String>,
}

impl ProfilePatch {
    /// True when no field was supplied.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.fio.is_none()
            && self.password.is_none()
            && self.avatar.is_none()
    }
}

fn validate_avatar(avatar: &str) -> Result<String, &'static str> {
    let avatar = avatar.trim();
    if avatar.is_empty() {
        return Err("avatar cannot be empty");
    }
    if avatar.chars().count() > MAX_AVATAR_CHARS {
        return Err("avatar must be at most 255 characters");
    }
    Ok(avatar.to_owned())
}

/// Profile service.
pub struct ProfileService<'a> {
    users: UserRepository<'a>,
}

impl<'a> ProfileService<'a> {
    /// Create a new profile service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// The caller's profile.
    #[must_use]
    pub fn get_profile(&self, user: &User) -> Profile {
        Profile::from(user)
    }

    /// Validate `patch` and apply it to the caller's record.
    ///
    /// Fields are checked in the order email, password, fio, avatar and all
    /// problems are reported together. Nothing is written unless every
    /// supplied field is valid.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::NoInput` if `patch` supplies nothing.
    /// Returns `ProfileError::Validation` for invalid fields or an email used
    /// by another account.
    pub async fn update_profile(
        &self,
        user: &User,
        patch: &ProfilePatch,
    ) -> Result<Profile, ProfileError> {
        if patch.is_empty() {
            return Err(ProfileError::NoInput);
        }

        let mut errors = FieldErrors::new();
        let email = patch
            .email
            .as_deref()
            .and_then(|email| errors.check("email", Email::parse(email)));
        let password = patch.password.as_deref().and_then(|password| {
            errors.check("password", validate_password(password).map(|()| password))
        });
        let name = patch
            .fio
            .as_deref()
            .and_then(|fio| errors.check("fio", FullName::parse(fio)));
        let avatar = patch
            .avatar
            .as_deref()
            .and_then(|avatar| errors.check("avatar", validate_avatar(avatar)));

        if !errors.is_empty() {
            return Err(ProfileError::Validation(errors));
        }

        let password_hash = password
            .map(hash_password)
            .transpose()
            .map_err(|_: AuthError| ProfileError::PasswordHash)?;

        let changes = ProfileChanges {
            email,
            password_hash,
            name,
            avatar,
        };

        let updated = self
            .users
            .update_profile(user.id, &changes)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => ProfileError::Validation(FieldErrors::single(
                    "email",
                    "email is already registered",
                )),
                other => ProfileError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "Profile updated");

        Ok(Profile::from(&updated))
    }
}
