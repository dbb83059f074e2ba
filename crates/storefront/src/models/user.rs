//! User domain types.

use chrono::{DateTime, Utc};

use simpletobuy_core::{Email, FullName, UserId};

/// Avatar path assigned to new accounts.
pub const DEFAULT_AVATAR: &str = "/avatars/default.jpg";

/// A storefront account (domain type).
///
/// Carries no password hash; see
/// [`crate::db::users::UserRepository::get_password_hash`].
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Name, surname and optional middle name.
    pub name: FullName,
    /// User's email address (unique).
    pub email: Email,
    /// Path or URL of the profile picture.
    pub avatar: String,
    /// Whether the user may mutate the catalog.
    pub is_admin: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

/// Validated profile changes, applied in one `UPDATE`.
///
/// `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub email: Option<Email>,
    pub password_hash: Option<String>,
    pub name: Option<FullName>,
    pub avatar: Option<String>,
}

impl ProfileChanges {
    /// True when no column would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.password_hash.is_none()
            && self.name.is_none()
            && self.avatar.is_none()
    }
}
