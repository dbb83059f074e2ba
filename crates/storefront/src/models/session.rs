//! Session-related types.

use chrono::{DateTime, Utc};

use simpletobuy_core::{SessionToken, UserId};

/// A persisted bearer session.
///
/// Authenticates `user_id` until it is deleted (logout, prune) or
/// `expires_at` passes.
#[derive(Debug, Clone)]
pub struct Session {
    /// The opaque token presented by the client.
    pub token: SessionToken,
    /// Owner of the session.
    pub user_id: UserId,
    /// When the token was issued.
    pub created_at: DateTime<Utc>,
    /// When the token stops authenticating.
    pub expires_at: DateTime<Utc>,
}
