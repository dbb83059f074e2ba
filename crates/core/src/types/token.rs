//! Opaque session token.

use core::fmt;

use serde::Serialize;

/// A bearer credential handed to the client at login or signup.
///
/// The value is opaque: it carries no user id and can only be resolved by
/// looking it up in the sessions table. `Debug` output is redacted so tokens
/// never end up in logs.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap an already-issued token value.
    #[must_use]
    pub const fn new(token: String) -> Self {
        Self(token)
    }

    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the token and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionToken").field(&"[REDACTED]").finish()
    }
}

impl AsRef<str> for SessionToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let token = SessionToken::new("deadbeef".to_owned());
        let debug = format!("{token:?}");
        assert!(!debug.contains("deadbeef"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let token = SessionToken::new("abc123".to_owned());
        assert_eq!(serde_json::to_string(&token).unwrap(), "\"abc123\"");
    }
}
