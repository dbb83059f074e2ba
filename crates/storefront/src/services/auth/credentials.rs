//! Password hashing and session token issuance.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use simpletobuy_core::SessionToken;

use super::AuthError;

type HmacSha256 = Hmac<Sha256>;

/// Bytes of randomness mixed into every token.
const NONCE_BYTES: usize = 32;

/// Hash a password using Argon2id with a fresh random salt.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored PHC hash string.
///
/// A malformed stored hash verifies as `false`.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Issues opaque session tokens.
///
/// A token is the hex HMAC-SHA256, keyed with the server secret, of the
/// issue instant and a random nonce. It carries no user data and cannot be
/// predicted without the key.
#[derive(Clone)]
pub struct TokenIssuer {
    mac: HmacSha256,
}

impl TokenIssuer {
    /// Create an issuer keyed with `secret`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidTokenKey` if the key is rejected.
    pub fn new(secret: &SecretString) -> Result<Self, AuthError> {
        let mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
            .map_err(|_| AuthError::InvalidTokenKey)?;
        Ok(Self { mac })
    }

    /// Issue a fresh token at `now`.
    #[must_use]
    pub fn issue(&self, now: DateTime<Utc>) -> SessionToken {
        let mut nonce = [0u8; NONCE_BYTES];
        rand::rng().fill_bytes(&mut nonce);

        let mut mac = self.mac.clone();
        mac.update(&now.timestamp_micros().to_be_bytes());
        mac.update(&nonce);

        SessionToken::new(hex::encode(mac.finalize().into_bytes()))
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(&SecretString::from("k9Q2vX7mR4tL8wZ1pB6nC3yF5hJ0sD4g")).unwrap()
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
    }

    #[test]
    fn test_hash_uses_fresh_salt() {
        let first = hash_password("same").unwrap();
        let second = hash_password("same").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_malformed_hash_is_false() {
        assert!(!verify_password("anything", "not-a-phc-string"));
        assert!(!verify_password("anything", ""));
    }

    #[test]
    fn test_token_shape() {
        let token = issuer().issue(Utc::now());
        assert_eq!(token.as_str().len(), 64);
        assert!(token.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(token.as_str(), token.as_str().to_lowercase());
    }

    #[test]
    fn test_tokens_are_unique_for_same_instant() {
        let issuer = issuer();
        let now = Utc::now();
        assert_ne!(issuer.issue(now), issuer.issue(now));
    }
}
