//! Per-field validation failures.
//!
//! Services collect every invalid input into [`FieldErrors`] before touching
//! storage. The error envelope renders each entry as a top-level JSON key.

use std::fmt;

use serde::Serialize;
use serde::ser::SerializeMap;

/// Ordered list of `(field, problem)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<(&'static str, String)>);

impl FieldErrors {
    /// An empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// A collection holding a single failure.
    #[must_use]
    pub fn single(field: &'static str, problem: impl fmt::Display) -> Self {
        let mut errors = Self::new();
        errors.push(field, problem);
        errors
    }

    /// Record a failure for `field`.
    pub fn push(&mut self, field: &'static str, problem: impl fmt::Display) {
        self.0.push((field, problem.to_string()));
    }

    /// Record the error of `result` under `field`, returning the success value.
    pub fn check<T, E: fmt::Display>(
        &mut self,
        field: &'static str,
        result: Result<T, E>,
    ) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.push(field, e);
                None
            }
        }
    }

    /// Whether no failure was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names of the invalid fields, in the order they were checked.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|(field, _)| *field)
    }

    /// The recorded problem for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, problem)| problem.as_str())
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, problem) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {problem}")?;
            first = false;
        }
        Ok(())
    }
}

impl Serialize for FieldErrors {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, problem) in &self.0 {
            map.serialize_entry(field, problem)?;
        }
        map.end()
    }
}

/// Validate a new plaintext password: non-empty and bounded.
///
/// # Errors
///
/// Returns a human-readable problem description.
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.is_empty() {
        return Err("password cannot be empty");
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err("password must be at most 1024 bytes");
    }
    Ok(())
}

/// Upper bound on accepted password length, in bytes.
pub const MAX_PASSWORD_BYTES: usize = 1024;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_preserve_order() {
        let mut errors = FieldErrors::new();
        errors.push("email", "bad email");
        errors.push("fio", "bad name");

        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["email", "fio"]);
        assert_eq!(errors.get("fio"), Some("bad name"));
        assert_eq!(errors.get("avatar"), None);
        assert_eq!(errors.to_string(), "email: bad email; fio: bad name");
    }

    #[test]
    fn test_check_records_errors() {
        let mut errors = FieldErrors::new();
        let ok: Option<u8> = errors.check("price", Ok::<_, &str>(3));
        let bad: Option<u8> = errors.check("name", Err("name cannot be empty"));

        assert_eq!(ok, Some(3));
        assert_eq!(bad, None);
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["name"]);
    }

    #[test]
    fn test_serializes_as_flat_object() {
        let errors = FieldErrors::single("email", "email cannot be empty");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({ "email": "email cannot be empty" }));
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("hunter2").is_ok());
        assert!(validate_password("").is_err());
        assert!(validate_password(&"x".repeat(MAX_PASSWORD_BYTES)).is_ok());
        assert!(validate_password(&"x".repeat(MAX_PASSWORD_BYTES + 1)).is_err());
    }
}
