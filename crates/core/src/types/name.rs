//! Personal name type.

use core::fmt;

use serde::{Serialize, Serializer};

/// Errors that can occur when parsing a [`FullName`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FullNameError {
    /// Fewer than two or more than three whitespace-separated parts.
    #[error("full name must have 2 or 3 parts (name, surname, optional middle name), got {0}")]
    PartCount(usize),
    /// One of the parts exceeds the column width.
    #[error("each part of the full name must be at most {max} characters")]
    PartTooLong {
        /// Maximum allowed length per part.
        max: usize,
    },
    /// A stored part is empty or contains whitespace.
    #[error("name parts cannot be empty or contain whitespace")]
    InvalidPart,
}

/// A person's name: given name, surname and an optional middle name.
///
/// Parsed from a single `fio` string ("name surname [middle name]").
///
/// ```
/// use simpletobuy_core::FullName;
///
/// let name = FullName::parse("Ivan Petrov Sergeevich").unwrap();
/// assert_eq!(name.name(), "Ivan");
/// assert_eq!(name.surname(), "Petrov");
/// assert_eq!(name.middle_name(), Some("Sergeevich"));
/// assert_eq!(name.to_string(), "Ivan Petrov Sergeevich");
///
/// assert!(FullName::parse("Ivan").is_err());
/// assert!(FullName::parse("a b c d").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FullName {
    name: String,
    surname: String,
    middle_name: Option<String>,
}

impl FullName {
    /// Maximum length of each part, matching the `varchar(255)` columns.
    pub const MAX_PART_LENGTH: usize = 255;

    /// Parse a `FullName` from a whitespace-separated `fio` string.
    ///
    /// # Errors
    ///
    /// Returns [`FullNameError::PartCount`] unless there are exactly two or
    /// three parts, and [`FullNameError::PartTooLong`] if any part is longer
    /// than [`Self::MAX_PART_LENGTH`] characters.
    pub fn parse(fio: &str) -> Result<Self, FullNameError> {
        let parts: Vec<&str> = fio.split_whitespace().collect();

        let (name, surname, middle_name) = match parts.as_slice() {
            [name, surname] => (*name, *surname, None),
            [name, surname, middle] => (*name, *surname, Some(*middle)),
            other => return Err(FullNameError::PartCount(other.len())),
        };

        Self::build(name, surname, middle_name)
    }

    /// Rebuild a `FullName` from its stored columns.
    ///
    /// # Errors
    ///
    /// Returns an error if any part is empty, contains whitespace, or is too long.
    pub fn from_parts(
        name: &str,
        surname: &str,
        middle_name: Option<&str>,
    ) -> Result<Self, FullNameError> {
        let invalid = |part: &str| part.is_empty() || part.chars().any(char::is_whitespace);
        if invalid(name) || invalid(surname) || middle_name.is_some_and(invalid) {
            return Err(FullNameError::InvalidPart);
        }

        Self::build(name, surname, middle_name)
    }

    fn build(name: &str, surname: &str, middle_name: Option<&str>) -> Result<Self, FullNameError> {
        let too_long = |part: &str| part.chars().count() > Self::MAX_PART_LENGTH;
        if too_long(name) || too_long(surname) || middle_name.is_some_and(too_long) {
            return Err(FullNameError::PartTooLong {
                max: Self::MAX_PART_LENGTH,
            });
        }

        Ok(Self {
            name: name.to_owned(),
            surname: surname.to_owned(),
            middle_name: middle_name.map(str::to_owned),
        })
    }

    /// Given name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Family name.
    #[must_use]
    pub fn surname(&self) -> &str {
        &self.surname
    }

    /// Middle name (patronymic), if any.
    #[must_use]
    pub fn middle_name(&self) -> Option<&str> {
        self.middle_name.as_deref()
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.surname)?;
        if let Some(middle) = &self.middle_name {
            write!(f, " {middle}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for FullName {
    type Err = FullNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for FullName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_parts() {
        let name = FullName::parse("Ivan Petrov").unwrap();
        assert_eq!(name.name(), "Ivan");
        assert_eq!(name.surname(), "Petrov");
        assert_eq!(name.middle_name(), None);
    }

    #[test]
    fn test_parse_three_parts_collapses_whitespace() {
        let name = FullName::parse("  Ivan \t Petrov   Sergeevich ").unwrap();
        assert_eq!(name.middle_name(), Some("Sergeevich"));
        assert_eq!(name.to_string(), "Ivan Petrov Sergeevich");
    }

    #[test]
    fn test_parse_wrong_part_count() {
        assert_eq!(FullName::parse(""), Err(FullNameError::PartCount(0)));
        assert_eq!(FullName::parse("Ivan"), Err(FullNameError::PartCount(1)));
        assert_eq!(
            FullName::parse("Ivan Petrov Sergeevich Jr"),
            Err(FullNameError::PartCount(4))
        );
    }

    #[test]
    fn test_parse_part_too_long() {
        let long = "a".repeat(FullName::MAX_PART_LENGTH + 1);
        assert!(matches!(
            FullName::parse(&format!("Ivan {long}")),
            Err(FullNameError::PartTooLong { .. })
        ));
    }

    #[test]
    fn test_parse_counts_characters_not_bytes() {
        let cyrillic = "Ж".repeat(FullName::MAX_PART_LENGTH);
        assert!(FullName::parse(&format!("{cyrillic} Петров")).is_ok());
    }

    #[test]
    fn test_from_parts_rejects_invalid_columns() {
        assert!(FullName::from_parts("Ivan", "Petrov", None).is_ok());
        assert_eq!(
            FullName::from_parts("", "Petrov", None),
            Err(FullNameError::InvalidPart)
        );
        assert_eq!(
            FullName::from_parts("Ivan", "Petrov", Some("a b")),
            Err(FullNameError::InvalidPart)
        );
    }

    #[test]
    fn test_serializes_as_joined_string() {
        let name = FullName::parse("Ivan Petrov").unwrap();
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"Ivan Petrov\"");
    }
}
