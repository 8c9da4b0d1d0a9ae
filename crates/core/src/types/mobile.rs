//! Customer mobile number.
//!
//! The mobile number is the natural key of a customer and of their pending
//! cash intent, so it is trimmed once at the boundary and compared verbatim
//! everywhere after that.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Mobile`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MobileError {
    /// The input is empty or only whitespace.
    #[error("mobile cannot be empty")]
    Empty,
}

/// A customer's mobile number.
///
/// No format is imposed beyond being non-empty: cashiers type whatever the
/// customer tells them, including country prefixes and spaces.
///
/// ```
/// use smart_cart_core::Mobile;
///
/// let mobile = Mobile::parse("  9990001111 ").unwrap();
/// assert_eq!(mobile.as_str(), "9990001111");
/// assert!(Mobile::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type), sqlx(transparent))]
#[serde(try_from = "String", into = "String")]
pub struct Mobile(String);

impl Mobile {
    /// Parse a `Mobile`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`MobileError::Empty`] if nothing is left after trimming.
    pub fn parse(s: &str) -> Result<Self, MobileError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(MobileError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the mobile number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Mobile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Mobile {
    type Err = MobileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Mobile {
    type Error = MobileError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Mobile> for String {
    fn from(mobile: Mobile) -> Self {
        mobile.0
    }
}

impl AsRef<str> for Mobile {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims() {
        let mobile = Mobile::parse(" +91 99900 01111\n").unwrap();
        assert_eq!(mobile.as_str(), "+91 99900 01111");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Mobile::parse(""), Err(MobileError::Empty));
        assert_eq!(Mobile::parse(" \t "), Err(MobileError::Empty));
    }

    #[test]
    fn test_parse_has_no_length_limit() {
        let long = "9".repeat(64);
        assert_eq!(Mobile::parse(&long).unwrap().as_str(), long);
    }

    #[test]
    fn test_deserialize_validates() {
        let mobile: Mobile = serde_json::from_str("\" 9990001111 \"").unwrap();
        assert_eq!(mobile.as_str(), "9990001111");
        assert!(serde_json::from_str::<Mobile>("\"\"").is_err());
    }

    #[test]
    fn test_serialize_as_string() {
        let mobile = Mobile::parse("9990001111").unwrap();
        assert_eq!(serde_json::to_string(&mobile).unwrap(), "\"9990001111\"");
    }
}
