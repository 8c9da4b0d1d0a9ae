//! Cashier verification codes.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// How long a cash intent (and its cashier code) stays valid.
pub const CASH_INTENT_TTL_MINUTES: i64 = 15;

/// Errors that can occur when parsing a [`CashierCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CashierCodeError {
    /// The input is empty or only whitespace.
    #[error("cashier code cannot be empty")]
    Empty,
}

/// The short token a cashier types in to confirm a cash payment.
///
/// Stored and compared as text. Point-of-sale clients send the code either
/// as a JSON string or as a bare number, so deserialization accepts both.
///
/// ```
/// use smart_cart_core::CashierCode;
///
/// let from_text: CashierCode = serde_json::from_str("\"482913\"").unwrap();
/// let from_number: CashierCode = serde_json::from_str("482913").unwrap();
/// assert_eq!(from_text, from_number);
/// ```
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type), sqlx(transparent))]
#[serde(transparent)]
pub struct CashierCode(String);

impl CashierCode {
    /// Parse a `CashierCode`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`CashierCodeError::Empty`] if nothing is left after trimming.
    pub fn parse(s: &str) -> Result<Self, CashierCodeError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CashierCodeError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// A purely numeric code.
    #[must_use]
    pub fn from_number(n: u64) -> Self {
        Self(n.to_string())
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CashierCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CashierCode {
    type Err = CashierCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for CashierCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }

        let text = match Raw::deserialize(deserializer)? {
            Raw::Text(s) => s,
            Raw::Number(n) => n.to_string(),
        };
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_number_coerced_to_text() {
        let code: CashierCode = serde_json::from_str("482913").unwrap();
        assert_eq!(code.as_str(), "482913");
    }

    #[test]
    fn test_text_trimmed() {
        let code: CashierCode = serde_json::from_str("\" 482913 \"").unwrap();
        assert_eq!(code.as_str(), "482913");
    }

    #[test]
    fn test_rejects_empty_and_other_types() {
        assert!(serde_json::from_str::<CashierCode>("\"  \"").is_err());
        assert!(serde_json::from_str::<CashierCode>("true").is_err());
        assert!(serde_json::from_str::<CashierCode>("-12").is_err());
    }

    #[test]
    fn test_serializes_as_string() {
        let code = CashierCode::parse("000123").unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"000123\"");
    }
}
