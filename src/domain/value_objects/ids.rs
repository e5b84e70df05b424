//! # Identifiers
//!
//! String-based identifiers used across the engine.
//!
//! - [`CountryCode`]: validated ISO 3166-1 alpha-2 destination code
//! - [`UserId`]: customer identifier used for per-user multiplier overrides
//! - [`ProviderId`]: carrier rate provider identifier

use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// ISO 3166-1 alpha-2 country code, stored uppercase.
///
/// # Examples
///
/// ```
/// use landed_cost::domain::value_objects::CountryCode;
///
/// let us = CountryCode::new("us").unwrap();
/// assert_eq!(us.as_str(), "US");
/// assert!(CountryCode::new("USA").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    /// Creates a country code, normalizing to uppercase.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCountryCode` unless the input is exactly
    /// two ASCII letters.
    pub fn new(code: &str) -> DomainResult<Self> {
        let trimmed = code.trim();
        if trimmed.len() != 2 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DomainError::InvalidCountryCode(code.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Returns the code as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CountryCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CountryCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CountryCode> for String {
    fn from(value: CountryCode) -> Self {
        value.0
    }
}

/// Customer identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a user identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Carrier rate provider identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(String);

impl ProviderId {
    /// Creates a provider identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn country_code_normalizes_case_and_whitespace() {
        let code = CountryCode::new(" gb ").unwrap();
        assert_eq!(code.as_str(), "GB");
    }

    #[test]
    fn country_code_rejects_digits_and_wrong_length() {
        assert!(CountryCode::new("1A").is_err());
        assert!(CountryCode::new("DEU").is_err());
        assert!(CountryCode::new("").is_err());
    }

    #[test]
    fn country_code_deserializes_through_validation() {
        let code: CountryCode = serde_json::from_str("\"de\"").unwrap();
        assert_eq!(code.as_str(), "DE");
        assert!(serde_json::from_str::<CountryCode>("\"germany\"").is_err());
    }

    #[test]
    fn provider_id_display() {
        assert_eq!(ProviderId::new("dhl").to_string(), "dhl");
    }
}
