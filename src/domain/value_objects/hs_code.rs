//! # HS Code
//!
//! Harmonized System tariff classification codes.
//!
//! Codes arrive in many shapes (`8471.30.0100`, `8471 30`, `847130`). The
//! engine keeps only the digits and truncates to a canonical length so
//! that tariff tables keyed at that length can be looked up directly.
//! Truncation never rounds and is recorded on the value.

use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical HS code length used when none is configured.
pub const DEFAULT_HS_DIGITS: usize = 6;

/// A canonicalized HS code.
///
/// # Examples
///
/// ```
/// use landed_cost::domain::value_objects::HsCode;
///
/// let code = HsCode::canonicalize("8471.30.0100", 6).unwrap();
/// assert_eq!(code.as_str(), "847130");
/// assert!(code.was_truncated());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HsCode {
    digits: String,
    truncated: bool,
}

impl HsCode {
    /// Strips separators and truncates to `canonical_digits`.
    ///
    /// Codes shorter than the canonical length are kept as given.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidHsCode` if the input contains characters
    /// other than digits and `.`, `-` or whitespace separators, or no digits at all.
    pub fn canonicalize(raw: &str, canonical_digits: usize) -> DomainResult<Self> {
        let mut digits = String::with_capacity(raw.len());
        for c in raw.chars() {
            if c.is_ascii_digit() {
                digits.push(c);
            } else if !(c == '.' || c == '-' || c.is_whitespace()) {
                return Err(DomainError::InvalidHsCode(raw.to_string()));
            }
        }

        if digits.is_empty() {
            return Err(DomainError::InvalidHsCode(raw.to_string()));
        }

        let truncated = digits.len() > canonical_digits;
        if truncated {
            digits.truncate(canonical_digits);
        }

        Ok(Self { digits, truncated })
    }

    /// Returns the canonical digits.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.digits
    }

    /// Returns true if digits were dropped to reach the canonical length.
    #[inline]
    #[must_use]
    pub fn was_truncated(&self) -> bool {
        self.truncated
    }
}

impl fmt::Display for HsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digits)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn truncates_without_rounding() {
        let code = HsCode::canonicalize("6109999999", 6).unwrap();
        assert_eq!(code.as_str(), "610999");
        assert!(code.was_truncated());
    }

    #[test]
    fn short_code_is_kept() {
        let code = HsCode::canonicalize("6109", 6).unwrap();
        assert_eq!(code.as_str(), "6109");
        assert!(!code.was_truncated());
    }

    #[test]
    fn exact_length_is_not_truncated() {
        let code = HsCode::canonicalize("6109.10", 6).unwrap();
        assert_eq!(code.as_str(), "610910");
        assert!(!code.was_truncated());
    }

    #[test]
    fn separators_are_stripped() {
        let code = HsCode::canonicalize("8471 30-01", 8).unwrap();
        assert_eq!(code.as_str(), "84713001");
    }

    #[test]
    fn rejects_letters_and_empty() {
        assert!(HsCode::canonicalize("ABC123", 6).is_err());
        assert!(HsCode::canonicalize(" . ", 6).is_err());
    }
}
