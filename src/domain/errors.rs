//! # Domain Errors
//!
//! Errors raised by domain validation and pricing rules.

use crate::domain::value_objects::arithmetic::ArithmeticError;
use thiserror::Error;

/// Domain layer error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Package dimensions or weight are not positive finite numbers.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// The terminal global-default multiplier is missing from the policy table.
    #[error("no default multiplier configured")]
    NoDefaultMultiplierConfigured,

    /// A multiplier factor is not strictly positive.
    #[error("invalid multiplier: {0}")]
    InvalidMultiplier(String),

    /// An insurance range is malformed (min above max, negative bound or premium).
    #[error("invalid insurance range: {0}")]
    InvalidInsuranceRange(String),

    /// Two insurance ranges share at least one value.
    #[error("insurance range [{min}, {max}] overlaps an existing range")]
    InsuranceRangeOverlap {
        /// Lower bound of the rejected range, in minor units.
        min: i64,
        /// Upper bound of the rejected range, in minor units.
        max: i64,
    },

    /// An HS code contains no usable digits.
    #[error("invalid HS code: {0}")]
    InvalidHsCode(String),

    /// A country code is not a two-letter ISO 3166-1 alpha-2 code.
    #[error("invalid country code: {0}")]
    InvalidCountryCode(String),

    /// Checked arithmetic failed.
    #[error("arithmetic error: {0}")]
    Arithmetic(#[from] ArithmeticError),
}

impl DomainError {
    /// Creates an invalid dimensions error.
    #[must_use]
    pub fn invalid_dimensions(message: impl Into<String>) -> Self {
        Self::InvalidDimensions(message.into())
    }

    /// Creates an invalid multiplier error.
    #[must_use]
    pub fn invalid_multiplier(message: impl Into<String>) -> Self {
        Self::InvalidMultiplier(message.into())
    }

    /// Creates an invalid insurance range error.
    #[must_use]
    pub fn invalid_insurance_range(message: impl Into<String>) -> Self {
        Self::InvalidInsuranceRange(message.into())
    }

    /// Returns true if this error was caused by caller input rather than configuration.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidDimensions(_) | Self::InvalidHsCode(_) | Self::InvalidCountryCode(_)
        )
    }

    /// Returns true if this error indicates a configuration defect.
    #[must_use]
    pub fn is_configuration_defect(&self) -> bool {
        matches!(
            self,
            Self::NoDefaultMultiplierConfigured
                | Self::InvalidMultiplier(_)
                | Self::InvalidInsuranceRange(_)
                | Self::InsuranceRangeOverlap { .. }
        )
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
