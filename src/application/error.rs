//! # Application Errors
//!
//! The engine's public error type.
//!
//! Provider-level failures (carriers, currency feeds, duty sources, policy
//! reads) are caught at their component boundary and never appear here.
//! What remains is the short list of conditions under which no price can
//! be shown.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── Domain(DomainError)   - bad input or a policy table defect
//! ├── NoRatesAvailable      - no carrier produced a usable option
//! ├── Configuration(String) - wiring failed at startup
//! └── Internal(String)      - a task died unexpectedly
//! ```
//!
//! # Examples
//!
//! ```
//! use landed_cost::application::error::ApplicationError;
//!
//! let err = ApplicationError::no_rates_available(3, vec!["ups: timeout".to_string()]);
//! assert!(err.is_no_rates_available());
//! ```

use crate::domain::errors::DomainError;
use thiserror::Error;

/// Application layer error.
#[derive(Debug, Clone, Error)]
pub enum ApplicationError {
    /// Domain error from input validation or policy rules.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Every carrier failed or returned nothing usable.
    #[error("no rates available from {providers_queried} providers")]
    NoRatesAvailable {
        /// Number of providers queried.
        providers_queried: usize,
        /// One message per failed provider.
        failures: Vec<String>,
    },

    /// Settings could not be turned into a working engine.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Creates a no rates available error.
    #[must_use]
    pub fn no_rates_available(providers_queried: usize, failures: Vec<String>) -> Self {
        Self::NoRatesAvailable {
            providers_queried,
            failures,
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if no carrier produced a usable option.
    #[must_use]
    pub fn is_no_rates_available(&self) -> bool {
        matches!(self, Self::NoRatesAvailable { .. })
    }

    /// Returns true if the caller's input was rejected.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::Domain(e) if e.is_invalid_input())
    }

    /// Returns true if this error points at operator configuration.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        match self {
            Self::Domain(e) => e.is_configuration_defect(),
            Self::Configuration(_) => true,
            _ => false,
        }
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
