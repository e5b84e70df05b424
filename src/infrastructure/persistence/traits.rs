//! # Policy Repository Traits
//!
//! Read ports for the pricing policy tables owned by an external
//! configuration store.
//!
//! # Available Repositories
//!
//! - [`MultiplierPolicyRepository`]: multiplier tiers by scope
//! - [`InsurancePolicyRepository`]: the insurance band schedule
//!
//! # Examples
//!
//! ```ignore
//! use landed_cost::infrastructure::persistence::traits::MultiplierPolicyRepository;
//!
//! async fn has_default(repo: &impl MultiplierPolicyRepository) -> bool {
//!     matches!(repo.global_default().await, Ok(Some(_)))
//! }
//! ```

use crate::domain::entities::insurance_range::InsuranceSchedule;
use crate::domain::entities::multiplier_tier::MultiplierTier;
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{CountryCode, UserId};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Entity not found.
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// A write would break a policy invariant.
    #[error("Validation error: {0}")]
    Validation(#[from] DomainError),

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query error.
    #[error("Query error: {0}")]
    Query(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RepositoryError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error.
    #[must_use]
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true if the store could not be reached.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Read access to multiplier tiers.
///
/// Each lookup is independent; the resolver treats a failed lookup the
/// same as a missing tier and moves on to the next one.
#[async_trait]
pub trait MultiplierPolicyRepository: Send + Sync + fmt::Debug {
    /// Returns the override for a user, active or not.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the lookup fails.
    async fn user_tier(&self, user: &UserId) -> RepositoryResult<Option<MultiplierTier>>;

    /// Returns the override for a destination country, active or not.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the lookup fails.
    async fn country_tier(&self, country: &CountryCode)
    -> RepositoryResult<Option<MultiplierTier>>;

    /// Returns every weight-range tier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the lookup fails.
    async fn weight_tiers(&self) -> RepositoryResult<Vec<MultiplierTier>>;

    /// Returns the global default tier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the lookup fails.
    async fn global_default(&self) -> RepositoryResult<Option<MultiplierTier>>;
}

/// Read access to insurance bands.
#[async_trait]
pub trait InsurancePolicyRepository: Send + Sync + fmt::Debug {
    /// Returns the current band schedule.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the lookup fails.
    async fn insurance_schedule(&self) -> RepositoryResult<InsuranceSchedule>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = RepositoryError::not_found("MultiplierTier", "user:u-1");
        let display = err.to_string();
        assert!(display.contains("MultiplierTier"));
        assert!(display.contains("user:u-1"));
    }

    #[test]
    fn validation_wraps_domain_error() {
        let err: RepositoryError = DomainError::InsuranceRangeOverlap { min: 1, max: 2 }.into();
        assert!(matches!(err, RepositoryError::Validation(_)));
        assert!(!err.is_unavailable());
    }

    #[test]
    fn connection_is_unavailable() {
        assert!(RepositoryError::connection("refused").is_unavailable());
    }
}
