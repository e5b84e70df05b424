//! # Multiplier Resolver
//!
//! Reads candidate tiers from the policy store and picks one.
//!
//! All lookups run concurrently. A failed lookup is logged and treated as
//! "no tier", so it falls through to the next level; only a missing global
//! default is an error.

use crate::domain::entities::multiplier_tier::ResolvedMultiplier;
use crate::domain::entities::package::BillableWeight;
use crate::domain::errors::DomainResult;
use crate::domain::services::{TierCandidates, select_tier};
use crate::domain::value_objects::{CountryCode, UserId};
use crate::infrastructure::persistence::{MultiplierPolicyRepository, RepositoryResult};
use std::sync::Arc;

/// Resolves the markup factor for a shipment.
#[derive(Debug, Clone)]
pub struct MultiplierResolver {
    repository: Arc<dyn MultiplierPolicyRepository>,
}

impl MultiplierResolver {
    /// Creates a resolver over a policy store.
    #[must_use]
    pub fn new(repository: Arc<dyn MultiplierPolicyRepository>) -> Self {
        Self { repository }
    }

    /// Resolves the factor for a (user, destination, weight) triple.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NoDefaultMultiplierConfigured` if no tier
    /// applies and the global default is absent.
    pub async fn resolve(
        &self,
        user: Option<&UserId>,
        destination: &CountryCode,
        weight: &BillableWeight,
    ) -> DomainResult<ResolvedMultiplier> {
        let repo = &self.repository;
        let (user, country, weight_ranges, global_default) = tokio::join!(
            async {
                match user {
                    Some(user) => or_skip("user", repo.user_tier(user).await).flatten(),
                    None => None,
                }
            },
            async { or_skip("country", repo.country_tier(destination).await).flatten() },
            async { or_skip("weight_range", repo.weight_tiers().await).unwrap_or_default() },
            async { or_skip("global_default", repo.global_default().await).flatten() },
        );

        let candidates = TierCandidates {
            user,
            country,
            weight_ranges,
            global_default,
        };

        let resolved = select_tier(&candidates, weight.billable_kg())?;
        tracing::debug!(
            factor = %resolved.factor,
            tier = %resolved.tier,
            scope = %resolved.scope,
            "multiplier resolved"
        );
        Ok(resolved)
    }
}

/// Logs a failed tier read and turns it into a miss.
fn or_skip<T>(tier: &'static str, result: RepositoryResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(tier, error = %e, "tier lookup failed, falling through");
            None
        }
    }
}
