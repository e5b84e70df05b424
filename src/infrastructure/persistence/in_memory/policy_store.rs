//! # In-Memory Policy Store
//!
//! In-memory implementation of [`MultiplierPolicyRepository`] and
//! [`InsurancePolicyRepository`].
//!
//! Tiers are keyed by scope, so saving a tier for an existing scope
//! replaces it. Insurance writes are validated and applied atomically: a
//! write that would create overlapping bands is rejected and leaves the
//! schedule unchanged.

use crate::domain::entities::insurance_range::{InsuranceRange, InsuranceSchedule};
use crate::domain::entities::multiplier_tier::{MultiplierTier, TierScope};
use crate::domain::value_objects::{CountryCode, MultiplierTierKind, UserId};
use crate::infrastructure::persistence::traits::{
    InsurancePolicyRepository, MultiplierPolicyRepository, RepositoryResult,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct PolicyTables {
    tiers: HashMap<TierScope, MultiplierTier>,
    insurance: InsuranceSchedule,
}

/// Thread-safe in-memory policy tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPolicyStore {
    storage: Arc<RwLock<PolicyTables>>,
}

impl InMemoryPolicyStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-loaded with tiers and insurance bands.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if the bands overlap.
    pub fn with_policies(
        tiers: impl IntoIterator<Item = MultiplierTier>,
        ranges: Vec<InsuranceRange>,
    ) -> RepositoryResult<Self> {
        let tables = PolicyTables {
            tiers: tiers
                .into_iter()
                .map(|tier| (tier.scope().clone(), tier))
                .collect(),
            insurance: InsuranceSchedule::new(ranges)?,
        };
        Ok(Self {
            storage: Arc::new(RwLock::new(tables)),
        })
    }

    /// Saves a tier, replacing any tier with the same scope.
    pub async fn save_tier(&self, tier: MultiplierTier) {
        let mut storage = self.storage.write().await;
        storage.tiers.insert(tier.scope().clone(), tier);
    }

    /// Removes the tier for a scope; returns true if one existed.
    pub async fn remove_tier(&self, scope: &TierScope) -> bool {
        let mut storage = self.storage.write().await;
        storage.tiers.remove(scope).is_some()
    }

    /// Adds a band, or replaces the band with identical bounds.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if the band would overlap
    /// another; the schedule is left unchanged.
    pub async fn upsert_insurance_range(&self, range: InsuranceRange) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        storage.insurance.upsert(range)?;
        Ok(())
    }

    /// Replaces the whole band schedule.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Validation` if the new bands overlap; the
    /// old schedule stays in place.
    pub async fn replace_insurance_schedule(
        &self,
        ranges: Vec<InsuranceRange>,
    ) -> RepositoryResult<()> {
        let schedule = InsuranceSchedule::new(ranges)?;
        let mut storage = self.storage.write().await;
        storage.insurance = schedule;
        Ok(())
    }

    /// Returns the number of stored tiers.
    pub async fn tier_count(&self) -> usize {
        self.storage.read().await.tiers.len()
    }
}

#[async_trait]
impl MultiplierPolicyRepository for InMemoryPolicyStore {
    async fn user_tier(&self, user: &UserId) -> RepositoryResult<Option<MultiplierTier>> {
        let storage = self.storage.read().await;
        Ok(storage.tiers.get(&TierScope::User(user.clone())).cloned())
    }

    async fn country_tier(
        &self,
        country: &CountryCode,
    ) -> RepositoryResult<Option<MultiplierTier>> {
        let storage = self.storage.read().await;
        Ok(storage.tiers.get(&TierScope::Country(country.clone())).cloned())
    }

    async fn weight_tiers(&self) -> RepositoryResult<Vec<MultiplierTier>> {
        let storage = self.storage.read().await;
        Ok(storage
            .tiers
            .values()
            .filter(|tier| tier.kind() == MultiplierTierKind::WeightRange)
            .cloned()
            .collect())
    }

    async fn global_default(&self) -> RepositoryResult<Option<MultiplierTier>> {
        let storage = self.storage.read().await;
        Ok(storage.tiers.get(&TierScope::Global).cloned())
    }
}

#[async_trait]
impl InsurancePolicyRepository for InMemoryPolicyStore {
    async fn insurance_schedule(&self) -> RepositoryResult<InsuranceSchedule> {
        let storage = self.storage.read().await;
        Ok(storage.insurance.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Money;
    use crate::infrastructure::persistence::traits::RepositoryError;
    use rust_decimal::Decimal;

    fn range(min: i64, max: i64, premium: i64) -> InsuranceRange {
        InsuranceRange::new(
            Money::from_minor(min),
            Money::from_minor(max),
            Money::from_minor(premium),
        )
        .unwrap()
    }

    fn tier(scope: TierScope, factor: i64) -> MultiplierTier {
        MultiplierTier::new(scope, Decimal::new(factor, 2)).unwrap()
    }

    #[tokio::test]
    async fn new_store_is_empty() {
        let store = InMemoryPolicyStore::new();
        assert_eq!(store.tier_count().await, 0);
        assert!(store.global_default().await.unwrap().is_none());
        assert!(store.insurance_schedule().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn tiers_are_found_by_scope() {
        let au = CountryCode::new("AU").unwrap();
        let store = InMemoryPolicyStore::with_policies(
            [
                tier(TierScope::Global, 150),
                tier(TierScope::Country(au.clone()), 125),
                tier(TierScope::User(UserId::new("vip")), 110),
                tier(
                    TierScope::WeightRange {
                        min_kg: Decimal::ZERO,
                        max_kg: Some(Decimal::from(5)),
                    },
                    130,
                ),
            ],
            vec![],
        )
        .unwrap();

        assert_eq!(
            store.country_tier(&au).await.unwrap().unwrap().factor(),
            Decimal::new(125, 2)
        );
        assert!(store.user_tier(&UserId::new("vip")).await.unwrap().is_some());
        assert!(store.user_tier(&UserId::new("other")).await.unwrap().is_none());
        assert_eq!(store.weight_tiers().await.unwrap().len(), 1);
        assert!(store.global_default().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn save_replaces_same_scope() {
        let store = InMemoryPolicyStore::new();
        store.save_tier(tier(TierScope::Global, 150)).await;
        store.save_tier(tier(TierScope::Global, 140)).await;
        assert_eq!(store.tier_count().await, 1);
        assert_eq!(
            store.global_default().await.unwrap().unwrap().factor(),
            Decimal::new(140, 2)
        );
        assert!(store.remove_tier(&TierScope::Global).await);
        assert!(!store.remove_tier(&TierScope::Global).await);
    }

    #[tokio::test]
    async fn overlapping_band_is_rejected_atomically() {
        let store = InMemoryPolicyStore::with_policies([], vec![range(0, 4999, 150)]).unwrap();
        let err = store
            .upsert_insurance_range(range(4000, 9000, 250))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Validation(_)));
        assert_eq!(store.insurance_schedule().await.unwrap().ranges().len(), 1);
    }

    #[tokio::test]
    async fn replace_schedule_validates() {
        let store = InMemoryPolicyStore::with_policies([], vec![range(0, 4999, 150)]).unwrap();
        assert!(
            store
                .replace_insurance_schedule(vec![range(0, 100, 1), range(100, 200, 2)])
                .await
                .is_err()
        );
        store
            .replace_insurance_schedule(vec![range(0, 99, 1), range(100, 200, 2)])
            .await
            .unwrap();
        assert_eq!(store.insurance_schedule().await.unwrap().ranges().len(), 2);
    }

    #[test]
    fn construction_rejects_overlap() {
        let result = InMemoryPolicyStore::with_policies([], vec![range(0, 100, 1), range(50, 60, 2)]);
        assert!(result.is_err());
    }
}
