//! # Insurance Calculator
//!
//! Prices insurance from the policy store's band schedule. Never fails: a
//! store that cannot be read is treated as an empty schedule, which sends
//! every value through the fallback formula.

use crate::domain::entities::insurance_range::InsuranceSchedule;
use crate::domain::entities::landed_cost::InsuranceQuote;
use crate::domain::services::{InsuranceFormula, price_insurance};
use crate::domain::value_objects::Money;
use crate::infrastructure::persistence::InsurancePolicyRepository;
use std::sync::Arc;

/// Maps a declared value to an insurance premium.
#[derive(Debug, Clone)]
pub struct InsuranceCalculator {
    repository: Arc<dyn InsurancePolicyRepository>,
    formula: InsuranceFormula,
}

impl InsuranceCalculator {
    /// Creates a calculator with the given fallback formula.
    #[must_use]
    pub fn new(repository: Arc<dyn InsurancePolicyRepository>, formula: InsuranceFormula) -> Self {
        Self {
            repository,
            formula,
        }
    }

    /// Returns the fallback formula.
    #[must_use]
    pub fn formula(&self) -> &InsuranceFormula {
        &self.formula
    }

    /// Prices insurance for `declared_value`.
    ///
    /// An opt-out yields a zero premium. Negative values are priced as zero.
    pub async fn premium(&self, declared_value: Money, requested: bool) -> InsuranceQuote {
        let declared_value = declared_value.max(Money::ZERO);
        if !requested {
            return InsuranceQuote::not_requested(declared_value);
        }

        let schedule = match self.repository.insurance_schedule().await {
            Ok(schedule) => schedule,
            Err(e) => {
                tracing::warn!(error = %e, "insurance schedule unavailable, using formula");
                InsuranceSchedule::empty()
            }
        };

        price_insurance(&schedule, &self.formula, declared_value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::insurance_range::InsuranceRange;
    use crate::domain::value_objects::PremiumSource;
    use crate::infrastructure::persistence::{InMemoryPolicyStore, RepositoryError, RepositoryResult};
    use async_trait::async_trait;

    fn calculator(ranges: Vec<InsuranceRange>) -> InsuranceCalculator {
        let store = InMemoryPolicyStore::with_policies([], ranges).unwrap();
        InsuranceCalculator::new(Arc::new(store), InsuranceFormula::default())
    }

    fn range(min: i64, max: i64, premium: i64) -> InsuranceRange {
        InsuranceRange::new(
            Money::from_minor(min),
            Money::from_minor(max),
            Money::from_minor(premium),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn value_inside_band_gets_band_premium() {
        let calc = calculator(vec![range(5000, 15000, 300)]);
        let quote = calc.premium(Money::from_minor(10_000), true).await;
        assert_eq!(quote.premium, Money::from_minor(300));
        assert_eq!(quote.source, PremiumSource::Range);
    }

    #[tokio::test]
    async fn value_in_gap_uses_formula_with_floor() {
        let calc = calculator(vec![range(5000, 15000, 300)]);

        let small = calc.premium(Money::from_minor(1000), true).await;
        assert_eq!(small.premium, Money::from_minor(500));
        assert_eq!(small.source, PremiumSource::Formula);

        let large = calc.premium(Money::from_minor(100_000), true).await;
        assert_eq!(large.premium, Money::from_minor(2000));
    }

    #[tokio::test]
    async fn opt_out_is_zero() {
        let calc = calculator(vec![range(5000, 15000, 300)]);
        let quote = calc.premium(Money::from_minor(10_000), false).await;
        assert_eq!(quote.premium, Money::ZERO);
        assert_eq!(quote.source, PremiumSource::NotRequested);
    }

    #[derive(Debug)]
    struct BrokenStore;

    #[async_trait]
    impl InsurancePolicyRepository for BrokenStore {
        async fn insurance_schedule(&self) -> RepositoryResult<InsuranceSchedule> {
            Err(RepositoryError::connection("down"))
        }
    }

    #[tokio::test]
    async fn unreadable_store_uses_formula() {
        let calc = InsuranceCalculator::new(Arc::new(BrokenStore), InsuranceFormula::default());
        let quote = calc.premium(Money::from_minor(50_000), true).await;
        assert_eq!(quote.premium, Money::from_minor(1000));
        assert_eq!(quote.source, PremiumSource::Formula);
    }

    #[tokio::test]
    async fn negative_value_is_priced_as_zero() {
        let calc = calculator(vec![]);
        let quote = calc.premium(Money::from_minor(-100), true).await;
        assert_eq!(quote.declared_value, Money::ZERO);
        assert_eq!(quote.premium, Money::from_minor(500));
    }
}
