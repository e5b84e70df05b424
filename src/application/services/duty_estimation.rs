//! # Duty and Tax Estimation
//!
//! Estimates the import levy for a shipment by walking an ordered chain of
//! rate sources.
//!
//! # Chain
//!
//! ```text
//! official tariff ─miss/err─▶ estimation provider ─miss/err─▶ destination default
//!                 ─miss/err─▶ configured terminal percent
//! ```
//!
//! The first source that returns a rate wins and its provenance is kept in
//! the breakdown. Nothing here fails: duty is advisory until customs
//! paperwork is confirmed.
//!
//! # Arithmetic
//!
//! For import duty the base and the standing surcharge are rounded
//! separately and then summed:
//!
//! ```text
//! total = round(value × base%) + round(value × surcharge%)
//! ```

use crate::domain::entities::landed_cost::DutyBreakdown;
use crate::domain::value_objects::{
    ArithmeticResult, CountryCode, DEFAULT_HS_DIGITS, HsCode, LevyKind, Money, RateSource,
};
use crate::infrastructure::duty::{DefaultPercentSource, DutyQuery, DutyRateSource};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Which destinations levy what, and the standing policy percents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyPolicy {
    /// Shipments to this country are domestic and never levied.
    pub home_country: Option<CountryCode>,
    /// Flat surcharge stacked on import duty regardless of classification.
    pub surcharge_percent: Decimal,
    /// Levy regime per destination; unlisted destinations are not levied.
    pub regimes: HashMap<CountryCode, LevyKind>,
    /// Percent used when every source in the chain comes up empty.
    pub terminal_percent: Decimal,
    /// Canonical HS code length.
    pub hs_digits: usize,
}

impl Default for DutyPolicy {
    fn default() -> Self {
        Self {
            home_country: None,
            surcharge_percent: Decimal::ZERO,
            regimes: HashMap::new(),
            terminal_percent: Decimal::ZERO,
            hs_digits: DEFAULT_HS_DIGITS,
        }
    }
}

impl DutyPolicy {
    /// Returns the levy regime for a destination.
    #[must_use]
    pub fn levy_for(&self, destination: &CountryCode) -> LevyKind {
        if self.home_country.as_ref() == Some(destination) {
            return LevyKind::NotApplicable;
        }
        self.regimes
            .get(destination)
            .copied()
            .unwrap_or(LevyKind::NotApplicable)
    }
}

/// Estimates duty or VAT for one shipment.
#[derive(Debug, Clone)]
pub struct DutyTaxEstimator {
    rate_sources: Vec<Arc<dyn DutyRateSource>>,
    defaults: Arc<dyn DefaultPercentSource>,
    policy: DutyPolicy,
}

impl DutyTaxEstimator {
    /// Creates an estimator. `rate_sources` are tried in order.
    #[must_use]
    pub fn new(
        rate_sources: Vec<Arc<dyn DutyRateSource>>,
        defaults: Arc<dyn DefaultPercentSource>,
        policy: DutyPolicy,
    ) -> Self {
        Self {
            rate_sources,
            defaults,
            policy,
        }
    }

    /// Returns the policy.
    #[must_use]
    pub fn policy(&self) -> &DutyPolicy {
        &self.policy
    }

    /// Estimates the levy on `customs_value`.
    ///
    /// An HS code that cannot be parsed is treated as absent. A negative
    /// value is levied as zero.
    pub async fn estimate(
        &self,
        hs_code: Option<&str>,
        customs_value: Money,
        destination: &CountryCode,
    ) -> DutyBreakdown {
        let customs_value = customs_value.max(Money::ZERO);
        let kind = self.policy.levy_for(destination);
        if kind == LevyKind::NotApplicable {
            return DutyBreakdown::not_applicable(customs_value);
        }

        let hs_code = hs_code.and_then(|raw| {
            HsCode::canonicalize(raw, self.policy.hs_digits)
                .inspect_err(|e| tracing::warn!(error = %e, "ignoring unusable HS code"))
                .ok()
        });

        let (base_percent, rate_source) = match (&hs_code, kind) {
            // Unclassified goods carry no base duty; the surcharge still applies.
            (None, LevyKind::ImportDuty) => (Decimal::ZERO, None),
            _ => {
                let (percent, source) = self.resolve_percent(hs_code.as_ref(), destination, kind).await;
                (percent, Some(source))
            }
        };

        let surcharge_percent = match kind {
            LevyKind::ImportDuty => self.policy.surcharge_percent,
            _ => Decimal::ZERO,
        };

        let base = saturating("base", customs_value.percent(base_percent));
        let surcharge = saturating("surcharge", customs_value.percent(surcharge_percent));
        let total = saturating("total", base.safe_add(surcharge));

        DutyBreakdown {
            kind,
            customs_value,
            base,
            surcharge,
            total,
            base_percent,
            surcharge_percent,
            rate_source,
            hs_code: hs_code.as_ref().map(|code| code.as_str().to_string()),
            hs_code_truncated: hs_code.as_ref().is_some_and(HsCode::was_truncated),
        }
    }

    /// Walks the chain and returns the first usable percent.
    async fn resolve_percent(
        &self,
        hs_code: Option<&HsCode>,
        destination: &CountryCode,
        kind: LevyKind,
    ) -> (Decimal, RateSource) {
        if let Some(hs_code) = hs_code {
            let query = DutyQuery {
                hs_code,
                destination,
                kind,
            };
            for source in &self.rate_sources {
                match source.lookup_duty_rate(query).await {
                    Ok(Some(record)) if !record.base_rate_percent.is_sign_negative() => {
                        tracing::debug!(
                            source = source.name(),
                            hs_code = %record.hs_code,
                            percent = %record.base_rate_percent,
                            "duty rate found"
                        );
                        return (record.base_rate_percent, record.source);
                    }
                    Ok(Some(record)) => {
                        tracing::warn!(
                            source = source.name(),
                            percent = %record.base_rate_percent,
                            "negative duty rate ignored, trying next"
                        );
                    }
                    Ok(None) => {
                        tracing::debug!(source = source.name(), hs_code = %hs_code, "no duty rate, trying next");
                    }
                    Err(e) => {
                        tracing::warn!(source = source.name(), error = %e, "duty source failed, trying next");
                    }
                }
            }
        }

        match self.defaults.default_percent(destination, kind).await {
            Ok(Some(percent)) if !percent.is_sign_negative() => return (percent, RateSource::Default),
            Ok(_) => {
                tracing::debug!(destination = %destination, kind = %kind, "no destination default");
            }
            Err(e) => {
                tracing::warn!(destination = %destination, error = %e, "destination defaults failed");
            }
        }

        tracing::warn!(
            destination = %destination,
            percent = %self.policy.terminal_percent,
            "duty chain exhausted, using terminal percent"
        );
        (self.policy.terminal_percent, RateSource::Default)
    }
}

fn saturating(component: &'static str, result: ArithmeticResult<Money>) -> Money {
    result.unwrap_or_else(|e| {
        tracing::warn!(component, error = %e, "duty amount overflowed, saturating");
        Money::from_minor(i64::MAX)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infrastructure::duty::{
        DestinationDefault, DestinationDefaults, DutyRateRecord, DutySourceError,
        DutySourceResult, InMemoryTariffTable, TariffEntry,
    };
    use crate::infrastructure::http_client::HttpError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cc(code: &str) -> CountryCode {
        CountryCode::new(code).unwrap()
    }

    fn policy() -> DutyPolicy {
        DutyPolicy {
            home_country: Some(cc("US")),
            surcharge_percent: Decimal::from(10),
            regimes: HashMap::from([
                (cc("CN"), LevyKind::ImportDuty),
                (cc("GB"), LevyKind::Vat),
            ]),
            terminal_percent: Decimal::from(5),
            hs_digits: 6,
        }
    }

    fn tariff() -> Arc<dyn DutyRateSource> {
        Arc::new(InMemoryTariffTable::from_entries([TariffEntry {
            destination: cc("CN"),
            hs_code: "847130".to_string(),
            percent: Decimal::new(75, 1),
        }]))
    }

    fn defaults() -> Arc<dyn DefaultPercentSource> {
        Arc::new(DestinationDefaults::new([
            DestinationDefault {
                destination: cc("CN"),
                duty_percent: Some(Decimal::from(8)),
                vat_percent: None,
            },
            DestinationDefault {
                destination: cc("GB"),
                duty_percent: None,
                vat_percent: Some(Decimal::from(20)),
            },
        ]))
    }

    #[derive(Debug, Default)]
    struct CountingSource {
        calls: AtomicUsize,
        rate: Option<Decimal>,
        fail: bool,
    }

    #[async_trait]
    impl DutyRateSource for CountingSource {
        fn name(&self) -> &str {
            "counting"
        }

        async fn lookup_duty_rate(
            &self,
            query: DutyQuery<'_>,
        ) -> DutySourceResult<Option<DutyRateRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(DutySourceError::Http(HttpError::Timeout));
            }
            Ok(self.rate.map(|rate| DutyRateRecord {
                hs_code: query.hs_code.as_str().to_string(),
                base_rate_percent: rate,
                source: RateSource::Estimated,
            }))
        }
    }

    #[tokio::test]
    async fn official_rate_with_surcharge_rounded_separately() {
        let estimator = DutyTaxEstimator::new(vec![tariff()], defaults(), policy());

        let duty = estimator
            .estimate(Some("8471.30.0100"), Money::from_minor(10_005), &cc("CN"))
            .await;

        assert_eq!(duty.kind, LevyKind::ImportDuty);
        assert_eq!(duty.rate_source, Some(RateSource::Official));
        // 10005 × 7.5% = 750.375 → 750; 10005 × 10% = 1000.5 → 1001
        assert_eq!(duty.base, Money::from_minor(750));
        assert_eq!(duty.surcharge, Money::from_minor(1001));
        assert_eq!(duty.total, Money::from_minor(1751));
        assert_eq!(duty.hs_code.as_deref(), Some("847130"));
        assert!(duty.hs_code_truncated);
    }

    #[tokio::test]
    async fn absent_hs_code_still_applies_surcharge() {
        let estimator = DutyTaxEstimator::new(vec![tariff()], defaults(), policy());

        let duty = estimator.estimate(None, Money::from_minor(20_000), &cc("CN")).await;

        assert_eq!(duty.base, Money::ZERO);
        assert_eq!(duty.surcharge, Money::from_minor(2000));
        assert_eq!(duty.total, Money::from_minor(2000));
        assert!(duty.rate_source.is_none());
    }

    #[tokio::test]
    async fn unparseable_hs_code_is_treated_as_absent() {
        let estimator = DutyTaxEstimator::new(vec![tariff()], defaults(), policy());

        let duty = estimator
            .estimate(Some("not-a-code"), Money::from_minor(20_000), &cc("CN"))
            .await;

        assert_eq!(duty.base, Money::ZERO);
        assert!(duty.hs_code.is_none());
    }

    #[tokio::test]
    async fn failing_sources_fall_through_in_order() {
        let failing = Arc::new(CountingSource {
            fail: true,
            ..CountingSource::default()
        });
        let estimating = Arc::new(CountingSource {
            rate: Some(Decimal::from(3)),
            ..CountingSource::default()
        });
        let never = Arc::new(CountingSource {
            rate: Some(Decimal::from(99)),
            ..CountingSource::default()
        });

        let estimator = DutyTaxEstimator::new(
            vec![failing.clone(), estimating.clone(), never.clone()],
            defaults(),
            policy(),
        );
        let duty = estimator
            .estimate(Some("010121"), Money::from_minor(10_000), &cc("CN"))
            .await;

        assert_eq!(duty.rate_source, Some(RateSource::Estimated));
        assert_eq!(duty.base, Money::from_minor(300));
        assert_eq!(failing.calls.load(Ordering::SeqCst), 1);
        assert_eq!(estimating.calls.load(Ordering::SeqCst), 1);
        assert_eq!(never.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn misses_fall_back_to_destination_default() {
        let estimator = DutyTaxEstimator::new(
            vec![tariff(), Arc::new(CountingSource::default())],
            defaults(),
            policy(),
        );

        let duty = estimator
            .estimate(Some("999999"), Money::from_minor(10_000), &cc("CN"))
            .await;

        assert_eq!(duty.rate_source, Some(RateSource::Default));
        assert_eq!(duty.base_percent, Decimal::from(8));
        assert_eq!(duty.base, Money::from_minor(800));
    }

    #[tokio::test]
    async fn exhausted_chain_uses_terminal_percent() {
        let mut policy = policy();
        policy.regimes.insert(cc("BR"), LevyKind::ImportDuty);
        let estimator = DutyTaxEstimator::new(vec![tariff()], defaults(), policy);

        let duty = estimator
            .estimate(Some("999999"), Money::from_minor(10_000), &cc("BR"))
            .await;

        assert_eq!(duty.rate_source, Some(RateSource::Default));
        assert_eq!(duty.base_percent, Decimal::from(5));
        assert_eq!(duty.total, Money::from_minor(1500));
    }

    #[tokio::test]
    async fn vat_destination_resolves_single_percent() {
        let estimator = DutyTaxEstimator::new(vec![tariff()], defaults(), policy());

        let vat = estimator.estimate(None, Money::from_minor(10_000), &cc("GB")).await;

        assert_eq!(vat.kind, LevyKind::Vat);
        assert_eq!(vat.base, Money::from_minor(2000));
        assert_eq!(vat.surcharge, Money::ZERO);
        assert_eq!(vat.surcharge_percent, Decimal::ZERO);
        assert_eq!(vat.total, Money::from_minor(2000));
        assert_eq!(vat.rate_source, Some(RateSource::Default));
    }

    #[tokio::test]
    async fn domestic_and_unlisted_destinations_are_not_levied() {
        let estimator = DutyTaxEstimator::new(vec![tariff()], defaults(), policy());

        let domestic = estimator
            .estimate(Some("847130"), Money::from_minor(10_000), &cc("US"))
            .await;
        assert!(domestic.is_not_applicable());
        assert_eq!(domestic.total, Money::ZERO);

        let unlisted = estimator.estimate(None, Money::from_minor(10_000), &cc("NZ")).await;
        assert!(unlisted.is_not_applicable());
    }

    #[tokio::test]
    async fn negative_value_is_levied_as_zero() {
        let estimator = DutyTaxEstimator::new(vec![tariff()], defaults(), policy());

        let duty = estimator
            .estimate(Some("847130"), Money::from_minor(-10_000), &cc("CN"))
            .await;

        assert_eq!(duty.customs_value, Money::ZERO);
        assert_eq!(duty.base, Money::ZERO);
        assert_eq!(duty.surcharge, Money::ZERO);
        assert_eq!(duty.total, Money::ZERO);
    }

    #[tokio::test]
    async fn overflowing_levy_saturates() {
        let policy = DutyPolicy {
            surcharge_percent: Decimal::ONE_HUNDRED,
            ..policy()
        };
        let estimator = DutyTaxEstimator::new(vec![tariff()], defaults(), policy);

        let duty = estimator
            .estimate(Some("847130"), Money::from_minor(i64::MAX), &cc("CN"))
            .await;

        // 7.5% and 100% of i64::MAX each fit; their sum does not
        assert!(duty.base.is_positive());
        assert!(duty.surcharge.is_positive());
        assert_eq!(duty.total, Money::from_minor(i64::MAX));
    }

    #[test]
    fn levy_for_home_country_overrides_regime() {
        let mut policy = policy();
        policy.regimes.insert(cc("US"), LevyKind::ImportDuty);
        assert_eq!(policy.levy_for(&cc("US")), LevyKind::NotApplicable);
        assert_eq!(policy.levy_for(&cc("CN")), LevyKind::ImportDuty);
    }
}
