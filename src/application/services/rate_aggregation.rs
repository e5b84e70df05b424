//! # Rate Aggregation
//!
//! Fans a shipment out to every configured carrier and turns what comes
//! back into one ranked list.
//!
//! This module provides the [`RateAggregator`], which queries providers
//! concurrently under a shared deadline, drops failed or late providers,
//! normalizes and deduplicates their quotes, applies the resolved
//! multiplier and ranks the result.
//!
//! # Pipeline
//!
//! ```text
//! providers ──spawn──▶ quotes ──filter blocked──▶ price × multiplier
//!           ──drop non-positive──▶ dedupe per provider ──▶ rank
//! ```

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::ranking_strategy::{RankedOption, RankingStrategy};
use crate::domain::entities::package::BillableWeight;
use crate::domain::entities::rate_option::{AggregationStats, CarrierQuote, RateOption};
use crate::domain::value_objects::{CountryCode, ProviderId};
use crate::infrastructure::carriers::{CarrierError, CarrierRateProvider};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, timeout_at};

/// Configuration for rate aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationConfig {
    /// Shared deadline for the whole fan-out in milliseconds.
    pub timeout_ms: u64,
    /// Per-provider timeout in milliseconds, unless the provider sets its own.
    pub per_provider_timeout_ms: u64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            per_provider_timeout_ms: 5_000,
        }
    }
}

impl AggregationConfig {
    /// Creates a new configuration with the specified overall timeout.
    #[must_use]
    pub fn with_timeout(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            ..Default::default()
        }
    }

    /// Sets the per-provider timeout.
    #[must_use]
    pub fn with_per_provider_timeout(mut self, timeout_ms: u64) -> Self {
        self.per_provider_timeout_ms = timeout_ms;
        self
    }
}

/// Services that may not be offered to a destination.
///
/// Service names are matched case-insensitively after trimming.
#[derive(Debug, Clone, Default)]
pub struct ServiceRestrictions {
    blocked: HashMap<CountryCode, HashSet<String>>,
}

impl ServiceRestrictions {
    /// Creates an empty restriction set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks a service for a destination.
    #[must_use]
    pub fn block(mut self, destination: CountryCode, service: &str) -> Self {
        self.blocked
            .entry(destination)
            .or_default()
            .insert(service.trim().to_lowercase());
        self
    }

    /// Returns true if `service_key` is blocked for `destination`.
    #[must_use]
    pub fn is_blocked(&self, destination: &CountryCode, service_key: &str) -> bool {
        self.blocked
            .get(destination)
            .is_some_and(|services| services.contains(service_key))
    }
}

/// Ranked options plus the counters that explain them.
#[derive(Debug, Clone)]
pub struct AggregatedRates {
    /// Options, best first.
    pub ranked: Vec<RankedOption>,
    /// Audit counters.
    pub stats: AggregationStats,
}

impl AggregatedRates {
    /// Returns the best option, if any.
    #[must_use]
    pub fn best(&self) -> Option<&RankedOption> {
        self.ranked.first()
    }
}

type ProviderOutcome = (usize, ProviderId, Result<Vec<CarrierQuote>, CarrierError>);

/// Collects and ranks carrier rates.
#[derive(Debug)]
pub struct RateAggregator {
    providers: Vec<Arc<dyn CarrierRateProvider>>,
    ranking_strategy: Arc<dyn RankingStrategy>,
    restrictions: ServiceRestrictions,
    config: AggregationConfig,
}

impl RateAggregator {
    /// Creates a new aggregator. Provider order is the final ranking tie-breaker.
    #[must_use]
    pub fn new(
        providers: Vec<Arc<dyn CarrierRateProvider>>,
        ranking_strategy: Arc<dyn RankingStrategy>,
        config: AggregationConfig,
    ) -> Self {
        Self {
            providers,
            ranking_strategy,
            restrictions: ServiceRestrictions::default(),
            config,
        }
    }

    /// Sets the service restrictions.
    #[must_use]
    pub fn with_restrictions(mut self, restrictions: ServiceRestrictions) -> Self {
        self.restrictions = restrictions;
        self
    }

    /// Returns the number of configured providers.
    #[must_use]
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Returns the current configuration.
    #[must_use]
    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    /// Returns the ranking strategy name.
    #[must_use]
    pub fn ranking_strategy_name(&self) -> &'static str {
        self.ranking_strategy.name()
    }

    /// Queries every provider and ranks the usable options.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NoRatesAvailable` if no provider yields a
    /// usable option.
    pub async fn aggregate(
        &self,
        destination: &CountryCode,
        weight: &BillableWeight,
        multiplier: Decimal,
    ) -> ApplicationResult<AggregatedRates> {
        let mut stats = AggregationStats {
            providers_queried: self.providers.len(),
            ..AggregationStats::default()
        };

        let outcomes = self.collect_from_providers(destination, weight).await;

        // (provider index, service key) -> position in `options`
        let mut seen: HashMap<(usize, String), usize> = HashMap::new();
        let mut options: Vec<RateOption> = Vec::new();

        for (index, provider_id, outcome) in outcomes {
            let quotes = match outcome {
                Ok(quotes) => quotes,
                Err(e) => {
                    tracing::warn!(
                        provider = %provider_id,
                        error = %e,
                        transient = e.is_retryable(),
                        "carrier provider dropped"
                    );
                    stats.failures.push(format!("{provider_id}: {e}"));
                    continue;
                }
            };

            stats.providers_responded += 1;
            stats.options_collected += quotes.len();

            for quote in quotes {
                let key = quote.service_key();
                if self.restrictions.is_blocked(destination, &key) {
                    tracing::debug!(
                        provider = %provider_id,
                        service = %quote.service_name(),
                        destination = %destination,
                        "service blocked for destination"
                    );
                    stats.options_discarded += 1;
                    continue;
                }

                let option = match RateOption::priced(provider_id.clone(), index, quote, multiplier)
                {
                    Ok(option) => option,
                    Err(e) => {
                        tracing::warn!(provider = %provider_id, error = %e, "could not price quote");
                        stats.options_discarded += 1;
                        continue;
                    }
                };

                if !option.final_price().is_positive() {
                    stats.options_discarded += 1;
                    continue;
                }

                match seen.get(&(index, key.clone())) {
                    Some(&position) => {
                        stats.options_discarded += 1;
                        if let Some(existing) = options.get_mut(position)
                            && option.final_price() < existing.final_price()
                        {
                            *existing = option;
                        }
                    }
                    None => {
                        seen.insert((index, key), options.len());
                        options.push(option);
                    }
                }
            }
        }

        if options.is_empty() {
            return Err(ApplicationError::no_rates_available(
                stats.providers_queried,
                stats.failures,
            ));
        }

        tracing::debug!(
            options = options.len(),
            responded = stats.providers_responded,
            queried = stats.providers_queried,
            strategy = self.ranking_strategy.name(),
            "rates aggregated"
        );

        Ok(AggregatedRates {
            ranked: self.ranking_strategy.rank(options),
            stats,
        })
    }

    /// Queries all providers concurrently, returning outcomes in provider order.
    async fn collect_from_providers(
        &self,
        destination: &CountryCode,
        weight: &BillableWeight,
    ) -> Vec<ProviderOutcome> {
        let deadline = Instant::now() + Duration::from_millis(self.config.timeout_ms);
        let mut handles = Vec::with_capacity(self.providers.len());

        for (index, provider) in self.providers.iter().enumerate() {
            let provider = Arc::clone(provider);
            let provider_id = provider.provider_id().clone();
            let destination = destination.clone();
            let weight = *weight;
            let budget_ms = provider
                .timeout_ms()
                .unwrap_or(self.config.per_provider_timeout_ms);
            let provider_deadline = deadline.min(Instant::now() + Duration::from_millis(budget_ms));

            let handle = tokio::spawn(async move {
                match timeout_at(provider_deadline, provider.quote(&destination, &weight)).await {
                    Ok(result) => result,
                    Err(_) => Err(CarrierError::timeout_with_duration(
                        "provider missed the deadline",
                        budget_ms,
                    )),
                }
            });

            handles.push((index, provider_id, handle));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for (index, provider_id, handle) in handles {
            let outcome = match handle.await {
                Ok(result) => result,
                Err(e) => Err(CarrierError::internal_error(format!("task failed: {e}"))),
            };
            outcomes.push((index, provider_id, outcome));
        }

        outcomes
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::application::services::ranking_strategy::CheapestFirstStrategy;
    use crate::domain::services::normalize_raw;
    use crate::domain::value_objects::Money;
    use crate::infrastructure::carriers::CarrierResult;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct MockCarrier {
        id: ProviderId,
        quotes: Option<Vec<CarrierQuote>>,
        delay_ms: u64,
        calls: AtomicUsize,
    }

    impl MockCarrier {
        fn successful(id: &str, quotes: Vec<CarrierQuote>) -> Self {
            Self {
                id: ProviderId::new(id),
                quotes: Some(quotes),
                delay_ms: 0,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(id: &str) -> Self {
            Self {
                id: ProviderId::new(id),
                quotes: None,
                delay_ms: 0,
                calls: AtomicUsize::new(0),
            }
        }

        fn slow(id: &str, delay_ms: u64, quotes: Vec<CarrierQuote>) -> Self {
            Self {
                id: ProviderId::new(id),
                quotes: Some(quotes),
                delay_ms,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CarrierRateProvider for MockCarrier {
        fn provider_id(&self) -> &ProviderId {
            &self.id
        }

        async fn quote(
            &self,
            _destination: &CountryCode,
            _weight: &BillableWeight,
        ) -> CarrierResult<Vec<CarrierQuote>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            }
            self.quotes
                .clone()
                .ok_or_else(|| CarrierError::connection("connection refused"))
        }
    }

    fn quote(service: &str, base: i64, surcharge: i64) -> CarrierQuote {
        CarrierQuote::new(service, Money::from_minor(base), Money::from_minor(surcharge))
    }

    fn au() -> CountryCode {
        CountryCode::new("AU").unwrap()
    }

    fn weight() -> BillableWeight {
        normalize_raw(30.0, 20.0, 15.0, 2.0).unwrap()
    }

    fn aggregator(providers: Vec<Arc<dyn CarrierRateProvider>>) -> RateAggregator {
        RateAggregator::new(
            providers,
            Arc::new(CheapestFirstStrategy::new()),
            AggregationConfig::with_timeout(1_000).with_per_provider_timeout(500),
        )
    }

    #[tokio::test]
    async fn ranks_all_provider_options_cheapest_first() {
        let agg = aggregator(vec![
            Arc::new(MockCarrier::successful("dhl", vec![quote("Express", 1500, 100)])),
            Arc::new(MockCarrier::successful("ups", vec![quote("Ground", 900, 50)])),
        ]);

        let result = agg.aggregate(&au(), &weight(), Decimal::ONE).await.unwrap();

        assert_eq!(result.ranked.len(), 2);
        assert_eq!(result.best().unwrap().option.provider_id().as_str(), "ups");
        assert_eq!(result.stats.providers_queried, 2);
        assert_eq!(result.stats.providers_responded, 2);
        assert!(result.stats.failures.is_empty());
    }

    #[tokio::test]
    async fn one_of_three_succeeding_is_enough() {
        let agg = aggregator(vec![
            Arc::new(MockCarrier::failing("fedex")),
            Arc::new(MockCarrier::successful(
                "ups",
                vec![quote("Saver", 2000, 0), quote("Ground", 1000, 0)],
            )),
            Arc::new(MockCarrier::failing("dhl")),
        ]);

        let result = agg.aggregate(&au(), &weight(), Decimal::ONE).await.unwrap();

        assert_eq!(result.ranked.len(), 2);
        assert!(
            result
                .ranked
                .iter()
                .all(|r| r.option.provider_id().as_str() == "ups")
        );
        assert_eq!(result.ranked[0].option.final_price(), Money::from_minor(1000));
        assert_eq!(result.ranked[1].option.final_price(), Money::from_minor(2000));
        assert_eq!(result.stats.failures.len(), 2);
        assert_eq!(result.stats.providers_responded, 1);
    }

    #[tokio::test]
    async fn all_failing_is_no_rates_available() {
        let agg = aggregator(vec![
            Arc::new(MockCarrier::failing("fedex")),
            Arc::new(MockCarrier::failing("dhl")),
        ]);

        let err = agg.aggregate(&au(), &weight(), Decimal::ONE).await.unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::NoRatesAvailable { providers_queried: 2, ref failures } if failures.len() == 2
        ));
    }

    #[tokio::test]
    async fn no_providers_is_no_rates_available() {
        let agg = aggregator(vec![]);
        let err = agg.aggregate(&au(), &weight(), Decimal::ONE).await.unwrap_err();
        assert!(err.is_no_rates_available());
    }

    #[tokio::test]
    async fn empty_responses_are_no_rates_available() {
        let agg = aggregator(vec![Arc::new(MockCarrier::successful("ups", vec![]))]);
        let err = agg.aggregate(&au(), &weight(), Decimal::ONE).await.unwrap_err();
        assert!(err.is_no_rates_available());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_provider_does_not_delay_others() {
        let slow = Arc::new(MockCarrier::slow("slow", 10_000, vec![quote("Cheap", 1, 0)]));
        let agg = aggregator(vec![
            slow.clone(),
            Arc::new(MockCarrier::successful("fast", vec![quote("Ground", 1000, 0)])),
        ]);

        let started = Instant::now();
        let result = agg.aggregate(&au(), &weight(), Decimal::ONE).await.unwrap();

        assert!(started.elapsed() <= Duration::from_millis(600));
        assert_eq!(result.ranked.len(), 1);
        assert_eq!(result.ranked[0].option.provider_id().as_str(), "fast");
        assert_eq!(slow.calls.load(Ordering::SeqCst), 1);
        assert!(result.stats.failures[0].contains("slow"));
    }

    #[tokio::test]
    async fn multiplier_applies_to_components() {
        let agg = aggregator(vec![Arc::new(MockCarrier::successful(
            "ups",
            vec![quote("Ground", 1000, 0)],
        ))]);

        let result = agg
            .aggregate(&au(), &weight(), Decimal::new(125, 2))
            .await
            .unwrap();

        let option = &result.ranked[0].option;
        assert_eq!(option.base_price(), Money::from_minor(1000));
        assert_eq!(option.final_price(), Money::from_minor(1250));
    }

    #[tokio::test]
    async fn duplicate_services_keep_cheapest() {
        let agg = aggregator(vec![Arc::new(MockCarrier::successful(
            "ups",
            vec![
                quote("Ground", 1200, 0),
                quote("  ground ", 1100, 0),
                quote("GROUND", 1300, 0),
            ],
        ))]);

        let result = agg.aggregate(&au(), &weight(), Decimal::ONE).await.unwrap();

        assert_eq!(result.ranked.len(), 1);
        assert_eq!(result.ranked[0].option.final_price(), Money::from_minor(1100));
        assert_eq!(result.stats.options_collected, 3);
        assert_eq!(result.stats.options_discarded, 2);
    }

    #[tokio::test]
    async fn same_service_from_different_providers_is_kept() {
        let agg = aggregator(vec![
            Arc::new(MockCarrier::successful("a", vec![quote("Ground", 1000, 0)])),
            Arc::new(MockCarrier::successful("b", vec![quote("Ground", 1000, 0)])),
        ]);

        let result = agg.aggregate(&au(), &weight(), Decimal::ONE).await.unwrap();

        assert_eq!(result.ranked.len(), 2);
        assert_eq!(result.ranked[0].option.provider_id().as_str(), "a");
    }

    #[tokio::test]
    async fn non_positive_and_blocked_options_are_discarded() {
        let agg = aggregator(vec![Arc::new(MockCarrier::successful(
            "ups",
            vec![
                quote("Free", 0, 0),
                quote("Refund", -500, 0),
                quote("Hazmat", 3000, 0),
                quote("Ground", 1000, 0),
            ],
        ))])
        .with_restrictions(ServiceRestrictions::new().block(au(), "HAZMAT"));

        let result = agg.aggregate(&au(), &weight(), Decimal::ONE).await.unwrap();

        assert_eq!(result.ranked.len(), 1);
        assert_eq!(result.ranked[0].option.service_name(), "Ground");
        assert_eq!(result.stats.options_discarded, 3);
    }

    #[tokio::test]
    async fn only_discarded_options_is_no_rates_available() {
        let agg = aggregator(vec![Arc::new(MockCarrier::successful(
            "ups",
            vec![quote("Hazmat", 3000, 0)],
        ))])
        .with_restrictions(ServiceRestrictions::new().block(au(), "hazmat"));

        let err = agg.aggregate(&au(), &weight(), Decimal::ONE).await.unwrap_err();
        assert!(err.is_no_rates_available());
    }

    #[test]
    fn restrictions_are_per_destination() {
        let restrictions = ServiceRestrictions::new().block(au(), " Hazmat ");
        assert!(restrictions.is_blocked(&au(), "hazmat"));
        assert!(!restrictions.is_blocked(&CountryCode::new("NZ").unwrap(), "hazmat"));
    }

    #[test]
    fn aggregation_config_builder() {
        let config = AggregationConfig::with_timeout(5000).with_per_provider_timeout(3000);
        assert_eq!(config.timeout_ms, 5000);
        assert_eq!(config.per_provider_timeout_ms, 3000);
        assert_eq!(AggregationConfig::default().timeout_ms, 10_000);
    }
}
