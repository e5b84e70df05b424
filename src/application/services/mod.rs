//! # Application Services
//!
//! Services that orchestrate domain logic and infrastructure.
//!
//! This module provides application-level services including:
//! - [`LandedCostEngine`]: the pricing entry point, single and batch
//! - [`RateAggregator`]: concurrent carrier fan-out and ranking
//! - [`RankingStrategy`]: strategies for ordering options
//! - [`MultiplierResolver`], [`InsuranceCalculator`]: policy-store backed pricing rules
//! - [`DutyTaxEstimator`]: duty/VAT with an ordered fallback chain
//! - [`CurrencyRateCache`]: single-flight exchange-rate cache

pub mod currency_cache;
pub mod duty_estimation;
pub mod insurance_calculator;
pub mod landed_cost;
pub mod multiplier_resolver;
pub mod rate_aggregation;
pub mod ranking_strategy;

pub use currency_cache::{CurrencyCacheConfig, CurrencyRateCache, DEFAULT_TTL_SECS};
pub use duty_estimation::{DutyPolicy, DutyTaxEstimator};
pub use insurance_calculator::InsuranceCalculator;
pub use landed_cost::{BatchItem, EngineConfig, LandedCostEngine, LandedCostRequest};
pub use multiplier_resolver::MultiplierResolver;
pub use rate_aggregation::{
    AggregatedRates, AggregationConfig, RateAggregator, ServiceRestrictions,
};
pub use ranking_strategy::{
    CheapestFirstStrategy, FastestFirstStrategy, RankedOption, RankingStrategy,
};
