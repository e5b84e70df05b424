//! # Settings
//!
//! Runtime configuration, layered as:
//!
//! 1. `.env` in the working directory (ignored if absent)
//! 2. a TOML file, `config/landed-cost.toml` unless a path is given
//! 3. `LANDED_COST__*` environment variables, `__` separating sections
//!
//! Every field has a default so an empty file is a valid starting point,
//! but [`Settings::validate`] rejects a set that cannot price anything.
//!
//! ```text
//! LANDED_COST__ENGINE__TIMEOUT_MS=8000
//! LANDED_COST__CURRENCY__TTL_SECS=600
//! LANDED_COST__LOGGING__JSON=true
//! ```

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::{AggregationConfig, CurrencyCacheConfig, DutyPolicy, EngineConfig};
use crate::domain::entities::insurance_range::{InsuranceRange, InsuranceSchedule};
use crate::domain::entities::multiplier_tier::{MultiplierTier, TierScope};
use crate::domain::errors::DomainResult;
use crate::domain::services::InsuranceFormula;
use crate::domain::value_objects::{CountryCode, DEFAULT_HS_DIGITS, LevyKind, Money, UserId};
use crate::infrastructure::carriers::{HttpCarrierConfig, TableCarrierConfig};
use crate::infrastructure::currency::{DEFAULT_AGGREGATOR_URL, DEFAULT_CENTRAL_BANK_URL};
use crate::infrastructure::duty::{DestinationDefault, TariffEntry};
use ::config::{Config, Environment, File};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Default settings file, without extension.
pub const DEFAULT_CONFIG_FILE: &str = "config/landed-cost";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "LANDED_COST";

/// Top-level settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Deadlines and batch sizing.
    pub engine: EngineSettings,
    /// Option ordering.
    pub ranking: RankingChoice,
    /// Exchange-rate cache and feeds.
    pub currency: CurrencySettings,
    /// Insurance bands and formula.
    pub insurance: InsuranceSettings,
    /// Duty regimes and tariff sources.
    pub duty: DutySettings,
    /// Markup tiers.
    pub multipliers: MultiplierSettings,
    /// Rate providers.
    pub carriers: Vec<CarrierSettings>,
    /// Services a destination must never be offered.
    pub service_restrictions: Vec<ServiceRestriction>,
    /// Log output.
    pub logging: LoggingSettings,
}

impl Settings {
    /// Loads settings from `path`, or from the default file if `None`.
    ///
    /// An explicit path must exist; the default file is optional.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if a source cannot be read
    /// or the merged result does not deserialize.
    pub fn load(path: Option<&Path>) -> ApplicationResult<Self> {
        // A missing .env is the common case.
        let _ = dotenvy::dotenv();

        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings: Self = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(|e| ApplicationError::configuration(format!("failed to load settings: {e}")))?;

        tracing::debug!(
            carriers = settings.carriers.len(),
            ranking = ?settings.ranking,
            "settings loaded"
        );
        Ok(settings)
    }

    /// Rejects settings the engine cannot run with.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` naming the first defect:
    /// no carriers, a missing or invalid default multiplier, a bad tier,
    /// overlapping or inverted insurance bands, or zero-valued limits.
    pub fn validate(&self) -> ApplicationResult<()> {
        if self.carriers.is_empty() {
            return Err(ApplicationError::configuration("no carriers configured"));
        }
        if self.multipliers.global_default.is_none() {
            return Err(ApplicationError::configuration(
                "multipliers.global_default is required",
            ));
        }
        self.multipliers
            .tiers()
            .map_err(|e| ApplicationError::configuration(format!("multipliers: {e}")))?;
        self.insurance
            .schedule()
            .map_err(|e| ApplicationError::configuration(format!("insurance: {e}")))?;

        if self.engine.batch_concurrency == 0 {
            return Err(ApplicationError::configuration(
                "engine.batch_concurrency must be at least 1",
            ));
        }
        if self.engine.timeout_ms == 0 || self.engine.per_provider_timeout_ms == 0 {
            return Err(ApplicationError::configuration("engine timeouts must be positive"));
        }
        if self.currency.ttl_secs == 0 {
            return Err(ApplicationError::configuration("currency.ttl_secs must be positive"));
        }
        if self.currency.fallback_rate <= Decimal::ZERO {
            return Err(ApplicationError::configuration(
                "currency.fallback_rate must be positive",
            ));
        }
        if !(1..=10).contains(&self.duty.hs_digits) {
            return Err(ApplicationError::configuration(
                "duty.hs_digits must be between 1 and 10",
            ));
        }
        Ok(())
    }
}

/// Engine deadlines and batch sizing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Overall carrier aggregation deadline.
    pub timeout_ms: u64,
    /// Budget for any single carrier.
    pub per_provider_timeout_ms: u64,
    /// Shipments priced at once in a batch.
    pub batch_concurrency: usize,
    /// Fee added to each option under delivered-duty-paid, minor units.
    pub ddp_handling_fee: Money,
}

impl Default for EngineSettings {
    fn default() -> Self {
        let aggregation = AggregationConfig::default();
        let engine = EngineConfig::default();
        Self {
            timeout_ms: aggregation.timeout_ms,
            per_provider_timeout_ms: aggregation.per_provider_timeout_ms,
            batch_concurrency: engine.batch_concurrency,
            ddp_handling_fee: engine.ddp_handling_fee,
        }
    }
}

impl EngineSettings {
    /// Aggregator deadlines.
    #[must_use]
    pub fn aggregation(&self) -> AggregationConfig {
        AggregationConfig::with_timeout(self.timeout_ms)
            .with_per_provider_timeout(self.per_provider_timeout_ms)
    }

    /// Engine tunables.
    #[must_use]
    pub fn engine(&self) -> EngineConfig {
        EngineConfig {
            batch_concurrency: self.batch_concurrency,
            ddp_handling_fee: self.ddp_handling_fee,
        }
    }
}

/// How options are ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingChoice {
    /// Lowest final price first.
    #[default]
    Cheapest,
    /// Shortest transit first.
    Fastest,
}

/// Exchange-rate cache and feed endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencySettings {
    /// Currency carrier prices are quoted in.
    pub base: String,
    /// Currency totals are displayed in.
    pub target: String,
    /// Quote lifetime.
    pub ttl_secs: u64,
    /// Rate served when every feed fails.
    pub fallback_rate: Decimal,
    /// Primary feed; disabled when absent.
    pub central_bank_url: Option<String>,
    /// Secondary feed; disabled when absent.
    pub aggregator_url: Option<String>,
    /// Per-feed request timeout.
    pub timeout_ms: u64,
}

impl Default for CurrencySettings {
    fn default() -> Self {
        let cache = CurrencyCacheConfig::default();
        Self {
            base: cache.base,
            target: cache.target,
            ttl_secs: cache.ttl_secs,
            fallback_rate: cache.fallback_rate,
            central_bank_url: Some(DEFAULT_CENTRAL_BANK_URL.to_string()),
            aggregator_url: Some(DEFAULT_AGGREGATOR_URL.to_string()),
            timeout_ms: 3000,
        }
    }
}

impl CurrencySettings {
    /// Cache parameters.
    #[must_use]
    pub fn cache(&self) -> CurrencyCacheConfig {
        CurrencyCacheConfig {
            base: self.base.clone(),
            target: self.target.clone(),
            ttl_secs: self.ttl_secs,
            fallback_rate: self.fallback_rate,
        }
    }
}

/// One insurance band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceBand {
    /// Inclusive lower bound, minor units.
    pub min: Money,
    /// Inclusive upper bound, minor units.
    pub max: Money,
    /// Premium for values in the band, minor units.
    pub premium: Money,
}

/// Insurance bands and the formula for values outside them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsuranceSettings {
    /// Percent of declared value charged outside every band.
    pub fallback_percent: Decimal,
    /// Lowest premium the formula produces, minor units.
    pub minimum_premium: Money,
    /// Priced bands.
    pub ranges: Vec<InsuranceBand>,
}

impl Default for InsuranceSettings {
    fn default() -> Self {
        let formula = InsuranceFormula::default();
        Self {
            fallback_percent: formula.fallback_percent,
            minimum_premium: formula.minimum_premium,
            ranges: Vec::new(),
        }
    }
}

impl InsuranceSettings {
    /// The fallback formula.
    #[must_use]
    pub fn formula(&self) -> InsuranceFormula {
        InsuranceFormula {
            fallback_percent: self.fallback_percent,
            minimum_premium: self.minimum_premium,
        }
    }

    /// Validated bands.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidInsuranceRange` for an inverted band.
    pub fn ranges(&self) -> DomainResult<Vec<InsuranceRange>> {
        self.ranges
            .iter()
            .map(|band| InsuranceRange::new(band.min, band.max, band.premium))
            .collect()
    }

    /// Bands as a schedule, rejecting overlaps.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidInsuranceRange` or
    /// `DomainError::InsuranceRangeOverlap`.
    pub fn schedule(&self) -> DomainResult<InsuranceSchedule> {
        InsuranceSchedule::new(self.ranges()?)
    }
}

/// Duty regimes and tariff data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DutySettings {
    /// Shipments to this country are domestic.
    pub home_country: Option<CountryCode>,
    /// Canonical HS code length.
    pub hs_digits: usize,
    /// Standing surcharge on import duty.
    pub surcharge_percent: Decimal,
    /// Destinations levying import duty.
    pub duty_destinations: Vec<CountryCode>,
    /// Destinations levying VAT.
    pub vat_destinations: Vec<CountryCode>,
    /// Official tariff schedule.
    pub tariffs: Vec<TariffEntry>,
    /// Per-destination default percents.
    pub destination_defaults: Vec<DestinationDefault>,
    /// Percent used when every source misses.
    pub terminal_percent: Decimal,
    /// Estimation provider; skipped when absent.
    pub estimator_url: Option<String>,
    /// Estimation provider timeout.
    pub timeout_ms: u64,
}

impl Default for DutySettings {
    fn default() -> Self {
        Self {
            home_country: None,
            hs_digits: DEFAULT_HS_DIGITS,
            surcharge_percent: Decimal::ZERO,
            duty_destinations: Vec::new(),
            vat_destinations: Vec::new(),
            tariffs: Vec::new(),
            destination_defaults: Vec::new(),
            terminal_percent: Decimal::ZERO,
            estimator_url: None,
            timeout_ms: 3000,
        }
    }
}

impl DutySettings {
    /// The levy policy. A destination listed under both regimes is VAT.
    #[must_use]
    pub fn policy(&self) -> DutyPolicy {
        let mut regimes = HashMap::new();
        for destination in &self.duty_destinations {
            regimes.insert(destination.clone(), LevyKind::ImportDuty);
        }
        for destination in &self.vat_destinations {
            regimes.insert(destination.clone(), LevyKind::Vat);
        }

        DutyPolicy {
            home_country: self.home_country.clone(),
            surcharge_percent: self.surcharge_percent,
            regimes,
            terminal_percent: self.terminal_percent,
            hs_digits: self.hs_digits,
        }
    }
}

/// Per-user markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMultiplier {
    /// Customer.
    pub user_id: UserId,
    /// Markup factor.
    pub factor: Decimal,
    /// Whether the row applies.
    #[serde(default = "active")]
    pub active: bool,
}

/// Per-destination markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryMultiplier {
    /// Destination.
    pub country: CountryCode,
    /// Markup factor.
    pub factor: Decimal,
    /// Whether the row applies.
    #[serde(default = "active")]
    pub active: bool,
}

/// Markup for a billable-weight band `[min_kg, max_kg)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightRangeMultiplier {
    /// Inclusive lower bound.
    pub min_kg: Decimal,
    /// Exclusive upper bound; open-ended when absent.
    #[serde(default)]
    pub max_kg: Option<Decimal>,
    /// Markup factor.
    pub factor: Decimal,
    /// Whether the row applies.
    #[serde(default = "active")]
    pub active: bool,
}

fn active() -> bool {
    true
}

/// Markup tiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiplierSettings {
    /// Terminal factor; required.
    pub global_default: Option<Decimal>,
    /// Per-user overrides.
    pub users: Vec<UserMultiplier>,
    /// Per-destination overrides.
    pub countries: Vec<CountryMultiplier>,
    /// Weight bands.
    pub weight_ranges: Vec<WeightRangeMultiplier>,
}

impl MultiplierSettings {
    /// Every configured tier.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidMultiplier` for a non-positive factor.
    pub fn tiers(&self) -> DomainResult<Vec<MultiplierTier>> {
        let users = self.users.iter().map(|row| {
            MultiplierTier::new(TierScope::User(row.user_id.clone()), row.factor)
                .map(|tier| tier.with_active(row.active))
        });
        let countries = self.countries.iter().map(|row| {
            MultiplierTier::new(TierScope::Country(row.country.clone()), row.factor)
                .map(|tier| tier.with_active(row.active))
        });
        let weights = self.weight_ranges.iter().map(|row| {
            let scope = TierScope::WeightRange {
                min_kg: row.min_kg,
                max_kg: row.max_kg,
            };
            MultiplierTier::new(scope, row.factor).map(|tier| tier.with_active(row.active))
        });
        let global = self
            .global_default
            .map(|factor| MultiplierTier::new(TierScope::Global, factor));

        users.chain(countries).chain(weights).chain(global).collect()
    }
}

/// One rate provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CarrierSettings {
    /// JSON rate API.
    Http(HttpCarrierConfig),
    /// Configured rate card.
    Table(TableCarrierConfig),
}

impl CarrierSettings {
    /// Provider identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Http(config) => &config.id,
            Self::Table(config) => &config.id,
        }
    }
}

/// Services blocked for one destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRestriction {
    /// Destination.
    pub destination: CountryCode,
    /// Service names, matched case-insensitively.
    pub services: Vec<String>,
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    /// JSON lines instead of compact text.
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}
