//! # Landed Cost Engine
//!
//! The single entry point the route layer calls.
//!
//! # Flow
//!
//! ```text
//!            ┌─ resolve multiplier ─▶ aggregate carrier rates ─┐
//! normalize ─┼─ insurance premium ──────────────────────────────┼─▶ assemble
//!            ├─ duty / tax estimate ────────────────────────────┤
//!            └─ exchange rate ──────────────────────────────────┘
//! ```
//!
//! Only input validation, a missing default multiplier and
//! `NoRatesAvailable` abort a request. Insurance, duty and currency always
//! resolve to something, tagged with where it came from.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::currency_cache::CurrencyRateCache;
use crate::application::services::duty_estimation::DutyTaxEstimator;
use crate::application::services::insurance_calculator::InsuranceCalculator;
use crate::application::services::multiplier_resolver::MultiplierResolver;
use crate::application::services::rate_aggregation::RateAggregator;
use crate::domain::entities::currency_quote::CurrencyQuote;
use crate::domain::entities::landed_cost::{
    DutyBreakdown, InsuranceQuote, LandedCostBreakdown, LandedCostOption,
};
use crate::domain::entities::package::PackageDimensions;
use crate::domain::entities::rate_option::RateOption;
use crate::domain::errors::DomainError;
use crate::domain::services::normalize;
use crate::domain::value_objects::{CountryCode, DutyMode, Money, UserId};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// One shipment to price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandedCostRequest {
    /// Correlation ID; generated when absent.
    #[serde(default)]
    pub request_id: Option<Uuid>,
    /// Package measurements.
    pub dimensions: PackageDimensions,
    /// Importing country.
    pub destination: CountryCode,
    /// Requesting customer, for per-user markup.
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Declared value in minor units; enables insurance and duty.
    #[serde(default)]
    pub declared_value: Option<Money>,
    /// Tariff classification of the goods.
    #[serde(default)]
    pub hs_code: Option<String>,
    /// Whether the customer opted into insurance.
    #[serde(default)]
    pub insurance_requested: bool,
    /// How duty is collected.
    #[serde(default)]
    pub duty_mode: DutyMode,
}

impl LandedCostRequest {
    /// Creates a request with only the mandatory fields.
    #[must_use]
    pub fn new(dimensions: PackageDimensions, destination: CountryCode) -> Self {
        Self {
            request_id: None,
            dimensions,
            destination,
            user_id: None,
            declared_value: None,
            hs_code: None,
            insurance_requested: false,
            duty_mode: DutyMode::default(),
        }
    }

    /// Sets the correlation ID.
    #[must_use]
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Sets the requesting user.
    #[must_use]
    pub fn with_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Sets the declared value.
    #[must_use]
    pub fn with_declared_value(mut self, declared_value: Money) -> Self {
        self.declared_value = Some(declared_value);
        self
    }

    /// Sets the HS code.
    #[must_use]
    pub fn with_hs_code(mut self, hs_code: impl Into<String>) -> Self {
        self.hs_code = Some(hs_code.into());
        self
    }

    /// Opts into insurance.
    #[must_use]
    pub fn with_insurance(mut self) -> Self {
        self.insurance_requested = true;
        self
    }

    /// Sets the duty mode.
    #[must_use]
    pub fn with_duty_mode(mut self, duty_mode: DutyMode) -> Self {
        self.duty_mode = duty_mode;
        self
    }
}

/// The outcome for one request in a batch.
#[derive(Debug, Clone)]
pub struct BatchItem {
    /// Position of the request in the batch.
    pub index: usize,
    /// Correlation ID of the request.
    pub request_id: Uuid,
    /// The breakdown, or why this shipment could not be priced.
    pub result: ApplicationResult<LandedCostBreakdown>,
}

impl BatchItem {
    /// Returns true if the shipment was priced.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Engine tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Shipments priced at once in a batch.
    pub batch_concurrency: usize,
    /// Fee added to each option under delivered-duty-paid.
    pub ddp_handling_fee: Money,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            batch_concurrency: 4,
            ddp_handling_fee: Money::ZERO,
        }
    }
}

/// Composes every component into one priced response.
#[derive(Debug, Clone)]
pub struct LandedCostEngine {
    resolver: MultiplierResolver,
    aggregator: Arc<RateAggregator>,
    insurance: InsuranceCalculator,
    duty: DutyTaxEstimator,
    currency: Arc<CurrencyRateCache>,
    config: EngineConfig,
}

impl LandedCostEngine {
    /// Creates an engine from its components.
    #[must_use]
    pub fn new(
        resolver: MultiplierResolver,
        aggregator: Arc<RateAggregator>,
        insurance: InsuranceCalculator,
        duty: DutyTaxEstimator,
        currency: Arc<CurrencyRateCache>,
        config: EngineConfig,
    ) -> Self {
        Self {
            resolver,
            aggregator,
            insurance,
            duty,
            currency,
            config,
        }
    }

    /// Returns the engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the shared exchange-rate cache.
    #[must_use]
    pub fn currency_cache(&self) -> &Arc<CurrencyRateCache> {
        &self.currency
    }

    /// Prices one shipment.
    ///
    /// # Errors
    ///
    /// - `ApplicationError::Domain` with `InvalidDimensions` for bad input
    /// - `ApplicationError::Domain` with `NoDefaultMultiplierConfigured`
    /// - `ApplicationError::NoRatesAvailable` if no carrier produced an option
    pub async fn quote(&self, request: LandedCostRequest) -> ApplicationResult<LandedCostBreakdown> {
        let request_id = request.request_id.unwrap_or_else(Uuid::new_v4);
        let span = tracing::info_span!(
            "landed_cost",
            %request_id,
            destination = %request.destination,
        );
        self.quote_inner(request_id, request).instrument(span).await
    }

    async fn quote_inner(
        &self,
        request_id: Uuid,
        request: LandedCostRequest,
    ) -> ApplicationResult<LandedCostBreakdown> {
        let weight = normalize(&request.dimensions)?;
        let destination = &request.destination;
        let declared_value = request.declared_value.map(|value| {
            if value < Money::ZERO {
                tracing::warn!(declared_value = %value, "negative declared value priced as zero");
            }
            value.max(Money::ZERO)
        });

        if request.insurance_requested && declared_value.is_none() {
            tracing::warn!("insurance requested without a declared value, skipping");
        }

        let priced = async {
            let multiplier = self
                .resolver
                .resolve(request.user_id.as_ref(), destination, &weight)
                .await?;
            let rates = self
                .aggregator
                .aggregate(destination, &weight, multiplier.factor)
                .await?;
            Ok::<_, ApplicationError>((multiplier, rates))
        };
        let insurance = async {
            match declared_value {
                Some(value) => Some(self.insurance.premium(value, request.insurance_requested).await),
                None => None,
            }
        };
        let duty = async {
            match declared_value {
                Some(value) => Some(
                    self.duty
                        .estimate(request.hs_code.as_deref(), value, destination)
                        .await,
                ),
                None => None,
            }
        };

        let (priced, insurance, duty, exchange) =
            tokio::join!(priced, insurance, duty, self.currency.get());
        let (multiplier, rates) = priced?;

        let ranked_options = rates
            .ranked
            .into_iter()
            .map(|ranked| {
                self.assemble_option(
                    ranked.rank,
                    ranked.option,
                    insurance.as_ref(),
                    duty.as_ref(),
                    request.duty_mode,
                    &exchange,
                )
            })
            .collect::<ApplicationResult<Vec<_>>>()?;

        if let Some(best) = ranked_options.first() {
            tracing::info!(
                options = ranked_options.len(),
                best_total = %best.landed_total,
                multiplier = %multiplier.factor,
                currency_source = exchange.source(),
                "landed cost computed"
            );
        }

        Ok(LandedCostBreakdown {
            request_id,
            billable_weight: weight,
            multiplier,
            ranked_options,
            insurance,
            duty,
            duty_mode: request.duty_mode,
            currency: exchange.base().to_string(),
            exchange,
            stats: rates.stats,
        })
    }

    /// Adds insurance and, under DDP, duty plus handling to one option.
    ///
    /// Insurance and duty are advisory: if folding them in overflows the
    /// total or its conversion, the option is quoted on shipping alone and
    /// flagged with `extras_omitted`.
    fn assemble_option(
        &self,
        rank: usize,
        option: RateOption,
        insurance: Option<&InsuranceQuote>,
        duty: Option<&DutyBreakdown>,
        duty_mode: DutyMode,
        exchange: &CurrencyQuote,
    ) -> ApplicationResult<LandedCostOption> {
        let insurance = insurance.map_or(Money::ZERO, |quote| quote.premium);
        let (duty_included, handling_fee) = match duty {
            Some(duty) if duty_mode.is_duty_paid() && !duty.is_not_applicable() => {
                (duty.total, self.config.ddp_handling_fee)
            }
            _ => (Money::ZERO, Money::ZERO),
        };

        let shipping = option.final_price();
        let full = shipping
            .safe_add(insurance)
            .and_then(|total| total.safe_add(duty_included))
            .and_then(|total| total.safe_add(handling_fee))
            .and_then(|total| exchange.convert(total).map(|converted| (total, converted)));

        let (insurance, duty_included, handling_fee, landed_total, converted_total, extras_omitted) =
            match full {
                Ok((total, converted)) => {
                    (insurance, duty_included, handling_fee, total, converted, false)
                }
                Err(e) => {
                    tracing::warn!(
                        provider = %option.provider_id(),
                        service = %option.service_name(),
                        insurance = %insurance,
                        duty = %duty_included,
                        error = %e,
                        "insurance and duty overflow the landed total, quoting shipping only"
                    );
                    let converted = exchange.convert(shipping).map_err(DomainError::from)?;
                    (Money::ZERO, Money::ZERO, Money::ZERO, shipping, converted, true)
                }
            };

        Ok(LandedCostOption {
            rank,
            option,
            insurance,
            duty_included,
            handling_fee,
            landed_total,
            converted_total,
            extras_omitted,
        })
    }

    /// Prices many shipments with bounded concurrency.
    ///
    /// Results come back in input order; one failure never affects the others.
    pub async fn quote_batch(&self, requests: Vec<LandedCostRequest>) -> Vec<BatchItem> {
        let concurrency = self.config.batch_concurrency.max(1);
        let total = requests.len();

        let items: Vec<BatchItem> = futures::stream::iter(requests.into_iter().enumerate())
            .map(|(index, request)| async move {
                let request_id = request.request_id.unwrap_or_else(Uuid::new_v4);
                let result = self.quote(request.with_request_id(request_id)).await;
                if let Err(e) = &result {
                    tracing::warn!(index, %request_id, error = %e, "batch item failed");
                }
                BatchItem {
                    index,
                    request_id,
                    result,
                }
            })
            .buffered(concurrency)
            .collect()
            .await;

        let failed = items.iter().filter(|item| !item.is_ok()).count();
        tracing::info!(total, failed, concurrency, "batch priced");
        items
    }
}
