//! # Landed Cost Breakdown
//!
//! The final response unit: ranked shipping options annotated with
//! insurance and duty/tax, plus the provenance of every advisory input.

use crate::domain::entities::currency_quote::CurrencyQuote;
use crate::domain::entities::multiplier_tier::ResolvedMultiplier;
use crate::domain::entities::package::BillableWeight;
use crate::domain::entities::rate_option::{AggregationStats, RateOption};
use crate::domain::value_objects::{DutyMode, LevyKind, Money, PremiumSource, RateSource};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Resolved insurance premium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceQuote {
    /// Value the premium was computed for.
    pub declared_value: Money,
    /// Premium added to each option when insurance was requested.
    pub premium: Money,
    /// How the premium was derived.
    pub source: PremiumSource,
}

impl InsuranceQuote {
    /// An opt-out: zero premium.
    #[must_use]
    pub fn not_requested(declared_value: Money) -> Self {
        Self {
            declared_value,
            premium: Money::ZERO,
            source: PremiumSource::NotRequested,
        }
    }
}

/// Duty or tax estimate for one shipment.
///
/// # Invariants
///
/// - `total = base + surcharge`, each component rounded independently
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyBreakdown {
    /// Which levy applies at the destination.
    pub kind: LevyKind,
    /// Customs value the percents were applied to.
    pub customs_value: Money,
    /// Classification-specific duty (or the single VAT amount).
    pub base: Money,
    /// Standing policy surcharge.
    pub surcharge: Money,
    /// `base + surcharge`.
    pub total: Money,
    /// Percent used for `base`.
    pub base_percent: Decimal,
    /// Percent used for `surcharge`.
    pub surcharge_percent: Decimal,
    /// Provenance of `base_percent`; `None` when no lookup was needed.
    pub rate_source: Option<RateSource>,
    /// Canonical HS code used for the lookup.
    pub hs_code: Option<String>,
    /// True if the submitted code was longer than the canonical length.
    pub hs_code_truncated: bool,
}

impl DutyBreakdown {
    /// A zero result for destinations without import levies.
    #[must_use]
    pub fn not_applicable(customs_value: Money) -> Self {
        Self {
            kind: LevyKind::NotApplicable,
            customs_value,
            base: Money::ZERO,
            surcharge: Money::ZERO,
            total: Money::ZERO,
            base_percent: Decimal::ZERO,
            surcharge_percent: Decimal::ZERO,
            rate_source: None,
            hs_code: None,
            hs_code_truncated: false,
        }
    }

    /// Returns true if the destination levies nothing.
    #[must_use]
    pub fn is_not_applicable(&self) -> bool {
        self.kind == LevyKind::NotApplicable
    }
}

/// One ranked option with everything the customer pays for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandedCostOption {
    /// Position in the ranking (1 = best).
    pub rank: usize,
    /// The priced carrier option.
    pub option: RateOption,
    /// Insurance premium added to this option.
    pub insurance: Money,
    /// Duty folded in under delivered-duty-paid; zero otherwise.
    pub duty_included: Money,
    /// Handling fee folded in under delivered-duty-paid; zero otherwise.
    pub handling_fee: Money,
    /// Total presented to the customer in base currency.
    pub landed_total: Money,
    /// `landed_total` converted to the display currency.
    pub converted_total: Money,
    /// Set when insurance and duty overflowed the total and were left out.
    #[serde(default)]
    pub extras_omitted: bool,
}

/// The engine's response to one pricing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandedCostBreakdown {
    /// Correlation ID for logs.
    pub request_id: Uuid,
    /// Weight the shipment was priced by.
    pub billable_weight: BillableWeight,
    /// Markup applied to every option.
    pub multiplier: ResolvedMultiplier,
    /// Options, best first.
    pub ranked_options: Vec<LandedCostOption>,
    /// Insurance, when a declared value was supplied.
    pub insurance: Option<InsuranceQuote>,
    /// Duty/tax, when a declared value was supplied.
    pub duty: Option<DutyBreakdown>,
    /// How duty is collected.
    pub duty_mode: DutyMode,
    /// Base currency of every `Money` field except `converted_total`.
    pub currency: String,
    /// Exchange rate used for `converted_total`.
    pub exchange: CurrencyQuote,
    /// Aggregation audit counters.
    pub stats: AggregationStats,
}

impl LandedCostBreakdown {
    /// Returns the best option.
    #[must_use]
    pub fn best_option(&self) -> Option<&LandedCostOption> {
        self.ranked_options.first()
    }

    /// Returns true if any figure rests on estimated or fallback data.
    #[must_use]
    pub fn has_estimates(&self) -> bool {
        let duty_estimated = self
            .duty
            .as_ref()
            .and_then(|duty| duty.rate_source)
            .is_some_and(RateSource::is_estimate);
        let insurance_estimated = self
            .insurance
            .is_some_and(|insurance| insurance.source == PremiumSource::Formula);
        duty_estimated || insurance_estimated || self.exchange.is_fallback()
    }
}
