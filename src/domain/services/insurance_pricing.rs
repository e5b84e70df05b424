//! # Insurance Pricing
//!
//! Maps a declared value to a premium: banded lookup first, formula when
//! the value falls into a configuration gap.
//!
//! ```text
//! premium = band.premium                              if a band contains value
//!         = max(round(value × percent / 100), floor)  otherwise
//! ```

use crate::domain::entities::insurance_range::InsuranceSchedule;
use crate::domain::entities::landed_cost::InsuranceQuote;
use crate::domain::value_objects::{Money, PremiumSource};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default fallback percent of declared value.
pub const DEFAULT_FALLBACK_PERCENT: Decimal = Decimal::TWO;

/// Default premium floor in minor units.
pub const DEFAULT_MINIMUM_PREMIUM: i64 = 500;

/// Parameters of the fallback formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceFormula {
    /// Percent of declared value charged when no band matches.
    pub fallback_percent: Decimal,
    /// Floor applied to the formula result.
    pub minimum_premium: Money,
}

impl Default for InsuranceFormula {
    fn default() -> Self {
        Self {
            fallback_percent: DEFAULT_FALLBACK_PERCENT,
            minimum_premium: Money::from_minor(DEFAULT_MINIMUM_PREMIUM),
        }
    }
}

impl InsuranceFormula {
    /// Computes the formula premium for `declared_value`.
    ///
    /// Saturates at `i64::MAX` minor units instead of failing.
    #[must_use]
    pub fn premium_for(&self, declared_value: Money) -> Money {
        let computed = declared_value
            .percent(self.fallback_percent)
            .unwrap_or_else(|e| {
                tracing::warn!(declared_value = %declared_value, error = %e, "insurance premium overflowed, saturating");
                Money::from_minor(i64::MAX)
            });
        computed.max(self.minimum_premium)
    }
}

/// Prices insurance for a declared value. Never fails.
#[must_use]
pub fn price_insurance(
    schedule: &InsuranceSchedule,
    formula: &InsuranceFormula,
    declared_value: Money,
) -> InsuranceQuote {
    match schedule.find(declared_value) {
        Some(band) => InsuranceQuote {
            declared_value,
            premium: band.premium(),
            source: PremiumSource::Range,
        },
        None => {
            tracing::debug!(
                declared_value = %declared_value,
                "no insurance band matches, using formula"
            );
            InsuranceQuote {
                declared_value,
                premium: formula.premium_for(declared_value),
                source: PremiumSource::Formula,
            }
        }
    }
}
