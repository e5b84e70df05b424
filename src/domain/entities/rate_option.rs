//! # Rate Options
//!
//! Carrier quotes before and after markup.
//!
//! Every carrier adapter maps its own response shape into a
//! [`CarrierQuote`] at the boundary. The aggregator then prices each
//! quote into a [`RateOption`], which keeps both the provider's numbers
//! and the marked-up numbers for audit.
//!
//! # Examples
//!
//! ```
//! use landed_cost::domain::entities::rate_option::{CarrierQuote, RateOption};
//! use landed_cost::domain::value_objects::{Money, ProviderId};
//! use rust_decimal::Decimal;
//!
//! let quote = CarrierQuote::new("Express", Money::from_minor(1000), Money::ZERO).with_estimated_days(3);
//! let option = RateOption::priced(ProviderId::new("dhl"), 0, quote, Decimal::new(125, 2)).unwrap();
//! assert_eq!(option.final_price(), Money::from_minor(1250));
//! ```

use crate::domain::value_objects::arithmetic::ArithmeticResult;
use crate::domain::value_objects::{Money, ProviderId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One service tier as reported by a carrier, in the carrier's own prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawCarrierQuote")]
pub struct CarrierQuote {
    service_name: String,
    base_price: Money,
    surcharge: Money,
    estimated_days: Option<u32>,
}

impl CarrierQuote {
    /// Creates a carrier quote; the service name is trimmed.
    #[must_use]
    pub fn new(service_name: impl Into<String>, base_price: Money, surcharge: Money) -> Self {
        Self {
            service_name: service_name.into().trim().to_string(),
            base_price,
            surcharge,
            estimated_days: None,
        }
    }

    /// Sets the estimated transit time.
    #[must_use]
    pub fn with_estimated_days(mut self, days: u32) -> Self {
        self.estimated_days = Some(days);
        self
    }

    /// Returns the service name.
    #[inline]
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Returns the base price.
    #[inline]
    #[must_use]
    pub fn base_price(&self) -> Money {
        self.base_price
    }

    /// Returns the fuel or service surcharge.
    #[inline]
    #[must_use]
    pub fn surcharge(&self) -> Money {
        self.surcharge
    }

    /// Returns the estimated transit time in days.
    #[inline]
    #[must_use]
    pub fn estimated_days(&self) -> Option<u32> {
        self.estimated_days
    }

    /// Returns the case-insensitive key used to deduplicate services.
    #[must_use]
    pub fn service_key(&self) -> String {
        self.service_name.trim().to_lowercase()
    }
}

#[derive(Deserialize)]
struct RawCarrierQuote {
    service_name: String,
    base_price: Money,
    surcharge: Money,
    #[serde(default)]
    estimated_days: Option<u32>,
}

impl From<RawCarrierQuote> for CarrierQuote {
    fn from(raw: RawCarrierQuote) -> Self {
        let quote = Self::new(raw.service_name, raw.base_price, raw.surcharge);
        match raw.estimated_days {
            Some(days) => quote.with_estimated_days(days),
            None => quote,
        }
    }
}

/// A priced carrier option.
///
/// # Invariants
///
/// - `final_price = round(base_price × multiplier) + round(surcharge × multiplier)`
/// - the multiplier is applied exactly once
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateOption {
    provider_id: ProviderId,
    provider_index: usize,
    service_name: String,
    base_price: Money,
    surcharge: Money,
    total_price: Money,
    multiplier: Decimal,
    final_base_price: Money,
    final_surcharge: Money,
    final_price: Money,
    estimated_days: Option<u32>,
}

impl RateOption {
    /// Prices a carrier quote with the resolved multiplier.
    ///
    /// `provider_index` is the provider's position in the configured list,
    /// used as the last ranking tie-breaker.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` on overflow.
    pub fn priced(
        provider_id: ProviderId,
        provider_index: usize,
        quote: CarrierQuote,
        multiplier: Decimal,
    ) -> ArithmeticResult<Self> {
        let total_price = quote.base_price.safe_add(quote.surcharge)?;
        let final_base_price = quote.base_price.scale(multiplier)?;
        let final_surcharge = quote.surcharge.scale(multiplier)?;
        let final_price = final_base_price.safe_add(final_surcharge)?;

        Ok(Self {
            provider_id,
            provider_index,
            service_name: quote.service_name,
            base_price: quote.base_price,
            surcharge: quote.surcharge,
            total_price,
            multiplier,
            final_base_price,
            final_surcharge,
            final_price,
            estimated_days: quote.estimated_days,
        })
    }

    /// Returns the provider ID.
    #[inline]
    #[must_use]
    pub fn provider_id(&self) -> &ProviderId {
        &self.provider_id
    }

    /// Returns the provider's position in the configured provider list.
    #[inline]
    #[must_use]
    pub fn provider_index(&self) -> usize {
        self.provider_index
    }

    /// Returns the service name.
    #[inline]
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Returns the carrier's base price before markup.
    #[inline]
    #[must_use]
    pub fn base_price(&self) -> Money {
        self.base_price
    }

    /// Returns the carrier's surcharge before markup.
    #[inline]
    #[must_use]
    pub fn surcharge(&self) -> Money {
        self.surcharge
    }

    /// Returns base price plus surcharge before markup.
    #[inline]
    #[must_use]
    pub fn total_price(&self) -> Money {
        self.total_price
    }

    /// Returns the multiplier that was applied.
    #[inline]
    #[must_use]
    pub fn multiplier(&self) -> Decimal {
        self.multiplier
    }

    /// Returns the marked-up base price.
    #[inline]
    #[must_use]
    pub fn final_base_price(&self) -> Money {
        self.final_base_price
    }

    /// Returns the marked-up surcharge.
    #[inline]
    #[must_use]
    pub fn final_surcharge(&self) -> Money {
        self.final_surcharge
    }

    /// Returns the marked-up price presented to the customer.
    #[inline]
    #[must_use]
    pub fn final_price(&self) -> Money {
        self.final_price
    }

    /// Returns the estimated transit time in days.
    #[inline]
    #[must_use]
    pub fn estimated_days(&self) -> Option<u32> {
        self.estimated_days
    }
}

impl fmt::Display for RateOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RateOption({}/{} {} -> {})",
            self.provider_id, self.service_name, self.total_price, self.final_price
        )
    }
}

/// Audit counters describing one aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationStats {
    /// Providers a request was sent to.
    pub providers_queried: usize,
    /// Providers that answered without error before the deadline.
    pub providers_responded: usize,
    /// Carrier quotes received in total.
    pub options_collected: usize,
    /// Quotes dropped as duplicates, blocked services or non-positive prices.
    pub options_discarded: usize,
    /// One message per failed provider.
    pub failures: Vec<String>,
}
