//! # Currency Quote
//!
//! A base-to-target exchange rate captured from one source.

use crate::domain::value_objects::arithmetic::ArithmeticResult;
use crate::domain::value_objects::{Money, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Source tag carried by the hardcoded fallback quote.
pub const FALLBACK_SOURCE: &str = "fallback";

/// An exchange rate from `base` to `target`.
///
/// Only one quote is current at a time; a refresh replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyQuote {
    base: String,
    target: String,
    rate: Decimal,
    captured_at: Timestamp,
    source: String,
    ttl_secs: u64,
}

impl CurrencyQuote {
    /// Creates a quote.
    #[must_use]
    pub fn new(
        base: impl Into<String>,
        target: impl Into<String>,
        rate: Decimal,
        captured_at: Timestamp,
        source: impl Into<String>,
        ttl_secs: u64,
    ) -> Self {
        Self {
            base: base.into(),
            target: target.into(),
            rate,
            captured_at,
            source: source.into(),
            ttl_secs,
        }
    }

    /// Creates the conservative fallback quote used when every source fails.
    #[must_use]
    pub fn fallback(base: impl Into<String>, target: impl Into<String>, rate: Decimal) -> Self {
        Self::new(base, target, rate, Timestamp::now(), FALLBACK_SOURCE, 0)
    }

    /// Returns the base currency code.
    #[inline]
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Returns the target currency code.
    #[inline]
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns units of target per unit of base.
    #[inline]
    #[must_use]
    pub fn rate(&self) -> Decimal {
        self.rate
    }

    /// Returns when the source published or the engine captured the rate.
    #[inline]
    #[must_use]
    pub fn captured_at(&self) -> Timestamp {
        self.captured_at
    }

    /// Returns the source tag.
    #[inline]
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the time-to-live in seconds the cache applied.
    #[inline]
    #[must_use]
    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Returns true for the hardcoded fallback quote.
    #[inline]
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.source == FALLBACK_SOURCE
    }

    /// Converts a base-currency amount into target minor units, rounding once.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` on overflow.
    pub fn convert(&self, amount: Money) -> ArithmeticResult<Money> {
        amount.scale(self.rate)
    }
}

impl fmt::Display for CurrencyQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "1 {} = {} {} ({})",
            self.base, self.rate, self.target, self.source
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn fallback_is_tagged() {
        let quote = CurrencyQuote::fallback("USD", "CNY", Decimal::new(72, 1));
        assert!(quote.is_fallback());
        assert_eq!(quote.source(), "fallback");
    }

    #[test]
    fn convert_rounds_once() {
        let quote = CurrencyQuote::new(
            "USD",
            "CNY",
            Decimal::new(7125, 3),
            Timestamp::now(),
            "central-bank",
            3600,
        );
        // 1250 * 7.125 = 8906.25
        assert_eq!(
            quote.convert(Money::from_minor(1250)).unwrap(),
            Money::from_minor(8906)
        );
    }

    #[test]
    fn display_includes_pair_and_source() {
        let quote = CurrencyQuote::fallback("USD", "EUR", Decimal::new(9, 1));
        let display = quote.to_string();
        assert!(display.contains("USD"));
        assert!(display.contains("EUR"));
        assert!(display.contains("fallback"));
    }
}
