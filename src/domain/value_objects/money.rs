//! # Money Value Object
//!
//! Integer minor-unit amounts.
//!
//! Every monetary value the engine returns is a [`Money`]: a whole number
//! of currency minor units (cents). Multiplication by rates and percents
//! happens in [`Decimal`] and is rounded back exactly once through
//! [`Money::scale`] or [`Money::percent`].
//!
//! # Examples
//!
//! ```
//! use landed_cost::domain::value_objects::Money;
//! use rust_decimal::Decimal;
//!
//! let base = Money::from_minor(1000);
//! let marked_up = base.scale(Decimal::new(125, 2)).unwrap();
//! assert_eq!(marked_up, Money::from_minor(1250));
//! ```

use crate::domain::value_objects::arithmetic::{
    ArithmeticResult, CheckedArithmetic, percent_of, round_to_minor_units,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An amount in currency minor units.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero minor units.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from minor units.
    #[inline]
    #[must_use]
    pub const fn from_minor(minor_units: i64) -> Self {
        Self(minor_units)
    }

    /// Returns the amount in minor units.
    #[inline]
    #[must_use]
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Returns the amount as a decimal number of minor units.
    #[inline]
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::from(self.0)
    }

    /// Returns true if the amount is strictly positive.
    #[inline]
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns true if the amount is negative.
    #[inline]
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Returns true if the amount is zero.
    #[inline]
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Adds two amounts.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` on overflow.
    #[inline]
    pub fn safe_add(self, rhs: Self) -> ArithmeticResult<Self> {
        self.0.safe_add(rhs.0).map(Self)
    }

    /// Multiplies by a factor and rounds once to minor units.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` on overflow.
    pub fn scale(self, factor: Decimal) -> ArithmeticResult<Self> {
        let scaled = self.to_decimal().safe_mul(factor)?;
        round_to_minor_units(scaled).map(Self)
    }

    /// Takes `percent` percent of the amount and rounds once to minor units.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` on overflow.
    pub fn percent(self, percent: Decimal) -> ArithmeticResult<Self> {
        let share = percent_of(self.to_decimal(), percent)?;
        round_to_minor_units(share).map(Self)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn scale_rounds_once() {
        let amount = Money::from_minor(333);
        let scaled = amount.scale(Decimal::new(15, 1)).unwrap();
        // 499.5 rounds away from zero
        assert_eq!(scaled, Money::from_minor(500));
    }

    #[test]
    fn percent_rounds_once() {
        let amount = Money::from_minor(10_025);
        assert_eq!(amount.percent(Decimal::TWO).unwrap(), Money::from_minor(201));
    }

    #[test]
    fn safe_add_overflow_fails() {
        let result = Money::from_minor(i64::MAX).safe_add(Money::from_minor(1));
        assert!(result.is_err());
    }

    #[test]
    fn sign_predicates() {
        assert!(Money::from_minor(1).is_positive());
        assert!(Money::from_minor(-1).is_negative());
        assert!(Money::ZERO.is_zero());
    }

    #[test]
    fn serializes_as_bare_integer() {
        let json = serde_json::to_string(&Money::from_minor(1250)).unwrap();
        assert_eq!(json, "1250");
    }
}
