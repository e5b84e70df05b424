//! # Checked Arithmetic
//!
//! Traits and utilities for safe arithmetic on decimal amounts and
//! minor-unit money.
//!
//! This module provides:
//! - [`ArithmeticError`] - Error type for arithmetic failures
//! - [`CheckedArithmetic`] - Trait for safe arithmetic operations
//! - [`round_to_minor_units`] - The one rounding step every priced total goes through
//! - [`percent_of`] - Unrounded `value × percent / 100`
//!
//! # Examples
//!
//! ```
//! use landed_cost::domain::value_objects::arithmetic::{round_to_minor_units, CheckedArithmetic};
//! use rust_decimal::Decimal;
//!
//! let scaled = Decimal::new(1000, 0).safe_mul(Decimal::new(125, 2)).unwrap();
//! assert_eq!(round_to_minor_units(scaled).unwrap(), 1250);
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Error type for arithmetic operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ArithmeticError {
    /// Arithmetic operation resulted in overflow.
    #[error("arithmetic overflow")]
    Overflow,

    /// Division by zero attempted.
    #[error("division by zero")]
    DivisionByZero,
}

/// Result type for arithmetic operations.
pub type ArithmeticResult<T> = Result<T, ArithmeticError>;

/// Rounds a decimal amount to whole minor units.
///
/// Midpoints round away from zero, so `12.5` becomes `13` and `-12.5`
/// becomes `-13`.
///
/// # Errors
///
/// Returns `ArithmeticError::Overflow` if the rounded value does not fit
/// in an `i64`.
///
/// # Examples
///
/// ```
/// use landed_cost::domain::value_objects::arithmetic::round_to_minor_units;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_to_minor_units(Decimal::new(125, 1)).unwrap(), 13);
/// assert_eq!(round_to_minor_units(Decimal::new(124, 1)).unwrap(), 12);
/// ```
#[inline]
pub fn round_to_minor_units(value: Decimal) -> ArithmeticResult<i64> {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(ArithmeticError::Overflow)
}

/// Computes `value × percent / 100` without rounding.
///
/// # Errors
///
/// Returns `ArithmeticError::Overflow` on overflow.
#[inline]
pub fn percent_of(value: Decimal, percent: Decimal) -> ArithmeticResult<Decimal> {
    value
        .safe_mul(percent)?
        .safe_div(Decimal::ONE_HUNDRED)
}

/// Trait for checked arithmetic operations.
///
/// Provides safe arithmetic methods that return `Result` instead of
/// panicking on overflow or division by zero.
pub trait CheckedArithmetic: Sized {
    /// Safely add two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the result would overflow.
    fn safe_add(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Safely multiply two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the result would overflow.
    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Safely divide two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::DivisionByZero` if the divisor is zero.
    fn safe_div(self, rhs: Self) -> ArithmeticResult<Self>;
}

impl CheckedArithmetic for Decimal {
    #[inline]
    fn safe_add(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_add(rhs).ok_or(ArithmeticError::Overflow)
    }

    #[inline]
    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_mul(rhs).ok_or(ArithmeticError::Overflow)
    }

    #[inline]
    fn safe_div(self, rhs: Self) -> ArithmeticResult<Self> {
        if rhs.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        self.checked_div(rhs).ok_or(ArithmeticError::Overflow)
    }
}

impl CheckedArithmetic for i64 {
    #[inline]
    fn safe_add(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_add(rhs).ok_or(ArithmeticError::Overflow)
    }

    #[inline]
    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_mul(rhs).ok_or(ArithmeticError::Overflow)
    }

    #[inline]
    fn safe_div(self, rhs: Self) -> ArithmeticResult<Self> {
        if rhs == 0 {
            return Err(ArithmeticError::DivisionByZero);
        }
        self.checked_div(rhs).ok_or(ArithmeticError::Overflow)
    }
}
