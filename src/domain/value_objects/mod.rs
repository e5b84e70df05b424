//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`CountryCode`]: validated destination country
//! - [`UserId`], [`ProviderId`]: string-based identifiers
//!
//! ## Numeric Types
//!
//! - [`Money`]: integer minor-unit amount
//! - [`HsCode`]: canonicalized tariff classification
//!
//! ## Arithmetic
//!
//! - [`ArithmeticError`]: Error type for arithmetic failures
//! - [`CheckedArithmetic`]: Trait for safe arithmetic operations
//! - [`round_to_minor_units`]: the single rounding step

pub mod arithmetic;
pub mod enums;
pub mod hs_code;
pub mod ids;
pub mod money;
pub mod timestamp;

pub use arithmetic::{
    ArithmeticError, ArithmeticResult, CheckedArithmetic, percent_of, round_to_minor_units,
};
pub use enums::{DutyMode, LevyKind, MultiplierTierKind, ParseEnumError, PremiumSource, RateSource};
pub use hs_code::{DEFAULT_HS_DIGITS, HsCode};
pub use ids::{CountryCode, ProviderId, UserId};
pub use money::Money;
pub use timestamp::Timestamp;
