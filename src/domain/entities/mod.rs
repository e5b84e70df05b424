//! # Domain Entities
//!
//! Per-computation entities and read-only policy records.
//!
//! ## Inputs
//!
//! - [`PackageDimensions`]: validated physical package
//! - [`MultiplierTier`], [`InsuranceRange`]: policy table rows
//!
//! ## Per-computation
//!
//! - [`BillableWeight`], [`CarrierQuote`], [`RateOption`], [`CurrencyQuote`]
//! - [`LandedCostBreakdown`]: final response unit

pub mod currency_quote;
pub mod insurance_range;
pub mod landed_cost;
pub mod multiplier_tier;
pub mod package;
pub mod rate_option;

pub use currency_quote::{CurrencyQuote, FALLBACK_SOURCE};
pub use insurance_range::{InsuranceRange, InsuranceSchedule};
pub use landed_cost::{DutyBreakdown, InsuranceQuote, LandedCostBreakdown, LandedCostOption};
pub use multiplier_tier::{MultiplierTier, ResolvedMultiplier, TierScope};
pub use package::{BillableWeight, PackageDimensions, VOLUMETRIC_DIVISOR};
pub use rate_option::{AggregationStats, CarrierQuote, RateOption};
