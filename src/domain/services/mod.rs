//! # Domain Services
//!
//! Pure pricing rules that don't belong to a single entity.
//!
//! ## Services
//!
//! - [`dimension_normalizer`]: billable weight from dimensions
//! - [`multiplier_policy`]: tier precedence
//! - [`insurance_pricing`]: banded premium with formula fallback

pub mod dimension_normalizer;
pub mod insurance_pricing;
pub mod multiplier_policy;

pub use dimension_normalizer::{normalize, normalize_raw};
pub use insurance_pricing::{InsuranceFormula, price_insurance};
pub use multiplier_policy::{TierCandidates, select_tier};
