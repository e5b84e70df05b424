//! # Multiplier Policy
//!
//! Pure precedence rules for choosing one multiplier tier.
//!
//! # Precedence
//!
//! ```text
//! user override → country override → weight range → global default
//! ```
//!
//! The first applicable tier wins; tiers never stack. User tiers are
//! applied whenever present for the user; country and weight-range tiers
//! also require `active`. The global default is the terminal fallback.

use crate::domain::entities::multiplier_tier::{MultiplierTier, ResolvedMultiplier};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::MultiplierTierKind;
use rust_decimal::Decimal;

/// Tiers that could apply to one shipment, as read from the policy store.
///
/// A `None` slot means the lookup found nothing (or failed and was skipped).
#[derive(Debug, Clone, Default)]
pub struct TierCandidates {
    /// Override for the requesting user.
    pub user: Option<MultiplierTier>,
    /// Override for the destination country.
    pub country: Option<MultiplierTier>,
    /// All weight-range tiers; selection happens here.
    pub weight_ranges: Vec<MultiplierTier>,
    /// The terminal fallback.
    pub global_default: Option<MultiplierTier>,
}

/// Picks the single applicable tier for a billable weight.
///
/// Weight ranges are scanned in ascending order of their lower bound and
/// the first active range covering `billable_kg` wins.
///
/// # Errors
///
/// Returns `DomainError::NoDefaultMultiplierConfigured` if no earlier tier
/// applies and the global default is missing.
pub fn select_tier(
    candidates: &TierCandidates,
    billable_kg: Decimal,
) -> DomainResult<ResolvedMultiplier> {
    if let Some(tier) = candidates
        .user
        .as_ref()
        .filter(|tier| tier.kind() == MultiplierTierKind::User)
    {
        return Ok(tier.resolved());
    }

    if let Some(tier) = candidates
        .country
        .as_ref()
        .filter(|tier| tier.kind() == MultiplierTierKind::Country && tier.is_active())
    {
        return Ok(tier.resolved());
    }

    let mut ranges: Vec<&MultiplierTier> = candidates
        .weight_ranges
        .iter()
        .filter(|tier| tier.is_active() && tier.covers_weight(billable_kg))
        .collect();
    ranges.sort_by_key(|tier| tier.weight_lower_bound());
    if let Some(tier) = ranges.first() {
        return Ok(tier.resolved());
    }

    candidates
        .global_default
        .as_ref()
        .filter(|tier| tier.kind() == MultiplierTierKind::GlobalDefault)
        .map(MultiplierTier::resolved)
        .ok_or(DomainError::NoDefaultMultiplierConfigured)
}
