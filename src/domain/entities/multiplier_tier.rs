//! # Multiplier Tiers
//!
//! Layered markup rules applied to carrier base prices.
//!
//! Tiers form a precedence chain (user, country, weight range, global
//! default). Exactly one tier supplies the factor for a shipment; tiers
//! never stack.
//!
//! # Examples
//!
//! ```
//! use landed_cost::domain::entities::multiplier_tier::{MultiplierTier, TierScope};
//! use landed_cost::domain::value_objects::CountryCode;
//! use rust_decimal::Decimal;
//!
//! let tier = MultiplierTier::new(
//!     TierScope::Country(CountryCode::new("AU").unwrap()),
//!     Decimal::new(125, 2),
//! ).unwrap();
//! assert!(tier.is_active());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{CountryCode, MultiplierTierKind, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a tier is keyed by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "key", rename_all = "snake_case")]
pub enum TierScope {
    /// A single customer.
    User(UserId),
    /// A destination country.
    Country(CountryCode),
    /// A billable-weight band `[min_kg, max_kg)`; open-ended when `max_kg` is `None`.
    WeightRange {
        /// Inclusive lower bound in kilograms.
        min_kg: Decimal,
        /// Exclusive upper bound in kilograms.
        max_kg: Option<Decimal>,
    },
    /// The terminal fallback.
    Global,
}

impl TierScope {
    /// Returns the tier kind for this scope.
    #[must_use]
    pub fn kind(&self) -> MultiplierTierKind {
        match self {
            Self::User(_) => MultiplierTierKind::User,
            Self::Country(_) => MultiplierTierKind::Country,
            Self::WeightRange { .. } => MultiplierTierKind::WeightRange,
            Self::Global => MultiplierTierKind::GlobalDefault,
        }
    }
}

impl fmt::Display for TierScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(user) => write!(f, "user:{user}"),
            Self::Country(country) => write!(f, "country:{country}"),
            Self::WeightRange {
                min_kg,
                max_kg: Some(max),
            } => write!(f, "weight:[{min_kg},{max})"),
            Self::WeightRange { min_kg, max_kg: None } => write!(f, "weight:[{min_kg},+inf)"),
            Self::Global => write!(f, "global"),
        }
    }
}

/// A markup rule.
///
/// # Invariants
///
/// - `factor` is strictly positive
/// - a weight-range scope has `min_kg >= 0` and `max_kg > min_kg`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplierTier {
    scope: TierScope,
    factor: Decimal,
    active: bool,
}

impl MultiplierTier {
    /// Creates an active tier.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidMultiplier` if the factor is not positive
    /// or a weight range is empty or negative.
    pub fn new(scope: TierScope, factor: Decimal) -> DomainResult<Self> {
        if factor <= Decimal::ZERO {
            return Err(DomainError::invalid_multiplier(format!(
                "factor for {scope} must be positive, got {factor}"
            )));
        }
        if let TierScope::WeightRange { min_kg, max_kg } = &scope {
            if min_kg.is_sign_negative() {
                return Err(DomainError::invalid_multiplier(format!(
                    "weight range lower bound must not be negative, got {min_kg}"
                )));
            }
            if let Some(max) = max_kg
                && max <= min_kg
            {
                return Err(DomainError::invalid_multiplier(format!(
                    "weight range [{min_kg}, {max}) is empty"
                )));
            }
        }
        Ok(Self {
            scope,
            factor,
            active: true,
        })
    }

    /// Sets whether the tier participates in resolution.
    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Returns the scope.
    #[inline]
    #[must_use]
    pub fn scope(&self) -> &TierScope {
        &self.scope
    }

    /// Returns the tier kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> MultiplierTierKind {
        self.scope.kind()
    }

    /// Returns the factor.
    #[inline]
    #[must_use]
    pub fn factor(&self) -> Decimal {
        self.factor
    }

    /// Returns true if the tier participates in resolution.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns true if this is a weight-range tier covering `billable_kg`.
    #[must_use]
    pub fn covers_weight(&self, billable_kg: Decimal) -> bool {
        match &self.scope {
            TierScope::WeightRange { min_kg, max_kg } => {
                billable_kg >= *min_kg && max_kg.is_none_or(|max| billable_kg < max)
            }
            _ => false,
        }
    }

    /// Returns the lower bound of a weight-range tier, zero for other kinds.
    #[must_use]
    pub fn weight_lower_bound(&self) -> Decimal {
        match &self.scope {
            TierScope::WeightRange { min_kg, .. } => *min_kg,
            _ => Decimal::ZERO,
        }
    }

    /// Converts the tier into its resolution result.
    #[must_use]
    pub fn resolved(&self) -> ResolvedMultiplier {
        ResolvedMultiplier {
            factor: self.factor,
            tier: self.kind(),
            scope: self.scope.to_string(),
        }
    }
}

/// The factor applied to a shipment and the tier that supplied it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMultiplier {
    /// Factor applied to each option's base price and surcharge.
    pub factor: Decimal,
    /// Which tier supplied it.
    pub tier: MultiplierTierKind,
    /// The scope key of that tier.
    pub scope: String,
}

impl fmt::Display for ResolvedMultiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{} from {} ({})", self.factor, self.tier, self.scope)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn band(min: i64, max: Option<i64>) -> TierScope {
        TierScope::WeightRange {
            min_kg: Decimal::from(min),
            max_kg: max.map(Decimal::from),
        }
    }

    #[test]
    fn rejects_non_positive_factor() {
        assert!(MultiplierTier::new(TierScope::Global, Decimal::ZERO).is_err());
        assert!(MultiplierTier::new(TierScope::Global, Decimal::NEGATIVE_ONE).is_err());
    }

    #[test]
    fn rejects_empty_weight_band() {
        assert!(MultiplierTier::new(band(5, Some(5)), Decimal::ONE).is_err());
        assert!(MultiplierTier::new(band(-1, None), Decimal::ONE).is_err());
    }

    #[test]
    fn weight_band_is_half_open() {
        let tier = MultiplierTier::new(band(2, Some(5)), Decimal::ONE).unwrap();
        assert!(tier.covers_weight(Decimal::TWO));
        assert!(tier.covers_weight(Decimal::new(49, 1)));
        assert!(!tier.covers_weight(Decimal::from(5)));
        assert!(!tier.covers_weight(Decimal::ONE));
    }

    #[test]
    fn open_ended_band_covers_heavy_parcels() {
        let tier = MultiplierTier::new(band(30, None), Decimal::ONE).unwrap();
        assert!(tier.covers_weight(Decimal::from(500)));
    }

    #[test]
    fn non_weight_tier_never_covers_weight() {
        let tier = MultiplierTier::new(TierScope::Global, Decimal::ONE).unwrap();
        assert!(!tier.covers_weight(Decimal::ONE));
    }

    #[test]
    fn resolved_carries_provenance() {
        let tier = MultiplierTier::new(
            TierScope::User(UserId::new("u-1")),
            Decimal::new(11, 1),
        )
        .unwrap();
        let resolved = tier.resolved();
        assert_eq!(resolved.tier, MultiplierTierKind::User);
        assert_eq!(resolved.scope, "user:u-1");
        assert_eq!(resolved.factor, Decimal::new(11, 1));
    }

    #[test]
    fn inactive_flag() {
        let tier = MultiplierTier::new(TierScope::Global, Decimal::ONE)
            .unwrap()
            .with_active(false);
        assert!(!tier.is_active());
    }
}
