//! # Package Entities
//!
//! Physical package input and the billable weight derived from it.
//!
//! # Examples
//!
//! ```
//! use landed_cost::domain::entities::package::PackageDimensions;
//! use rust_decimal::Decimal;
//!
//! let dims = PackageDimensions::new(30.0, 20.0, 15.0, 2.0).unwrap();
//! assert_eq!(dims.actual_weight_kg(), Decimal::TWO);
//! assert!(PackageDimensions::new(0.0, 20.0, 15.0, 2.0).is_err());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Divisor converting cubic centimetres to volumetric kilograms.
pub const VOLUMETRIC_DIVISOR: u32 = 5000;

/// Package dimensions in centimetres and actual weight in kilograms.
///
/// # Invariants
///
/// - All four values are finite and strictly positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDimensions")]
pub struct PackageDimensions {
    length_cm: Decimal,
    width_cm: Decimal,
    height_cm: Decimal,
    actual_weight_kg: Decimal,
}

impl PackageDimensions {
    /// Creates validated package dimensions.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDimensions` if any value is non-finite
    /// or not strictly positive.
    pub fn new(
        length_cm: f64,
        width_cm: f64,
        height_cm: f64,
        actual_weight_kg: f64,
    ) -> DomainResult<Self> {
        Ok(Self {
            length_cm: positive_decimal("length", length_cm)?,
            width_cm: positive_decimal("width", width_cm)?,
            height_cm: positive_decimal("height", height_cm)?,
            actual_weight_kg: positive_decimal("actual weight", actual_weight_kg)?,
        })
    }

    /// Creates validated package dimensions from decimals.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDimensions` if any value is not strictly positive.
    pub fn from_decimals(
        length_cm: Decimal,
        width_cm: Decimal,
        height_cm: Decimal,
        actual_weight_kg: Decimal,
    ) -> DomainResult<Self> {
        for (name, value) in [
            ("length", length_cm),
            ("width", width_cm),
            ("height", height_cm),
            ("actual weight", actual_weight_kg),
        ] {
            if value <= Decimal::ZERO {
                return Err(DomainError::invalid_dimensions(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        Ok(Self {
            length_cm,
            width_cm,
            height_cm,
            actual_weight_kg,
        })
    }

    /// Returns the length in centimetres.
    #[inline]
    #[must_use]
    pub fn length_cm(&self) -> Decimal {
        self.length_cm
    }

    /// Returns the width in centimetres.
    #[inline]
    #[must_use]
    pub fn width_cm(&self) -> Decimal {
        self.width_cm
    }

    /// Returns the height in centimetres.
    #[inline]
    #[must_use]
    pub fn height_cm(&self) -> Decimal {
        self.height_cm
    }

    /// Returns the actual weight in kilograms.
    #[inline]
    #[must_use]
    pub fn actual_weight_kg(&self) -> Decimal {
        self.actual_weight_kg
    }
}

impl fmt::Display for PackageDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}x{}cm {}kg",
            self.length_cm, self.width_cm, self.height_cm, self.actual_weight_kg
        )
    }
}

fn positive_decimal(name: &str, value: f64) -> DomainResult<Decimal> {
    if !value.is_finite() {
        return Err(DomainError::invalid_dimensions(format!(
            "{name} must be finite"
        )));
    }
    let decimal = Decimal::from_f64(value)
        .ok_or_else(|| DomainError::invalid_dimensions(format!("{name} is out of range")))?;
    // Values too small for a decimal collapse to zero.
    if decimal <= Decimal::ZERO {
        return Err(DomainError::invalid_dimensions(format!(
            "{name} must be positive, got {value}"
        )));
    }
    Ok(decimal)
}

#[derive(Deserialize)]
struct RawDimensions {
    length_cm: Decimal,
    width_cm: Decimal,
    height_cm: Decimal,
    actual_weight_kg: Decimal,
}

impl TryFrom<RawDimensions> for PackageDimensions {
    type Error = DomainError;

    fn try_from(raw: RawDimensions) -> Result<Self, Self::Error> {
        Self::from_decimals(
            raw.length_cm,
            raw.width_cm,
            raw.height_cm,
            raw.actual_weight_kg,
        )
    }
}

/// Weight a shipment is priced by.
///
/// `billable_kg` is always `max(actual_kg, volumetric_kg)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillableWeight {
    volumetric_kg: Decimal,
    actual_kg: Decimal,
    billable_kg: Decimal,
}

impl BillableWeight {
    pub(crate) fn new(volumetric_kg: Decimal, actual_kg: Decimal) -> Self {
        Self {
            volumetric_kg,
            actual_kg,
            billable_kg: volumetric_kg.max(actual_kg),
        }
    }

    /// Returns the volumetric weight in kilograms.
    #[inline]
    #[must_use]
    pub fn volumetric_kg(&self) -> Decimal {
        self.volumetric_kg
    }

    /// Returns the actual weight in kilograms.
    #[inline]
    #[must_use]
    pub fn actual_kg(&self) -> Decimal {
        self.actual_kg
    }

    /// Returns the billable weight in kilograms.
    #[inline]
    #[must_use]
    pub fn billable_kg(&self) -> Decimal {
        self.billable_kg
    }

    /// Returns true if volume, not mass, drives the price.
    #[inline]
    #[must_use]
    pub fn is_volumetric(&self) -> bool {
        self.volumetric_kg > self.actual_kg
    }
}

impl fmt::Display for BillableWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}kg (actual {}kg, volumetric {}kg)",
            self.billable_kg, self.actual_kg, self.volumetric_kg
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_values() {
        assert!(PackageDimensions::new(-1.0, 1.0, 1.0, 1.0).is_err());
        assert!(PackageDimensions::new(1.0, 0.0, 1.0, 1.0).is_err());
        assert!(PackageDimensions::new(1.0, 1.0, 1.0, 0.0).is_err());
    }

    #[test]
    fn rejects_non_finite_values() {
        let err = PackageDimensions::new(f64::NAN, 1.0, 1.0, 1.0).unwrap_err();
        assert!(matches!(err, DomainError::InvalidDimensions(_)));
        assert!(PackageDimensions::new(1.0, f64::INFINITY, 1.0, 1.0).is_err());
    }

    #[test]
    fn rejects_values_that_vanish_as_decimals() {
        let err = PackageDimensions::new(30.0, 20.0, 15.0, 1e-30).unwrap_err();
        assert!(matches!(err, DomainError::InvalidDimensions(_)));
        assert!(PackageDimensions::new(f64::MIN_POSITIVE, 1.0, 1.0, 1.0).is_err());
    }

    #[test]
    fn from_decimals_rejects_zero() {
        let result = PackageDimensions::from_decimals(
            Decimal::ONE,
            Decimal::ONE,
            Decimal::ZERO,
            Decimal::ONE,
        );
        assert!(result.is_err());
    }

    #[test]
    fn billable_weight_takes_larger_value() {
        let weight = BillableWeight::new(Decimal::new(18, 1), Decimal::TWO);
        assert_eq!(weight.billable_kg(), Decimal::TWO);
        assert!(!weight.is_volumetric());

        let bulky = BillableWeight::new(Decimal::new(54, 1), Decimal::TWO);
        assert_eq!(bulky.billable_kg(), Decimal::new(54, 1));
        assert!(bulky.is_volumetric());
    }
}
