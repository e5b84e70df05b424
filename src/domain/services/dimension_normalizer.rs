//! # Dimension Normalizer
//!
//! Converts physical package dimensions into the weight a shipment is
//! priced by.
//!
//! ```text
//! volumetric = length × width × height / 5000
//! billable   = max(actual, volumetric)
//! ```
//!
//! # Examples
//!
//! ```
//! use landed_cost::domain::entities::package::PackageDimensions;
//! use landed_cost::domain::services::dimension_normalizer::normalize;
//! use rust_decimal::Decimal;
//!
//! let dims = PackageDimensions::new(30.0, 20.0, 15.0, 2.0).unwrap();
//! let weight = normalize(&dims).unwrap();
//! assert_eq!(weight.volumetric_kg(), Decimal::new(18, 1));
//! assert_eq!(weight.billable_kg(), Decimal::TWO);
//! ```

use crate::domain::entities::package::{BillableWeight, PackageDimensions, VOLUMETRIC_DIVISOR};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::arithmetic::CheckedArithmetic;
use rust_decimal::Decimal;

/// Computes the billable weight of a validated package.
///
/// # Errors
///
/// Returns `DomainError::Arithmetic` if the volume overflows, or
/// `DomainError::InvalidDimensions` if the volume is too small to register.
pub fn normalize(dimensions: &PackageDimensions) -> DomainResult<BillableWeight> {
    let volume = dimensions
        .length_cm()
        .safe_mul(dimensions.width_cm())?
        .safe_mul(dimensions.height_cm())?;
    let volumetric = volume.safe_div(Decimal::from(VOLUMETRIC_DIVISOR))?;
    if volumetric <= Decimal::ZERO {
        return Err(DomainError::invalid_dimensions(format!(
            "volume of {dimensions} rounds to zero"
        )));
    }

    let weight = BillableWeight::new(volumetric.normalize(), dimensions.actual_weight_kg());
    if weight.billable_kg() <= Decimal::ZERO {
        return Err(DomainError::invalid_dimensions("billable weight must be positive"));
    }
    Ok(weight)
}

/// Validates raw measurements and computes the billable weight.
///
/// # Errors
///
/// Returns `DomainError::InvalidDimensions` if any input is non-positive
/// or non-finite.
pub fn normalize_raw(
    length_cm: f64,
    width_cm: f64,
    height_cm: f64,
    actual_weight_kg: f64,
) -> DomainResult<BillableWeight> {
    let dimensions = PackageDimensions::new(length_cm, width_cm, height_cm, actual_weight_kg)?;
    normalize(&dimensions)
}
