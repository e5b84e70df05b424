//! # Insurance Ranges
//!
//! Banded declared-value ranges mapping to a fixed premium.
//!
//! [`InsuranceSchedule`] keeps ranges sorted and guarantees no two ranges
//! share a value, so a declared value matches at most one band.
//!
//! # Examples
//!
//! ```
//! use landed_cost::domain::entities::insurance_range::{InsuranceRange, InsuranceSchedule};
//! use landed_cost::domain::value_objects::Money;
//!
//! let schedule = InsuranceSchedule::new(vec![
//!     InsuranceRange::new(Money::from_minor(0), Money::from_minor(4999), Money::from_minor(150)).unwrap(),
//!     InsuranceRange::new(Money::from_minor(5000), Money::from_minor(15000), Money::from_minor(300)).unwrap(),
//! ]).unwrap();
//!
//! let band = schedule.find(Money::from_minor(10000)).unwrap();
//! assert_eq!(band.premium(), Money::from_minor(300));
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::Money;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A declared-value band `[min_value, max_value]` (both inclusive).
///
/// # Invariants
///
/// - `0 <= min_value <= max_value`
/// - `premium >= 0`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceRange {
    min_value: Money,
    max_value: Money,
    premium: Money,
}

impl InsuranceRange {
    /// Creates a validated range.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidInsuranceRange` if a bound or the premium
    /// is negative, or `min_value > max_value`.
    pub fn new(min_value: Money, max_value: Money, premium: Money) -> DomainResult<Self> {
        if min_value.is_negative() || premium.is_negative() {
            return Err(DomainError::invalid_insurance_range(format!(
                "bounds and premium must not be negative: [{min_value}, {max_value}] -> {premium}"
            )));
        }
        if min_value > max_value {
            return Err(DomainError::invalid_insurance_range(format!(
                "min {min_value} is above max {max_value}"
            )));
        }
        Ok(Self {
            min_value,
            max_value,
            premium,
        })
    }

    /// Returns the inclusive lower bound.
    #[inline]
    #[must_use]
    pub fn min_value(&self) -> Money {
        self.min_value
    }

    /// Returns the inclusive upper bound.
    #[inline]
    #[must_use]
    pub fn max_value(&self) -> Money {
        self.max_value
    }

    /// Returns the premium charged for values in this band.
    #[inline]
    #[must_use]
    pub fn premium(&self) -> Money {
        self.premium
    }

    /// Returns true if `value` falls inside the band.
    #[inline]
    #[must_use]
    pub fn contains(&self, value: Money) -> bool {
        value >= self.min_value && value <= self.max_value
    }

    /// Returns true if the two bands share at least one value.
    #[inline]
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min_value <= other.max_value && other.min_value <= self.max_value
    }
}

impl fmt::Display for InsuranceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}] -> {}",
            self.min_value, self.max_value, self.premium
        )
    }
}

/// A disjoint, sorted set of insurance ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceSchedule {
    ranges: Vec<InsuranceRange>,
}

impl InsuranceSchedule {
    /// Creates an empty schedule.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a schedule, rejecting any overlap.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InsuranceRangeOverlap` naming the first range
    /// that overlaps one already accepted.
    pub fn new(ranges: Vec<InsuranceRange>) -> DomainResult<Self> {
        let mut schedule = Self::empty();
        for range in ranges {
            schedule.insert(range)?;
        }
        Ok(schedule)
    }

    /// Adds a range, keeping the schedule sorted by lower bound.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InsuranceRangeOverlap` if the range overlaps
    /// an existing one; the schedule is left unchanged.
    pub fn insert(&mut self, range: InsuranceRange) -> DomainResult<()> {
        if self.ranges.iter().any(|existing| existing.overlaps(&range)) {
            return Err(DomainError::InsuranceRangeOverlap {
                min: range.min_value().minor_units(),
                max: range.max_value().minor_units(),
            });
        }
        let position = self
            .ranges
            .partition_point(|existing| existing.min_value() < range.min_value());
        self.ranges.insert(position, range);
        Ok(())
    }

    /// Replaces the band whose bounds equal `range`'s, or inserts it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InsuranceRangeOverlap` if the resulting schedule
    /// would contain overlapping bands; the schedule is left unchanged.
    pub fn upsert(&mut self, range: InsuranceRange) -> DomainResult<()> {
        let mut candidate = self.clone();
        candidate.ranges.retain(|existing| {
            !(existing.min_value() == range.min_value()
                && existing.max_value() == range.max_value())
        });
        candidate.insert(range)?;
        *self = candidate;
        Ok(())
    }

    /// Returns the band containing `value`, if any.
    #[must_use]
    pub fn find(&self, value: Money) -> Option<&InsuranceRange> {
        self.ranges.iter().find(|range| range.contains(value))
    }

    /// Returns the ranges in ascending order.
    #[must_use]
    pub fn ranges(&self) -> &[InsuranceRange] {
        &self.ranges
    }

    /// Returns true if no ranges are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn range(min: i64, max: i64, premium: i64) -> InsuranceRange {
        InsuranceRange::new(
            Money::from_minor(min),
            Money::from_minor(max),
            Money::from_minor(premium),
        )
        .unwrap()
    }

    #[test]
    fn range_rejects_inverted_bounds() {
        let result = InsuranceRange::new(
            Money::from_minor(10),
            Money::from_minor(5),
            Money::from_minor(1),
        );
        assert!(matches!(result, Err(DomainError::InvalidInsuranceRange(_))));
    }

    #[test]
    fn range_rejects_negative_premium() {
        let result = InsuranceRange::new(Money::ZERO, Money::from_minor(5), Money::from_minor(-1));
        assert!(result.is_err());
    }

    #[test]
    fn bounds_are_inclusive() {
        let band = range(5000, 15000, 300);
        assert!(band.contains(Money::from_minor(5000)));
        assert!(band.contains(Money::from_minor(15000)));
        assert!(!band.contains(Money::from_minor(15001)));
    }

    #[test]
    fn touching_bounds_overlap() {
        assert!(range(0, 100, 1).overlaps(&range(100, 200, 2)));
        assert!(!range(0, 99, 1).overlaps(&range(100, 200, 2)));
    }

    #[test]
    fn schedule_rejects_overlap() {
        let result = InsuranceSchedule::new(vec![range(0, 100, 1), range(50, 150, 2)]);
        assert!(matches!(
            result,
            Err(DomainError::InsuranceRangeOverlap { min: 50, max: 150 })
        ));
    }

    #[test]
    fn schedule_sorts_ranges() {
        let schedule =
            InsuranceSchedule::new(vec![range(200, 300, 3), range(0, 99, 1), range(100, 199, 2)])
                .unwrap();
        let mins: Vec<i64> = schedule
            .ranges()
            .iter()
            .map(|r| r.min_value().minor_units())
            .collect();
        assert_eq!(mins, vec![0, 100, 200]);
    }

    #[test]
    fn upsert_replaces_same_bounds() {
        let mut schedule = InsuranceSchedule::new(vec![range(0, 99, 1)]).unwrap();
        schedule.upsert(range(0, 99, 5)).unwrap();
        assert_eq!(schedule.ranges().len(), 1);
        assert_eq!(schedule.ranges()[0].premium(), Money::from_minor(5));
    }

    #[test]
    fn failed_upsert_leaves_schedule_unchanged() {
        let mut schedule = InsuranceSchedule::new(vec![range(0, 99, 1), range(100, 199, 2)]).unwrap();
        let before = schedule.clone();
        assert!(schedule.upsert(range(50, 150, 9)).is_err());
        assert_eq!(schedule, before);
    }

    #[test]
    fn find_returns_none_in_gap() {
        let schedule = InsuranceSchedule::new(vec![range(0, 99, 1), range(200, 299, 2)]).unwrap();
        assert!(schedule.find(Money::from_minor(150)).is_none());
        assert_eq!(
            schedule.find(Money::from_minor(250)).unwrap().premium(),
            Money::from_minor(2)
        );
    }
}
