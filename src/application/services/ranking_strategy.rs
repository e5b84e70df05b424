//! # Ranking Strategy
//!
//! Strategies for ordering priced carrier options.
//!
//! This module provides the [`RankingStrategy`] trait and two
//! implementations. Every strategy is a total, stable order: options that
//! compare equal keep the order the providers returned them in.

use crate::domain::entities::rate_option::RateOption;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// An option with its position in the ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedOption {
    /// The option being ranked.
    pub option: RateOption,
    /// The rank (1 = best).
    pub rank: usize,
}

impl RankedOption {
    /// Creates a new ranked option.
    #[must_use]
    pub fn new(option: RateOption, rank: usize) -> Self {
        Self { option, rank }
    }

    /// Returns true if this option is the best (rank 1).
    #[must_use]
    pub fn is_best(&self) -> bool {
        self.rank == 1
    }
}

impl fmt::Display for RankedOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.rank, self.option)
    }
}

/// Trait for ranking strategies.
pub trait RankingStrategy: Send + Sync + fmt::Debug {
    /// Orders two options; `Less` means `a` ranks ahead of `b`.
    fn compare(&self, a: &RateOption, b: &RateOption) -> Ordering;

    /// Returns the name of this ranking strategy.
    fn name(&self) -> &'static str;

    /// Ranks the given options, best first.
    fn rank(&self, mut options: Vec<RateOption>) -> Vec<RankedOption> {
        options.sort_by(|a, b| self.compare(a, b));
        options
            .into_iter()
            .enumerate()
            .map(|(i, option)| RankedOption::new(option, i + 1))
            .collect()
    }
}

/// Unknown transit times sort after every known one.
fn compare_days(a: Option<u32>, b: Option<u32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Cheapest final price first.
///
/// Ties go to the shorter transit time, then to the provider configured
/// first.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheapestFirstStrategy;

impl CheapestFirstStrategy {
    /// Creates a new cheapest-first strategy.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl RankingStrategy for CheapestFirstStrategy {
    fn compare(&self, a: &RateOption, b: &RateOption) -> Ordering {
        a.final_price()
            .cmp(&b.final_price())
            .then_with(|| compare_days(a.estimated_days(), b.estimated_days()))
            .then_with(|| a.provider_index().cmp(&b.provider_index()))
    }

    fn name(&self) -> &'static str {
        "CheapestFirst"
    }
}

/// Shortest transit time first, then cheapest.
#[derive(Debug, Clone, Copy, Default)]
pub struct FastestFirstStrategy;

impl FastestFirstStrategy {
    /// Creates a new fastest-first strategy.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl RankingStrategy for FastestFirstStrategy {
    fn compare(&self, a: &RateOption, b: &RateOption) -> Ordering {
        compare_days(a.estimated_days(), b.estimated_days())
            .then_with(|| a.final_price().cmp(&b.final_price()))
            .then_with(|| a.provider_index().cmp(&b.provider_index()))
    }

    fn name(&self) -> &'static str {
        "FastestFirst"
    }
}
