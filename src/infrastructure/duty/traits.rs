//! # Duty Source Traits
//!
//! Ports for tariff data. The estimator walks an ordered list of
//! [`DutyRateSource`]s and finishes with a [`DefaultPercentSource`].

use crate::domain::value_objects::{CountryCode, HsCode, LevyKind, RateSource};
use crate::infrastructure::http_client::HttpError;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Failure of one tariff data source.
#[derive(Debug, Clone, Error)]
pub enum DutySourceError {
    /// The source could not be reached or answered with an error status.
    #[error("duty source unavailable: {0}")]
    Http(#[from] HttpError),

    /// The source returned a negative or unparseable percent.
    #[error("duty source returned an invalid rate: {0}")]
    InvalidRate(String),
}

/// Result type for tariff sources.
pub type DutySourceResult<T> = Result<T, DutySourceError>;

/// A base rate for one classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyRateRecord {
    /// Code the record is keyed by; may be shorter than the queried code.
    pub hs_code: String,
    /// Percent of customs value.
    pub base_rate_percent: Decimal,
    /// Provenance of the rate.
    pub source: RateSource,
}

/// What is being looked up.
#[derive(Debug, Clone, Copy)]
pub struct DutyQuery<'a> {
    /// Canonical classification.
    pub hs_code: &'a HsCode,
    /// Importing country.
    pub destination: &'a CountryCode,
    /// Whether a duty or a VAT percent is wanted.
    pub kind: LevyKind,
}

/// A source of classification-specific rates.
#[async_trait]
pub trait DutyRateSource: Send + Sync + fmt::Debug {
    /// Returns the name used in logs.
    fn name(&self) -> &str;

    /// Looks up the rate for a classification.
    ///
    /// Returns `Ok(None)` when the source has no record for the code.
    ///
    /// # Errors
    ///
    /// Returns a `DutySourceError` only on infrastructure failure.
    async fn lookup_duty_rate(
        &self,
        query: DutyQuery<'_>,
    ) -> DutySourceResult<Option<DutyRateRecord>>;
}

/// A source of destination-level default percents.
#[async_trait]
pub trait DefaultPercentSource: Send + Sync + fmt::Debug {
    /// Returns the default percent for a destination and levy kind.
    ///
    /// # Errors
    ///
    /// Returns a `DutySourceError` only on infrastructure failure.
    async fn default_percent(
        &self,
        destination: &CountryCode,
        kind: LevyKind,
    ) -> DutySourceResult<Option<Decimal>>;
}
