//! # Currency Source Trait
//!
//! Port for external exchange-rate feeds.

use crate::domain::value_objects::Timestamp;
use crate::infrastructure::http_client::HttpError;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

/// Failure of one exchange-rate feed.
#[derive(Debug, Clone, Error)]
pub enum CurrencyError {
    /// The feed could not be reached or answered with an error status.
    #[error("currency feed unavailable: {0}")]
    Http(#[from] HttpError),

    /// The feed answered but did not quote the requested currency.
    #[error("currency feed has no rate for {target}")]
    MissingRate {
        /// The requested target currency.
        target: String,
    },

    /// The feed reported a failure in its payload.
    #[error("currency feed rejected the request: {0}")]
    Rejected(String),

    /// The quoted rate is zero or negative.
    #[error("currency feed returned a non-positive rate: {0}")]
    NonPositiveRate(Decimal),
}

/// Result type for currency feeds.
pub type CurrencyResult<T> = Result<T, CurrencyError>;

/// One rate as published by a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchedRate {
    /// Units of target per unit of base.
    pub rate: Decimal,
    /// When the feed says the rate was published.
    pub as_of: Timestamp,
}

/// An external exchange-rate feed.
#[async_trait]
pub trait CurrencySource: Send + Sync + fmt::Debug {
    /// Returns the tag recorded on quotes from this source.
    fn name(&self) -> &str;

    /// Fetches the current `base` to `target` rate.
    ///
    /// # Errors
    ///
    /// Returns a `CurrencyError` if the feed is unreachable or does not
    /// quote the pair.
    async fn fetch_rate(&self, base: &str, target: &str) -> CurrencyResult<FetchedRate>;
}
