//! # Currency Feeds
//!
//! Exchange-rate sources, tried in order by the rate cache.
//!
//! - [`CentralBankSource`]: authoritative reference rates
//! - [`AggregatorSource`]: general-purpose fallback feed

pub mod aggregator;
pub mod central_bank;
pub mod traits;

pub use aggregator::{AggregatorSource, DEFAULT_AGGREGATOR_URL};
pub use central_bank::{CentralBankSource, DEFAULT_CENTRAL_BANK_URL};
pub use traits::{CurrencyError, CurrencyResult, CurrencySource, FetchedRate};
