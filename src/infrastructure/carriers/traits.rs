//! # Carrier Rate Provider Trait
//!
//! Port definition for carrier integrations.
//!
//! Every carrier implements [`CarrierRateProvider`] and maps its own
//! response shape into [`CarrierQuote`] at the boundary; protocol and
//! authentication details stay inside the adapter.
//!
//! # Examples
//!
//! ```ignore
//! use landed_cost::infrastructure::carriers::traits::CarrierRateProvider;
//!
//! struct MyCarrier { /* ... */ }
//!
//! #[async_trait::async_trait]
//! impl CarrierRateProvider for MyCarrier {
//!     // ... implement required methods
//! }
//! ```

use crate::domain::entities::package::BillableWeight;
use crate::domain::entities::rate_option::CarrierQuote;
use crate::domain::value_objects::{CountryCode, ProviderId};
use crate::infrastructure::carriers::error::CarrierResult;
use async_trait::async_trait;
use std::fmt;

/// A source of carrier rates for one carrier.
#[async_trait]
pub trait CarrierRateProvider: Send + Sync + fmt::Debug {
    /// Returns the provider identifier used in logs and rate options.
    fn provider_id(&self) -> &ProviderId;

    /// Returns this provider's own timeout, if tighter than the engine default.
    fn timeout_ms(&self) -> Option<u64> {
        None
    }

    /// Quotes every service tier the carrier offers for the shipment.
    ///
    /// An empty list is a valid answer; the aggregator treats it the same
    /// as a provider that has nothing to offer.
    ///
    /// # Errors
    ///
    /// Returns a `CarrierError` on transport, authentication or protocol
    /// failure.
    async fn quote(
        &self,
        destination: &CountryCode,
        weight: &BillableWeight,
    ) -> CarrierResult<Vec<CarrierQuote>>;
}
