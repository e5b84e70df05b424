//! # Carrier Adapters
//!
//! Rate providers the aggregator fans out to.
//!
//! - [`CarrierRateProvider`]: the port
//! - [`HttpCarrierProvider`]: JSON rate API with optional request quota
//! - [`TableCarrierProvider`]: configured rate card

pub mod error;
pub mod http_carrier;
pub mod table_carrier;
pub mod traits;

pub use error::{CarrierError, CarrierResult};
pub use http_carrier::{HttpCarrierConfig, HttpCarrierProvider};
pub use table_carrier::{TableCarrierConfig, TableCarrierProvider, TableService};
pub use traits::CarrierRateProvider;
