//! # Tariff Data Sources
//!
//! - [`InMemoryTariffTable`]: official schedule
//! - [`HttpDutyEstimator`]: remote estimation service
//! - [`DestinationDefaults`]: per-destination default percents

pub mod destination_defaults;
pub mod http_estimator;
pub mod tariff_table;
pub mod traits;

pub use destination_defaults::{DestinationDefault, DestinationDefaults};
pub use http_estimator::HttpDutyEstimator;
pub use tariff_table::{InMemoryTariffTable, TariffEntry};
pub use traits::{
    DefaultPercentSource, DutyQuery, DutyRateRecord, DutyRateSource, DutySourceError,
    DutySourceResult,
};
