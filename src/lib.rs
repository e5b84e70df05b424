//! # Landed Cost
//!
//! Prices international parcels end to end: billable weight, carrier rate
//! aggregation with per-customer markup, insurance, import duty or VAT, and
//! display-currency conversion.
//!
//! # Architecture
//!
//! - [`domain`]: value objects, entities and pure pricing rules
//! - [`application`]: the [`LandedCostEngine`] and the services it composes
//! - [`infrastructure`]: carrier, currency, tariff and policy-store adapters
//! - [`config`]: layered [`Settings`]
//! - [`telemetry`]: tracing subscriber setup
//!
//! # Example
//!
//! ```no_run
//! use landed_cost::{LandedCostEngine, LandedCostRequest, Settings};
//! use landed_cost::domain::entities::PackageDimensions;
//! use landed_cost::domain::value_objects::CountryCode;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::load(None)?;
//! let engine = LandedCostEngine::from_settings(&settings)?;
//!
//! let request = LandedCostRequest::new(
//!     PackageDimensions::new(30.0, 20.0, 15.0, 2.0)?,
//!     CountryCode::new("AU")?,
//! );
//! let breakdown = engine.quote(request).await?;
//! println!("{}", breakdown.ranked_options.len());
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;

pub use application::services::{BatchItem, LandedCostEngine, LandedCostRequest};
pub use application::{ApplicationError, ApplicationResult};
pub use config::Settings;
