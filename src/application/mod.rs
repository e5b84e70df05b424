//! # Application Layer
//!
//! Pricing orchestration: the landed-cost engine and the components it
//! composes.

pub mod bootstrap;
pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
