//! # Infrastructure Layer
//!
//! Adapters to carriers, exchange-rate feeds, tariff data and policy
//! storage.

pub mod carriers;
pub mod currency;
pub mod duty;
pub mod http_client;
pub mod persistence;
