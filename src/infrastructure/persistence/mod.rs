//! # Persistence Layer
//!
//! Read ports for policy tables and their in-memory implementation.
//!
//! ## Repository Traits (Ports)
//!
//! - [`MultiplierPolicyRepository`]: multiplier tiers
//! - [`InsurancePolicyRepository`]: insurance bands
//!
//! ## Implementations
//!
//! - `in_memory`: configuration-backed tables

pub mod in_memory;
pub mod traits;

pub use in_memory::InMemoryPolicyStore;
pub use traits::{
    InsurancePolicyRepository, MultiplierPolicyRepository, RepositoryError, RepositoryResult,
};
