//! # In-Memory Repositories
//!
//! - [`InMemoryPolicyStore`]: multiplier tiers and insurance bands
//!
//! ## Thread Safety
//!
//! Tables live behind `Arc<RwLock<..>>`; readers never observe a
//! half-applied write.

pub mod policy_store;

pub use policy_store::InMemoryPolicyStore;
