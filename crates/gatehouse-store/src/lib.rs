//! # gatehouse-store
//!
//! Ephemeral store implementations for Gatehouse. Supports two backends:
//!
//! - **memory**: In-process store using [dashmap](https://crates.io/crates/dashmap)
//!   with per-entry expiry, for tests and single-node deployments
//! - **redis**: Redis-backed store using the [redis](https://crates.io/crates/redis) crate
//!
//! The backend is selected at runtime based on configuration. One store
//! instance backs sessions, lockout counters, token revocation entries,
//! and the permission cache; the key namespaces in [`keys`] keep them
//! apart.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::StoreManager;
