//! # gatehouse-core
//!
//! Core crate for Gatehouse. Contains the ephemeral store and repository
//! traits, configuration schemas, audit events, and the unified error
//! system.
//!
//! This crate has **no** internal dependencies on other Gatehouse crates.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
