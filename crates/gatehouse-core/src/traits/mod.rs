//! Shared trait definitions.

pub mod audit;
pub mod store;

pub use audit::{AuditSink, TracingAuditSink};
pub use store::EphemeralStore;
