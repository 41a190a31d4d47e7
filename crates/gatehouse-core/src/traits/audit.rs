//! Audit sink trait and the default tracing-backed implementation.

use async_trait::async_trait;

use crate::events::AuditEvent;

/// Receives security audit events.
///
/// Delivery is fire-and-forget: `record` is infallible at the call site,
/// and implementations must swallow (and log) their own delivery
/// failures so that an unavailable sink never fails a login or a role
/// mutation.
#[async_trait]
pub trait AuditSink: Send + Sync + std::fmt::Debug + 'static {
    /// Record one audit event.
    async fn record(&self, event: AuditEvent);
}

/// Audit sink that emits events as structured tracing records.
#[derive(Debug, Clone, Default)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, event: AuditEvent) {
        match serde_json::to_string(&event) {
            Ok(payload) => {
                tracing::info!(target: "gatehouse::audit", event = event.name(), %payload, "audit event");
            }
            Err(e) => {
                tracing::warn!(target: "gatehouse::audit", event = event.name(), error = %e, "failed to serialize audit event");
            }
        }
    }
}
