use tracing::info;
use tradein_core::audit::{AuditEvent, AuditSink};

/// Forwards dialog audit events to the process log.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn emit(&self, event: AuditEvent) {
        info!(
            event_name = %event.event_type,
            event_id = %event.event_id,
            correlation_id = %event.correlation_id,
            intent_name = event.intent_name.as_deref().unwrap_or("unknown"),
            user_id = event.user_id.as_deref().unwrap_or("unknown"),
            category = ?event.category,
            outcome = ?event.outcome,
            actor = %event.actor,
            metadata = ?event.metadata,
            "dialog audit event"
        );
    }
}
