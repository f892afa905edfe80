use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::lex::RequestMetadata;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditCategory {
    Ingress,
    Dialog,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditOutcome {
    Success,
    Rejected,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditContext {
    pub user_id: Option<String>,
    pub bot_name: Option<String>,
    pub input_transcript: Option<String>,
    pub correlation_id: String,
    pub actor: String,
}

impl AuditContext {
    pub fn new(
        user_id: Option<String>,
        bot_name: Option<String>,
        correlation_id: impl Into<String>,
        actor: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            bot_name,
            input_transcript: None,
            correlation_id: correlation_id.into(),
            actor: actor.into(),
        }
    }

    pub fn with_input_transcript(mut self, transcript: impl Into<String>) -> Self {
        self.input_transcript = Some(transcript.into());
        self
    }

    pub fn from_metadata(
        metadata: &RequestMetadata,
        correlation_id: impl Into<String>,
        actor: impl Into<String>,
    ) -> Self {
        Self {
            input_transcript: metadata.input_transcript.clone(),
            ..Self::new(metadata.user_id.clone(), metadata.bot_name.clone(), correlation_id, actor)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub event_id: String,
    pub intent_name: Option<String>,
    pub user_id: Option<String>,
    pub correlation_id: String,
    pub event_type: String,
    pub category: AuditCategory,
    pub actor: String,
    pub outcome: AuditOutcome,
    pub metadata: BTreeMap<String, String>,
    pub occurred_at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn new(
        intent_name: Option<String>,
        user_id: Option<String>,
        correlation_id: impl Into<String>,
        event_type: impl Into<String>,
        category: AuditCategory,
        actor: impl Into<String>,
        outcome: AuditOutcome,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            intent_name,
            user_id,
            correlation_id: correlation_id.into(),
            event_type: event_type.into(),
            category,
            actor: actor.into(),
            outcome,
            metadata: BTreeMap::new(),
            occurred_at: Utc::now(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

pub trait AuditSink: Send + Sync {
    fn emit(&self, event: AuditEvent);
}

#[derive(Clone, Default)]
pub struct InMemoryAuditSink {
    events: Arc<Mutex<Vec<AuditEvent>>>,
}

impl InMemoryAuditSink {
    pub fn events(&self) -> Vec<AuditEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl AuditSink for InMemoryAuditSink {
    fn emit(&self, event: AuditEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::audit::{
        AuditCategory, AuditContext, AuditEvent, AuditOutcome, AuditSink, InMemoryAuditSink,
    };
    use crate::domain::lex::RequestMetadata;

    #[test]
    fn in_memory_sink_records_events_with_correlation_fields() {
        let sink = InMemoryAuditSink::default();
        sink.emit(
            AuditEvent::new(
                Some("VehicleValue".to_owned()),
                Some("user-17".to_owned()),
                "req-123",
                "dialog.slot_elicited",
                AuditCategory::Dialog,
                "dialog-dispatcher",
                AuditOutcome::Rejected,
            )
            .with_metadata("slot_to_elicit", "VehicleYear"),
        );

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].correlation_id, "req-123");
        assert_eq!(events[0].user_id.as_deref(), Some("user-17"));
        assert_eq!(events[0].intent_name.as_deref(), Some("VehicleValue"));
        assert!(events[0].metadata.contains_key("slot_to_elicit"));
    }

    #[test]
    fn context_is_built_from_request_metadata() {
        let metadata = RequestMetadata {
            user_id: Some("user-9".to_owned()),
            bot_name: Some("TradeInBot".to_owned()),
            input_transcript: Some("a honda".to_owned()),
        };

        let context = AuditContext::from_metadata(&metadata, "req-7", "http");
        assert_eq!(context.user_id.as_deref(), Some("user-9"));
        assert_eq!(context.bot_name.as_deref(), Some("TradeInBot"));
        assert_eq!(context.correlation_id, "req-7");
        assert_eq!(context.actor, "http");
        assert_eq!(context.input_transcript.as_deref(), Some("a honda"));
    }
}
