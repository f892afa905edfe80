//! Native V1 event shape sent by the conversational platform.
//!
//! The dialog core only needs an [`IntentRequest`]; the rest of the event is
//! carried as [`RequestMetadata`] for logging and audit.

use serde::{Deserialize, Serialize};

use crate::domain::intent::{
    null_as_default, IntentRequest, InvocationPhase, SessionAttributes, Slots,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexBot {
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexCurrentIntent {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slots: Slots,
    #[serde(default)]
    pub confirmation_status: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexEvent {
    #[serde(default)]
    pub message_version: Option<String>,
    pub invocation_source: InvocationPhase,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub input_transcript: Option<String>,
    #[serde(default)]
    pub bot: Option<LexBot>,
    pub current_intent: LexCurrentIntent,
    #[serde(default, deserialize_with = "null_as_default")]
    pub session_attributes: SessionAttributes,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestMetadata {
    pub user_id: Option<String>,
    pub bot_name: Option<String>,
    pub input_transcript: Option<String>,
}

/// Either request shape accepted at the transport boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InboundEvent {
    Lex(LexEvent),
    Direct(IntentRequest),
}

impl InboundEvent {
    pub fn into_parts(self) -> (IntentRequest, RequestMetadata) {
        match self {
            Self::Lex(event) => event.into_parts(),
            Self::Direct(request) => (request, RequestMetadata::default()),
        }
    }
}

impl LexEvent {
    pub fn into_parts(self) -> (IntentRequest, RequestMetadata) {
        let metadata = RequestMetadata {
            user_id: self.user_id,
            bot_name: self.bot.map(|bot| bot.name),
            input_transcript: self.input_transcript,
        };
        let request = IntentRequest {
            invocation_phase: self.invocation_source,
            intent_name: self.current_intent.name,
            slots: self.current_intent.slots,
            session_attributes: self.session_attributes,
        };
        (request, metadata)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::InboundEvent;
    use crate::domain::intent::InvocationPhase;

    #[test]
    fn platform_event_converts_to_intent_request() {
        let event: InboundEvent = serde_json::from_value(json!({
            "messageVersion": "1.0",
            "invocationSource": "DialogCodeHook",
            "userId": "user-17",
            "inputTranscript": "a 2015 honda civic",
            "bot": { "name": "TradeInBot", "alias": "$LATEST", "version": "$LATEST" },
            "currentIntent": {
                "name": "VehicleValue",
                "slots": { "VehicleYear": "2015", "VehicleMake": null },
                "confirmationStatus": "None"
            },
            "sessionAttributes": { "channel": "web" }
        }))
        .expect("platform event should deserialize");

        assert!(matches!(event, InboundEvent::Lex(_)));
        let (request, metadata) = event.into_parts();
        assert_eq!(request.invocation_phase, InvocationPhase::Collecting);
        assert_eq!(request.intent_name, "VehicleValue");
        assert_eq!(request.slot_value("VehicleYear"), Some("2015"));
        assert_eq!(request.session_attributes.get("channel").map(String::as_str), Some("web"));
        assert_eq!(metadata.user_id.as_deref(), Some("user-17"));
        assert_eq!(metadata.bot_name.as_deref(), Some("TradeInBot"));
    }

    #[test]
    fn flat_request_is_accepted_directly() {
        let event: InboundEvent = serde_json::from_value(json!({
            "invocationPhase": "Fulfilling",
            "intentName": "VehicleValue",
            "slots": {},
            "sessionAttributes": {}
        }))
        .expect("flat request should deserialize");

        let (request, metadata) = event.into_parts();
        assert_eq!(request.invocation_phase, InvocationPhase::Fulfilling);
        assert_eq!(metadata.user_id, None);
    }

    #[test]
    fn platform_event_without_session_attributes_echoes_empty_map() {
        let event: InboundEvent = serde_json::from_value(json!({
            "invocationSource": "FulfillmentCodeHook",
            "currentIntent": { "name": "VehicleValue", "slots": null },
            "sessionAttributes": null
        }))
        .expect("sparse platform event should deserialize");

        let (request, _) = event.into_parts();
        assert!(request.slots.is_empty());
        assert!(request.session_attributes.is_empty());
    }
}
