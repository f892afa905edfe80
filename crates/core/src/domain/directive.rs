use serde::{Deserialize, Serialize};

use crate::domain::intent::{SessionAttributes, Slots};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentType {
    PlainText,
    #[serde(rename = "SSML")]
    Ssml,
    CustomPayload,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub content_type: ContentType,
    pub content: String,
}

impl Message {
    pub fn plain_text(content: impl Into<String>) -> Self {
        Self { content_type: ContentType::PlainText, content: content.into() }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FulfillmentState {
    Fulfilled,
    Failed,
}

/// The next conversational step handed back to the platform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DialogAction {
    #[serde(rename_all = "camelCase")]
    ElicitSlot { intent_name: String, slots: Slots, slot_to_elicit: String, message: Message },
    #[serde(rename_all = "camelCase")]
    ConfirmIntent { intent_name: String, slots: Slots, message: Message },
    #[serde(rename_all = "camelCase")]
    Delegate { slots: Slots },
    #[serde(rename_all = "camelCase")]
    Close { fulfillment_state: FulfillmentState, message: Message },
}

impl DialogAction {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ElicitSlot { .. } => "ElicitSlot",
            Self::ConfirmIntent { .. } => "ConfirmIntent",
            Self::Delegate { .. } => "Delegate",
            Self::Close { .. } => "Close",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogResponse {
    pub session_attributes: SessionAttributes,
    pub dialog_action: DialogAction,
}
