//! Constructors for the four directive shapes the platform understands.
//!
//! None of these validate or clear anything; callers hand over slots already in
//! the state they want echoed.

use crate::domain::directive::{DialogAction, DialogResponse, FulfillmentState, Message};
use crate::domain::intent::{SessionAttributes, Slots};

/// Re-prompt for `slot_to_elicit`. The caller clears that slot in `slots` first.
pub fn elicit_slot(
    session_attributes: SessionAttributes,
    intent_name: impl Into<String>,
    slots: Slots,
    slot_to_elicit: impl Into<String>,
    message: Message,
) -> DialogResponse {
    DialogResponse {
        session_attributes,
        dialog_action: DialogAction::ElicitSlot {
            intent_name: intent_name.into(),
            slots,
            slot_to_elicit: slot_to_elicit.into(),
            message,
        },
    }
}

pub fn confirm_intent(
    session_attributes: SessionAttributes,
    intent_name: impl Into<String>,
    slots: Slots,
    message: Message,
) -> DialogResponse {
    DialogResponse {
        session_attributes,
        dialog_action: DialogAction::ConfirmIntent {
            intent_name: intent_name.into(),
            slots,
            message,
        },
    }
}

pub fn delegate(session_attributes: SessionAttributes, slots: Slots) -> DialogResponse {
    DialogResponse { session_attributes, dialog_action: DialogAction::Delegate { slots } }
}

pub fn close(
    session_attributes: SessionAttributes,
    fulfillment_state: FulfillmentState,
    message: Message,
) -> DialogResponse {
    DialogResponse {
        session_attributes,
        dialog_action: DialogAction::Close { fulfillment_state, message },
    }
}
