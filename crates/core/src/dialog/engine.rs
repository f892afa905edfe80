use std::collections::BTreeMap;
use std::sync::Arc;

use crate::audit::{AuditCategory, AuditContext, AuditEvent, AuditOutcome, AuditSink};
use crate::clock::Clock;
use crate::config::AppConfig;
use crate::dialog::response::{close, delegate, elicit_slot};
use crate::dialog::validator::{
    DialogValidator, ValidationOutcome, VEHICLE_MAKE, VEHICLE_MODEL, VEHICLE_YEAR,
};
use crate::domain::directive::{DialogAction, DialogResponse, FulfillmentState, Message};
use crate::domain::intent::{slot_value, IntentRequest, InvocationPhase, Slots};
use crate::errors::DomainError;

/// Dialog management and fulfillment for one intent.
pub trait IntentHandler: Send + Sync {
    fn intent_name(&self) -> &str;
    fn handle(&self, request: IntentRequest) -> DialogResponse;
}

pub struct VehicleValueHandler {
    intent_name: String,
    validator: DialogValidator,
    revalidate_on_fulfillment: bool,
}

impl VehicleValueHandler {
    pub fn new(intent_name: impl Into<String>, validator: DialogValidator) -> Self {
        Self { intent_name: intent_name.into(), validator, revalidate_on_fulfillment: false }
    }

    /// Re-run validation on fulfillment and close as `Failed` on a violation.
    pub fn with_fulfillment_revalidation(mut self, enabled: bool) -> Self {
        self.revalidate_on_fulfillment = enabled;
        self
    }

    fn collect(&self, request: IntentRequest) -> DialogResponse {
        let IntentRequest { intent_name, mut slots, session_attributes, .. } = request;

        match self.validator.validate(&slots) {
            ValidationOutcome::Invalid(failure) => {
                slots.insert(failure.violated_slot.clone(), None);
                elicit_slot(
                    session_attributes,
                    intent_name,
                    slots,
                    failure.violated_slot,
                    failure.message,
                )
            }
            ValidationOutcome::Valid => delegate(session_attributes, slots),
        }
    }

    fn fulfill(&self, request: IntentRequest) -> DialogResponse {
        if self.revalidate_on_fulfillment {
            if let ValidationOutcome::Invalid(failure) = self.validator.validate(&request.slots) {
                return close(request.session_attributes, FulfillmentState::Failed, failure.message);
            }
        }

        let message = Message::plain_text(trade_in_confirmation(&request.slots));
        close(request.session_attributes, FulfillmentState::Fulfilled, message)
    }
}

impl IntentHandler for VehicleValueHandler {
    fn intent_name(&self) -> &str {
        &self.intent_name
    }

    fn handle(&self, request: IntentRequest) -> DialogResponse {
        match request.invocation_phase {
            InvocationPhase::Collecting => self.collect(request),
            InvocationPhase::Fulfilling => self.fulfill(request),
        }
    }
}

/// `Your 2015 Honda Civic vehicle has been validated and ready for trade-in.`
pub fn trade_in_confirmation(slots: &Slots) -> String {
    let vehicle = [VEHICLE_YEAR, VEHICLE_MAKE, VEHICLE_MODEL]
        .into_iter()
        .filter_map(|name| slot_value(slots, name))
        .collect::<Vec<_>>();

    if vehicle.is_empty() {
        "Your vehicle has been validated and ready for trade-in.".to_string()
    } else {
        format!("Your {} vehicle has been validated and ready for trade-in.", vehicle.join(" "))
    }
}

/// Routes each request to the handler registered for its intent name.
#[derive(Default)]
pub struct Dispatcher {
    handlers: BTreeMap<String, Box<dyn IntentHandler>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<H>(mut self, handler: H) -> Self
    where
        H: IntentHandler + 'static,
    {
        self.handlers.insert(handler.intent_name().to_string(), Box::new(handler));
        self
    }

    pub fn from_config(config: &AppConfig, clock: Arc<dyn Clock>) -> Self {
        let validator = DialogValidator::for_inventory(&config.inventory.catalog(), clock);
        Self::new().register(
            VehicleValueHandler::new(config.dialog.intent_name.clone(), validator)
                .with_fulfillment_revalidation(config.dialog.revalidate_on_fulfillment),
        )
    }

    pub fn intent_names(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }

    pub fn dispatch(&self, request: IntentRequest) -> Result<DialogResponse, DomainError> {
        let handler = self.handlers.get(&request.intent_name).ok_or_else(|| {
            DomainError::UnsupportedIntent { intent_name: request.intent_name.clone() }
        })?;

        Ok(handler.handle(request))
    }

    pub fn dispatch_with_audit<S>(
        &self,
        request: IntentRequest,
        sink: &S,
        audit: &AuditContext,
    ) -> Result<DialogResponse, DomainError>
    where
        S: AuditSink,
    {
        let intent_name = request.intent_name.clone();
        let phase = request.invocation_phase;
        let result = self.dispatch(request);

        let event = match &result {
            Ok(response) => {
                let (event_type, outcome) = audit_shape(&response.dialog_action);
                let event = AuditEvent::new(
                    Some(intent_name),
                    audit.user_id.clone(),
                    audit.correlation_id.clone(),
                    event_type,
                    AuditCategory::Dialog,
                    audit.actor.clone(),
                    outcome,
                )
                .with_metadata("phase", format!("{phase:?}"))
                .with_metadata("action", response.dialog_action.kind());
                match &response.dialog_action {
                    DialogAction::ElicitSlot { slot_to_elicit, .. } => {
                        event.with_metadata("slot_to_elicit", slot_to_elicit.clone())
                    }
                    DialogAction::Close { fulfillment_state, .. } => {
                        event.with_metadata("fulfillment_state", format!("{fulfillment_state:?}"))
                    }
                    DialogAction::ConfirmIntent { .. } | DialogAction::Delegate { .. } => event,
                }
            }
            Err(error) => AuditEvent::new(
                Some(intent_name),
                audit.user_id.clone(),
                audit.correlation_id.clone(),
                "dialog.dispatch_rejected",
                AuditCategory::Ingress,
                audit.actor.clone(),
                AuditOutcome::Rejected,
            )
            .with_metadata("phase", format!("{phase:?}"))
            .with_metadata("error", error.to_string()),
        };

        let event = match &audit.bot_name {
            Some(bot_name) => event.with_metadata("bot_name", bot_name.clone()),
            None => event,
        };
        let event = match &audit.input_transcript {
            Some(transcript) => event.with_metadata("input_transcript", transcript.clone()),
            None => event,
        };
        sink.emit(event);
        result
    }
}

fn audit_shape(action: &DialogAction) -> (&'static str, AuditOutcome) {
    match action {
        DialogAction::ElicitSlot { .. } => ("dialog.slot_elicited", AuditOutcome::Rejected),
        DialogAction::ConfirmIntent { .. } => {
            ("dialog.intent_confirmation_requested", AuditOutcome::Success)
        }
        DialogAction::Delegate { .. } => ("dialog.delegated", AuditOutcome::Success),
        DialogAction::Close { fulfillment_state: FulfillmentState::Fulfilled, .. } => {
            ("dialog.closed", AuditOutcome::Success)
        }
        DialogAction::Close { fulfillment_state: FulfillmentState::Failed, .. } => {
            ("dialog.closed", AuditOutcome::Failed)
        }
    }
}
