//! Dialog validation and fulfillment for the vehicle trade-in bot.
//!
//! Each conversational turn arrives as an [`IntentRequest`]. The [`Dispatcher`]
//! picks the handler for its intent, and the handler either validates the slots
//! collected so far (re-prompting for the first bad one) or closes the
//! conversation. Nothing is kept between turns.

pub mod audit;
pub mod clock;
pub mod config;
pub mod dialog;
pub mod domain;
pub mod errors;
pub mod inventory;

pub use audit::{AuditContext, AuditEvent, AuditSink, InMemoryAuditSink};
pub use clock::{Clock, FixedClock, SystemClock};
pub use dialog::{
    DialogValidator, Dispatcher, IntentHandler, SlotRule, SlotValidationFailure,
    ValidationOutcome, VehicleValueHandler,
};
pub use domain::directive::{ContentType, DialogAction, DialogResponse, FulfillmentState, Message};
pub use domain::intent::{IntentRequest, InvocationPhase, SessionAttributes, Slots};
pub use domain::lex::{InboundEvent, LexEvent, RequestMetadata};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use inventory::{AllowList, InventoryCatalog};
