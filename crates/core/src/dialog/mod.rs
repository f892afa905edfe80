pub mod engine;
pub mod response;
pub mod validator;

pub use engine::{trade_in_confirmation, Dispatcher, IntentHandler, VehicleValueHandler};
pub use response::{close, confirm_intent, delegate, elicit_slot};
pub use validator::{
    DialogValidator, MakeRule, ModelRule, SlotRule, SlotValidationFailure, ValidationOutcome,
    YearRule, VEHICLE_MAKE, VEHICLE_MODEL, VEHICLE_YEAR,
};
