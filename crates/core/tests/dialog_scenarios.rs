use std::sync::Arc;

use serde_json::{json, Value};
use tradein_core::config::AppConfig;
use tradein_core::{Dispatcher, FixedClock, InboundEvent};

const CURRENT_YEAR: i32 = 2017;

fn dispatcher() -> Dispatcher {
    Dispatcher::from_config(&AppConfig::default(), Arc::new(FixedClock(CURRENT_YEAR)))
}

fn run_turn(event: Value) -> Value {
    let event: InboundEvent = serde_json::from_value(event).expect("event should deserialize");
    let (request, _metadata) = event.into_parts();
    let response = dispatcher().dispatch(request).expect("intent should be supported");
    serde_json::to_value(response).expect("response should serialize")
}

#[test]
fn out_of_range_year_is_cleared_and_re_elicited() {
    let output = run_turn(json!({
        "invocationPhase": "Collecting",
        "intentName": "VehicleValue",
        "slots": { "VehicleYear": "1980" },
        "sessionAttributes": { "visit": "1" }
    }));

    assert_eq!(output["dialogAction"]["type"], "ElicitSlot");
    assert_eq!(output["dialogAction"]["intentName"], "VehicleValue");
    assert_eq!(output["dialogAction"]["slotToElicit"], "VehicleYear");
    assert_eq!(output["dialogAction"]["slots"]["VehicleYear"], Value::Null);
    assert_eq!(output["dialogAction"]["message"]["contentType"], "PlainText");
    assert_eq!(
        output["dialogAction"]["message"]["content"],
        "We do not have any vehicles in our inventory for the year 1980. Please try a year newer than 1991 and not a date in the future."
    );
    assert_eq!(output["sessionAttributes"], json!({ "visit": "1" }));
}

#[test]
fn fully_valid_collection_delegates_with_slots_unchanged() {
    let slots = json!({ "VehicleYear": "2015", "VehicleMake": "Honda", "VehicleModel": "Civic" });
    let output = run_turn(json!({
        "invocationPhase": "Collecting",
        "intentName": "VehicleValue",
        "slots": slots.clone(),
        "sessionAttributes": {}
    }));

    assert_eq!(
        output,
        json!({
            "sessionAttributes": {},
            "dialogAction": { "type": "Delegate", "slots": slots }
        })
    );
}

#[test]
fn fulfillment_closes_with_vehicle_summary() {
    let output = run_turn(json!({
        "invocationPhase": "Fulfilling",
        "intentName": "VehicleValue",
        "slots": { "VehicleYear": "2015", "VehicleMake": "Honda", "VehicleModel": "Civic" },
        "sessionAttributes": null
    }));

    assert_eq!(output["dialogAction"]["type"], "Close");
    assert_eq!(output["dialogAction"]["fulfillmentState"], "Fulfilled");
    let content = output["dialogAction"]["message"]["content"].as_str().unwrap_or_default();
    assert!(content.contains("2015 Honda Civic"), "unexpected content: {content}");
    assert_eq!(output["sessionAttributes"], json!({}));
}

#[test]
fn platform_event_shape_runs_the_same_flow() {
    let output = run_turn(json!({
        "messageVersion": "1.0",
        "invocationSource": "DialogCodeHook",
        "userId": "user-17",
        "bot": { "name": "TradeInBot" },
        "currentIntent": {
            "name": "VehicleValue",
            "slots": { "VehicleYear": "2016", "VehicleMake": "Tesla", "VehicleModel": null },
            "confirmationStatus": "None"
        },
        "sessionAttributes": { "lang": "en" }
    }));

    assert_eq!(output["dialogAction"]["type"], "ElicitSlot");
    assert_eq!(output["dialogAction"]["slotToElicit"], "VehicleMake");
    assert_eq!(output["dialogAction"]["slots"]["VehicleMake"], Value::Null);
    assert_eq!(output["dialogAction"]["slots"]["VehicleYear"], "2016");
    assert_eq!(output["sessionAttributes"], json!({ "lang": "en" }));
}

#[test]
fn year_and_make_both_invalid_reports_year() {
    let output = run_turn(json!({
        "invocationPhase": "Collecting",
        "intentName": "VehicleValue",
        "slots": { "VehicleYear": "2018", "VehicleMake": "Tesla" }
    }));

    assert_eq!(output["dialogAction"]["slotToElicit"], "VehicleYear");
    assert_eq!(output["dialogAction"]["slots"]["VehicleMake"], "Tesla");
}

#[test]
fn session_attributes_round_trip_for_every_phase() {
    let session = json!({ "a": "1", "b": "two" });
    for (phase, slots) in [
        ("Collecting", json!({ "VehicleYear": "1900" })),
        ("Collecting", json!({ "VehicleYear": "2000" })),
        ("Fulfilling", json!({ "VehicleYear": "2000" })),
    ] {
        let output = run_turn(json!({
            "invocationPhase": phase,
            "intentName": "VehicleValue",
            "slots": slots,
            "sessionAttributes": session.clone()
        }));
        assert_eq!(output["sessionAttributes"], session, "{phase}");
    }
}
