use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::Json;
use secrecy::ExposeSecret;
use tracing::{info, warn};
use tradein_core::{ApplicationError, AuditContext, DialogResponse, InboundEvent, InterfaceError};
use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::AppState;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// One conversational turn: authenticate, decode, dispatch, echo the directive.
pub async fn fulfill(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<DialogResponse>, ApiError> {
    let correlation_id = correlation_id(&headers);

    if let Err(error) = authorize(&state, &headers, &correlation_id) {
        warn!(
            event_name = "fulfillment.request_rejected",
            correlation_id = %correlation_id,
            reason = "unauthorized",
            "fulfillment request rejected"
        );
        return Err(error.into());
    }

    let event = serde_json::from_slice::<InboundEvent>(&body).map_err(|error| {
        warn!(
            event_name = "fulfillment.request_rejected",
            correlation_id = %correlation_id,
            reason = "malformed_body",
            error = %error,
            "fulfillment request rejected"
        );
        InterfaceError::BadRequest {
            message: format!("request body is not a valid intent request: {error}"),
            correlation_id: correlation_id.clone(),
        }
    })?;
    let (request, metadata) = event.into_parts();

    info!(
        event_name = "fulfillment.request_received",
        correlation_id = %correlation_id,
        intent_name = %request.intent_name,
        user_id = metadata.user_id.as_deref().unwrap_or("unknown"),
        bot_name = metadata.bot_name.as_deref().unwrap_or("unknown"),
        phase = ?request.invocation_phase,
        slot_count = request.slots.len(),
        "fulfillment request received"
    );

    let audit = AuditContext::from_metadata(&metadata, correlation_id.clone(), "http");
    let response =
        state.dispatcher.dispatch_with_audit(request, &state.audit_sink, &audit).map_err(
            |error| {
                warn!(
                    event_name = "fulfillment.request_rejected",
                    correlation_id = %correlation_id,
                    reason = "dispatch_failed",
                    error = %error,
                    "fulfillment request rejected"
                );
                ApplicationError::from(error).into_interface(correlation_id.clone())
            },
        )?;

    info!(
        event_name = "fulfillment.response_sent",
        correlation_id = %correlation_id,
        action = response.dialog_action.kind(),
        "fulfillment response sent"
    );

    Ok(Json(response))
}

fn correlation_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

fn authorize(
    state: &AppState,
    headers: &HeaderMap,
    correlation_id: &str,
) -> Result<(), InterfaceError> {
    let Some(expected) = &state.auth_token else {
        return Ok(());
    };

    let presented = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim);

    if presented == Some(expected.expose_secret()) {
        return Ok(());
    }

    Err(InterfaceError::Unauthorized {
        message: "missing or invalid bearer token".to_string(),
        correlation_id: correlation_id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use tradein_core::config::AppConfig;
    use tradein_core::FixedClock;

    use crate::routes::{router, AppState};

    fn state(config: &AppConfig) -> AppState {
        AppState::new(config, Arc::new(FixedClock(2017)))
    }

    async fn post(state: AppState, body: Value, headers: &[(&str, &str)]) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/fulfillment")
            .header("content-type", "application/json");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = builder.body(Body::from(body.to_string())).expect("request should build");

        let response = router(state).oneshot(request).await.expect("router should respond");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body should read");
        let payload = serde_json::from_slice(&bytes).expect("body should be JSON");
        (status, payload)
    }

    #[tokio::test]
    async fn collecting_turn_returns_elicit_slot() {
        let (status, payload) = post(
            state(&AppConfig::default()),
            json!({
                "invocationPhase": "Collecting",
                "intentName": "VehicleValue",
                "slots": { "VehicleYear": "1980" },
                "sessionAttributes": { "k": "v" }
            }),
            &[],
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["dialogAction"]["type"], "ElicitSlot");
        assert_eq!(payload["dialogAction"]["slotToElicit"], "VehicleYear");
        assert_eq!(payload["dialogAction"]["slots"]["VehicleYear"], Value::Null);
        assert_eq!(payload["sessionAttributes"], json!({ "k": "v" }));
    }

    #[tokio::test]
    async fn platform_fulfillment_event_closes() {
        let (status, payload) = post(
            state(&AppConfig::default()),
            json!({
                "messageVersion": "1.0",
                "invocationSource": "FulfillmentCodeHook",
                "userId": "user-1",
                "bot": { "name": "TradeInBot" },
                "currentIntent": {
                    "name": "VehicleValue",
                    "slots": { "VehicleYear": "2015", "VehicleMake": "Honda", "VehicleModel": "Civic" }
                },
                "sessionAttributes": null
            }),
            &[("x-request-id", "req-99")],
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["dialogAction"]["type"], "Close");
        assert_eq!(payload["dialogAction"]["fulfillmentState"], "Fulfilled");
        let content = payload["dialogAction"]["message"]["content"].as_str().unwrap_or_default();
        assert!(content.contains("2015 Honda Civic"));
    }

    #[tokio::test]
    async fn unknown_intent_is_a_bad_request() {
        let (status, payload) = post(
            state(&AppConfig::default()),
            json!({ "invocationPhase": "Collecting", "intentName": "BookHotel", "slots": {} }),
            &[("x-request-id", "req-7")],
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload["error"], "bad_request");
        assert_eq!(payload["correlation_id"], "req-7");
        assert!(payload["detail"].as_str().unwrap_or_default().contains("BookHotel"));
    }

    #[tokio::test]
    async fn malformed_body_is_a_bad_request() {
        let (status, payload) = post(
            state(&AppConfig::default()),
            json!({ "slots": { "VehicleYear": "2015" } }),
            &[],
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload["error"], "bad_request");
        assert!(payload["detail"]
            .as_str()
            .unwrap_or_default()
            .starts_with("request body is not a valid intent request"));
        assert!(!payload["correlation_id"].as_str().unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn configured_token_is_required() {
        let mut config = AppConfig::default();
        config.server.auth_token = Some("s3cret".to_string().into());
        let body = json!({ "invocationPhase": "Collecting", "intentName": "VehicleValue" });

        let (status, payload) = post(state(&config), body.clone(), &[]).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(payload["error"], "unauthorized");
        assert_eq!(payload["detail"], "missing or invalid bearer token");

        let (status, _) =
            post(state(&config), body.clone(), &[("authorization", "Bearer wrong")]).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, payload) =
            post(state(&config), body, &[("authorization", "Bearer s3cret")]).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["dialogAction"]["type"], "Delegate");
    }
}
