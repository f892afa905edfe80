use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::Serialize;

use crate::routes::AppState;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InventorySummary {
    pub min_year_exclusive: i32,
    pub makes: usize,
    pub models: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub intents: Vec<String>,
    pub inventory: InventorySummary,
    pub checked_at: String,
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let intents =
        state.dispatcher.intent_names().into_iter().map(str::to_string).collect::<Vec<_>>();
    let ready = !intents.is_empty();

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "tradein-server runtime initialized".to_string(),
        },
        intents,
        inventory: InventorySummary {
            min_year_exclusive: state.inventory.min_year_exclusive,
            makes: state.inventory.makes.len(),
            models: state.inventory.models.len(),
        },
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}
