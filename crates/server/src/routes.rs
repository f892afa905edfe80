use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use secrecy::SecretString;
use tradein_core::config::AppConfig;
use tradein_core::{Clock, Dispatcher, InventoryCatalog};

use crate::audit_sink::TracingAuditSink;
use crate::{fulfillment, health};

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub inventory: InventoryCatalog,
    pub auth_token: Option<SecretString>,
    pub audit_sink: TracingAuditSink,
}

impl AppState {
    pub fn new(config: &AppConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            dispatcher: Arc::new(Dispatcher::from_config(config, clock)),
            inventory: config.inventory.catalog(),
            auth_token: config.server.auth_token.clone(),
            audit_sink: TracingAuditSink,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/fulfillment", post(fulfillment::fulfill))
        .route("/health", get(health::health))
        .with_state(state)
}
