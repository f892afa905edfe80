use std::sync::Arc;

use thiserror::Error;
use tracing::info;
use tradein_core::config::{AppConfig, ConfigError};
use tradein_core::Clock;

use crate::routes::AppState;

pub struct Application {
    pub config: AppConfig,
    pub state: AppState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        intent_name = %config.dialog.intent_name,
        "starting application bootstrap"
    );

    let clock = config.clock.system_clock()?;
    info!(
        event_name = "system.bootstrap.clock_configured",
        correlation_id = "bootstrap",
        utc_offset = %clock.offset(),
        current_year = clock.current_year(),
        "dialog clock configured"
    );

    let state = AppState::new(&config, Arc::new(clock));
    info!(
        event_name = "system.bootstrap.dispatcher_ready",
        correlation_id = "bootstrap",
        intents = ?state.dispatcher.intent_names(),
        makes = state.inventory.makes.len(),
        models = state.inventory.models.len(),
        auth_required = state.auth_token.is_some(),
        "dialog dispatcher ready"
    );

    Ok(Application { config, state })
}
