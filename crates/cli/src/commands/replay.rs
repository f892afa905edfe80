use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tradein_core::config::{AppConfig, LoadOptions};
use tradein_core::{Clock, DomainError, Dispatcher, FixedClock, InboundEvent};

use super::{CommandResult, EXIT_CONFIG, EXIT_INPUT, EXIT_UNSUPPORTED_INTENT};

const COMMAND: &str = "replay";

/// Replays a single request read from `file`, or from stdin when no file is given.
pub fn run(file: Option<&Path>, year: Option<i32>) -> CommandResult {
    let raw = match read_request(file) {
        Ok(raw) => raw,
        Err(error) => {
            return CommandResult::failure(COMMAND, "input", format!("{error:#}"), EXIT_INPUT)
        }
    };
    replay_raw(&raw, year)
}

pub fn replay_raw(raw: &str, year: Option<i32>) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(COMMAND, "config", error.to_string(), EXIT_CONFIG)
        }
    };

    let clock: Arc<dyn Clock> = match year {
        Some(year) => Arc::new(FixedClock(year)),
        None => match config.clock.system_clock() {
            Ok(clock) => Arc::new(clock),
            Err(error) => {
                return CommandResult::failure(COMMAND, "config", error.to_string(), EXIT_CONFIG)
            }
        },
    };

    let event = match serde_json::from_str::<InboundEvent>(raw) {
        Ok(event) => event,
        Err(error) => {
            return CommandResult::failure(
                COMMAND,
                "input",
                format!("request is not a recognized intent request: {error}"),
                EXIT_INPUT,
            )
        }
    };
    let (request, _) = event.into_parts();

    let dispatcher = Dispatcher::from_config(&config, clock);
    match dispatcher.dispatch(request) {
        Ok(response) => match serde_json::to_string_pretty(&response) {
            Ok(rendered) => CommandResult::ok(rendered),
            Err(error) => CommandResult::failure(COMMAND, "serialization", error.to_string(), 1),
        },
        Err(error @ DomainError::UnsupportedIntent { .. }) => CommandResult::failure(
            COMMAND,
            "unsupported_intent",
            error.to_string(),
            EXIT_UNSUPPORTED_INTENT,
        ),
    }
}

fn read_request(file: Option<&Path>) -> anyhow::Result<String> {
    let raw = match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("could not read request file `{}`", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).context("could not read request from stdin")?;
            buffer
        }
    };

    if raw.trim().is_empty() {
        anyhow::bail!("request input is empty");
    }
    Ok(raw)
}
