use std::fs;
use std::path::Path;

use secrecy::ExposeSecret;
use toml::Value;
use tradein_core::config::{read_env, resolve_config_path, AppConfig, LoadOptions};

use super::{CommandResult, EXIT_CONFIG};

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("config", "config", error.to_string(), EXIT_CONFIG)
        }
    };

    let file_path = resolve_config_path(None);
    let file_doc = file_path.as_deref().and_then(load_file_doc);

    let auth_token = config.server.auth_token.as_ref().map(|token| redact(token.expose_secret()));
    let fields: Vec<(&str, &str, String)> = vec![
        ("server.bind_address", "TRADEIN_SERVER_BIND_ADDRESS", config.server.bind_address.clone()),
        ("server.port", "TRADEIN_SERVER_PORT", config.server.port.to_string()),
        (
            "server.auth_token",
            "TRADEIN_SERVER_AUTH_TOKEN",
            auth_token.unwrap_or_else(|| "<unset>".to_string()),
        ),
        ("dialog.intent_name", "TRADEIN_DIALOG_INTENT_NAME", config.dialog.intent_name.clone()),
        (
            "dialog.revalidate_on_fulfillment",
            "TRADEIN_DIALOG_REVALIDATE_ON_FULFILLMENT",
            config.dialog.revalidate_on_fulfillment.to_string(),
        ),
        ("clock.utc_offset", "TRADEIN_CLOCK_UTC_OFFSET", config.clock.utc_offset.clone()),
        (
            "inventory.min_year_exclusive",
            "TRADEIN_INVENTORY_MIN_YEAR_EXCLUSIVE",
            config.inventory.min_year_exclusive.to_string(),
        ),
        ("inventory.makes", "TRADEIN_INVENTORY_MAKES", config.inventory.makes.join(", ")),
        ("inventory.models", "TRADEIN_INVENTORY_MODELS", config.inventory.models.join(", ")),
        ("logging.level", "TRADEIN_LOGGING_LEVEL", config.logging.level.clone()),
        ("logging.format", "TRADEIN_LOGGING_FORMAT", format!("{:?}", config.logging.format)),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    lines.extend(fields.into_iter().map(|(key, env_key, value)| {
        let source = field_source(key, env_key, file_doc.as_ref(), file_path.as_deref());
        format!("- {key} = {value} (source: {source})")
    }));
    CommandResult::ok(lines.join("\n"))
}

fn load_file_doc(path: &Path) -> Option<Value> {
    fs::read_to_string(path).ok().and_then(|raw| raw.parse::<Value>().ok())
}

fn field_source(
    key_path: &str,
    env_key: &str,
    file_doc: Option<&Value>,
    file_path: Option<&Path>,
) -> String {
    if read_env(env_key).is_some() {
        return format!("env ({env_key})");
    }
    if let Some(alias) = legacy_alias(env_key).filter(|alias| read_env(alias).is_some()) {
        return format!("env ({alias})");
    }

    match (file_doc, file_path) {
        (Some(doc), Some(path)) if contains_path(doc, key_path) => {
            format!("file ({})", path.display())
        }
        _ => "default".to_string(),
    }
}

fn legacy_alias(env_key: &str) -> Option<&'static str> {
    match env_key {
        "TRADEIN_LOGGING_LEVEL" => Some("TRADEIN_LOG_LEVEL"),
        "TRADEIN_LOGGING_FORMAT" => Some("TRADEIN_LOG_FORMAT"),
        _ => None,
    }
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    key_path
        .split('.')
        .try_fold(root, |current, key| current.get(key))
        .is_some()
}

/// Shows only the first four characters of a secret.
fn redact(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.len() <= 4 || !trimmed.is_char_boundary(4) {
        return "<redacted>".to_string();
    }
    format!("{}***", &trimmed[..4])
}
