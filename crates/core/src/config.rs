use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::{parse_utc_offset, SystemClock};
use crate::inventory::{
    AllowList, InventoryCatalog, DEFAULT_MAKES, DEFAULT_MIN_YEAR_EXCLUSIVE, DEFAULT_MODELS,
};

pub const DEFAULT_INTENT_NAME: &str = "VehicleValue";
pub const CONFIG_FILE_CANDIDATES: [&str; 2] = ["tradein.toml", "config/tradein.toml"];

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub dialog: DialogConfig,
    pub clock: ClockConfig,
    pub inventory: InventoryConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub auth_token: Option<SecretString>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DialogConfig {
    pub intent_name: String,
    pub revalidate_on_fulfillment: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClockConfig {
    pub utc_offset: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InventoryConfig {
    pub min_year_exclusive: i32,
    pub makes: Vec<String>,
    pub models: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
    pub intent_name: Option<String>,
    pub revalidate_on_fulfillment: Option<bool>,
    pub utc_offset: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 8080,
                auth_token: None,
            },
            dialog: DialogConfig {
                intent_name: DEFAULT_INTENT_NAME.to_string(),
                revalidate_on_fulfillment: false,
            },
            clock: ClockConfig { utc_offset: "-05:00".to_string() },
            inventory: InventoryConfig {
                min_year_exclusive: DEFAULT_MIN_YEAR_EXCLUSIVE,
                makes: DEFAULT_MAKES.iter().map(|make| make.to_string()).collect(),
                models: DEFAULT_MODELS.iter().map(|model| model.to_string()).collect(),
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl ClockConfig {
    pub fn system_clock(&self) -> Result<SystemClock, ConfigError> {
        parse_utc_offset(&self.utc_offset).map(SystemClock::new).ok_or_else(|| {
            ConfigError::Validation(format!(
                "clock.utc_offset `{}` must look like `-05:00`, `+05:30`, or `UTC`",
                self.utc_offset
            ))
        })
    }
}

impl InventoryConfig {
    pub fn catalog(&self) -> InventoryCatalog {
        InventoryCatalog {
            min_year_exclusive: self.min_year_exclusive,
            makes: AllowList::new(self.makes.iter().map(|make| make.trim())),
            models: AllowList::new(self.models.iter().map(|model| model.trim())),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_CANDIDATES[0]));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(auth_token_value) = server.auth_token {
                self.server.auth_token = Some(auth_token_value.into());
            }
        }

        if let Some(dialog) = patch.dialog {
            if let Some(intent_name) = dialog.intent_name {
                self.dialog.intent_name = intent_name;
            }
            if let Some(revalidate) = dialog.revalidate_on_fulfillment {
                self.dialog.revalidate_on_fulfillment = revalidate;
            }
        }

        if let Some(clock) = patch.clock {
            if let Some(utc_offset) = clock.utc_offset {
                self.clock.utc_offset = utc_offset;
            }
        }

        if let Some(inventory) = patch.inventory {
            if let Some(min_year_exclusive) = inventory.min_year_exclusive {
                self.inventory.min_year_exclusive = min_year_exclusive;
            }
            if let Some(makes) = inventory.makes {
                self.inventory.makes = makes;
            }
            if let Some(models) = inventory.models {
                self.inventory.models = models;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("TRADEIN_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("TRADEIN_SERVER_PORT") {
            self.server.port = parse_u16("TRADEIN_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("TRADEIN_SERVER_AUTH_TOKEN") {
            self.server.auth_token = Some(value.into());
        }

        if let Some(value) = read_env("TRADEIN_DIALOG_INTENT_NAME") {
            self.dialog.intent_name = value;
        }
        if let Some(value) = read_env("TRADEIN_DIALOG_REVALIDATE_ON_FULFILLMENT") {
            self.dialog.revalidate_on_fulfillment =
                parse_bool("TRADEIN_DIALOG_REVALIDATE_ON_FULFILLMENT", &value)?;
        }

        if let Some(value) = read_env("TRADEIN_CLOCK_UTC_OFFSET") {
            self.clock.utc_offset = value;
        }

        if let Some(value) = read_env("TRADEIN_INVENTORY_MIN_YEAR_EXCLUSIVE") {
            self.inventory.min_year_exclusive =
                parse_i32("TRADEIN_INVENTORY_MIN_YEAR_EXCLUSIVE", &value)?;
        }
        if let Some(value) = read_env("TRADEIN_INVENTORY_MAKES") {
            self.inventory.makes = parse_list(&value);
        }
        if let Some(value) = read_env("TRADEIN_INVENTORY_MODELS") {
            self.inventory.models = parse_list(&value);
        }

        let log_level = read_env("TRADEIN_LOGGING_LEVEL").or_else(|| read_env("TRADEIN_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("TRADEIN_LOGGING_FORMAT").or_else(|| read_env("TRADEIN_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(bind_address) = overrides.bind_address {
            self.server.bind_address = bind_address;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(intent_name) = overrides.intent_name {
            self.dialog.intent_name = intent_name;
        }
        if let Some(revalidate) = overrides.revalidate_on_fulfillment {
            self.dialog.revalidate_on_fulfillment = revalidate;
        }
        if let Some(utc_offset) = overrides.utc_offset {
            self.clock.utc_offset = utc_offset;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_server(&self.server)?;
        validate_dialog(&self.dialog)?;
        self.clock.system_clock()?;
        validate_inventory(&self.inventory)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    CONFIG_FILE_CANDIDATES.iter().map(PathBuf::from).find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

/// Replaces `${VAR}` with the value of `VAR`; a missing variable is an error.
fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        output.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        let end = after_open.find('}').ok_or(ConfigError::UnterminatedInterpolation)?;
        let key = &after_open[..end];

        let value = env::var(key)
            .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.to_string() })?;
        output.push_str(&value);
        rest = &after_open[end + 1..];
    }

    output.push_str(rest);
    Ok(output)
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.bind_address.trim().is_empty() {
        return Err(ConfigError::Validation("server.bind_address must not be empty".to_string()));
    }

    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    let blank_token =
        server.auth_token.as_ref().map(|token| token.expose_secret().trim().is_empty());
    if blank_token == Some(true) {
        return Err(ConfigError::Validation(
            "server.auth_token must not be blank when set (remove it to disable auth)".to_string(),
        ));
    }

    Ok(())
}

fn validate_dialog(dialog: &DialogConfig) -> Result<(), ConfigError> {
    if dialog.intent_name.trim().is_empty() {
        return Err(ConfigError::Validation("dialog.intent_name must not be empty".to_string()));
    }

    Ok(())
}

fn validate_inventory(inventory: &InventoryConfig) -> Result<(), ConfigError> {
    for (key, entries) in [("inventory.makes", &inventory.makes), ("inventory.models", &inventory.models)]
    {
        if entries.is_empty() {
            return Err(ConfigError::Validation(format!("{key} must list at least one value")));
        }
        if entries.iter().any(|entry| entry.trim().is_empty()) {
            return Err(ConfigError::Validation(format!("{key} must not contain blank values")));
        }
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

/// An override variable counts only when it is set and not blank.
pub fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.trim().parse::<u16>().map_err(|_| invalid_override(key, value))
}

fn parse_i32(key: &str, value: &str) -> Result<i32, ConfigError> {
    value.trim().parse::<i32>().map_err(|_| invalid_override(key, value))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value.trim().parse::<bool>().map_err(|_| invalid_override(key, value))
}

fn invalid_override(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidEnvOverride { key: key.to_string(), value: value.to_string() }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    server: Option<ServerPatch>,
    dialog: Option<DialogPatch>,
    clock: Option<ClockPatch>,
    inventory: Option<InventoryPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    auth_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct DialogPatch {
    intent_name: Option<String>,
    revalidate_on_fulfillment: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct ClockPatch {
    utc_offset: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct InventoryPatch {
    min_year_exclusive: Option<i32>,
    makes: Option<Vec<String>>,
    models: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
