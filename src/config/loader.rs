//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::ContactConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file, then apply
/// environment overrides. A missing file is not an error; defaults apply.
pub fn load_config(path: &Path) -> Result<ContactConfig, ConfigError> {
    let mut config = if path.exists() {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)?
    } else {
        ContactConfig::default()
    };

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Environment variables override file values. Names match the original
/// deployment surface so existing environments keep working.
fn apply_env_overrides(config: &mut ContactConfig) {
    if let Ok(origins) = std::env::var("ALLOWED_ORIGINS") {
        let parsed: Vec<String> = origins
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();
        if !parsed.is_empty() {
            config.cors.allowed_origins = parsed;
        }
    }

    override_parsed("RATE_LIMIT_WINDOW_SECS", &mut config.rate_limit.window_secs);
    override_parsed("RATE_LIMIT_MAX_REQUESTS", &mut config.rate_limit.max_requests);
    override_parsed("MIN_NAME_LENGTH", &mut config.validation.min_name_length);
    override_parsed("MAX_NAME_LENGTH", &mut config.validation.max_name_length);
    override_parsed("MIN_MESSAGE_LENGTH", &mut config.validation.min_message_length);
    override_parsed("MAX_MESSAGE_LENGTH", &mut config.validation.max_message_length);
    override_parsed("SUBMISSION_RETENTION_DAYS", &mut config.storage.retention_days);

    if let Ok(secret) = std::env::var("TURNSTILE_SECRET_KEY") {
        if !secret.is_empty() {
            config.challenge.secret_key = Some(secret);
        }
    }
    if let Ok(key) = std::env::var("API_KEY") {
        if !key.is_empty() {
            config.api.api_key = Some(key);
        }
    }
}

fn override_parsed<T: std::str::FromStr>(var: &str, slot: &mut T) {
    if let Ok(raw) = std::env::var(var) {
        if let Ok(value) = raw.parse() {
            *slot = value;
        }
    }
}
