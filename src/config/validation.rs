//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check value ranges (window > 0, min ≤ max)
//! - Check the bind address parses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: ContactConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::ContactConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    InvalidBindAddress(String),
    #[error("cors.allowed_origins must not be empty")]
    EmptyAllowList,
    #[error("rate_limit.window_secs must be greater than 0")]
    ZeroWindow,
    #[error("rate_limit.max_requests must be greater than 0")]
    ZeroMaxRequests,
    #[error("validation.{field}: min {min} exceeds max {max}")]
    InvertedBounds {
        field: &'static str,
        min: usize,
        max: usize,
    },
    #[error("storage.retention_days must be greater than 0")]
    ZeroRetention,
    #[error("unknown storage backend '{0}' (expected \"memory\" or \"none\")")]
    UnknownBackend(String),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ContactConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.cors.allowed_origins.is_empty() {
        errors.push(ValidationError::EmptyAllowList);
    }

    if config.rate_limit.window_secs == 0 {
        errors.push(ValidationError::ZeroWindow);
    }
    if config.rate_limit.max_requests == 0 {
        errors.push(ValidationError::ZeroMaxRequests);
    }

    let v = &config.validation;
    if v.min_name_length > v.max_name_length {
        errors.push(ValidationError::InvertedBounds {
            field: "name_length",
            min: v.min_name_length,
            max: v.max_name_length,
        });
    }
    if v.min_message_length > v.max_message_length {
        errors.push(ValidationError::InvertedBounds {
            field: "message_length",
            min: v.min_message_length,
            max: v.max_message_length,
        });
    }

    if config.storage.retention_days == 0 {
        errors.push(ValidationError::ZeroRetention);
    }
    match config.storage.backend.as_str() {
        "memory" | "none" => {}
        other => errors.push(ValidationError::UnknownBackend(other.to_string())),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
