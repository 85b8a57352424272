//! Field validation rules.
//!
//! Rules run in a fixed order and the first failure wins, so a request
//! with several problems reports the same error a browser-side validator
//! would surface first.

use std::sync::LazyLock;

use regex::Regex;

// One non-space local part, an @, a domain with at least one dot.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

/// Configured length bounds, in Unicode scalar values.
#[derive(Debug, Clone, Copy)]
pub struct FieldBounds {
    pub min_name: usize,
    pub max_name: usize,
    pub min_message: usize,
    pub max_message: usize,
}

/// Validate already-trimmed fields. Returns the human-readable error for
/// the first rule violated.
pub fn validate_fields(
    name: &str,
    email: &str,
    message: &str,
    bounds: &FieldBounds,
) -> Result<(), String> {
    if name.is_empty() || email.is_empty() || message.is_empty() {
        return Err("All fields are required".to_string());
    }

    if !EMAIL_RE.is_match(email) {
        return Err("Invalid email address".to_string());
    }

    let name_len = name.chars().count();
    if name_len < bounds.min_name || name_len > bounds.max_name {
        return Err(format!(
            "Name must be between {} and {} characters",
            bounds.min_name, bounds.max_name
        ));
    }

    let message_len = message.chars().count();
    if message_len < bounds.min_message || message_len > bounds.max_message {
        return Err(format!(
            "Message must be between {} and {} characters",
            bounds.min_message, bounds.max_message
        ));
    }

    Ok(())
}
