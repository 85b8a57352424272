//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! contact-form API. All types derive Serde traits for deserialization
//! from config files, and every field has a default so a minimal (or
//! absent) config file works.

use serde::{Deserialize, Serialize};

/// Root configuration for the contact-form API.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ContactConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// CORS allow-list.
    pub cors: CorsConfig,

    /// Per-IP rate limiting.
    pub rate_limit: RateLimitConfig,

    /// Field validation bounds.
    pub validation: ValidationConfig,

    /// Submission storage.
    pub storage: StorageConfig,

    /// Bot-challenge verification.
    pub challenge: ChallengeConfig,

    /// Listing API authentication.
    pub api: ApiConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    /// Covers outbound calls made on behalf of the request too.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins, matched by prefix. The first entry is the
    /// fallback when a request origin matches none.
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:8788".to_string(),
                "http://localhost:4000".to_string(),
            ],
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Window length in seconds.
    pub window_secs: u64,

    /// Maximum attempts per IP within one window.
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: 60,
            max_requests: 5,
        }
    }
}

/// Field validation bounds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub min_name_length: usize,
    pub max_name_length: usize,
    pub min_message_length: usize,
    pub max_message_length: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_name_length: 2,
            max_name_length: 200,
            min_message_length: 50,
            max_message_length: 8000,
        }
    }
}

/// Submission storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Store backend: "memory", or "none" to run without persistence
    /// (submissions are rejected with 503).
    pub backend: String,

    /// Days a submission is retained before the store's TTL retires it.
    pub retention_days: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            retention_days: 90,
        }
    }
}

/// Bot-challenge verification configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChallengeConfig {
    /// Provider secret. When unset, token verification is skipped (the
    /// token itself is still required).
    pub secret_key: Option<String>,

    /// Siteverify endpoint.
    pub verify_url: String,
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            verify_url: "https://challenges.cloudflare.com/turnstile/v0/siteverify".to_string(),
        }
    }
}

/// Listing API configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ApiConfig {
    /// Key required to list submissions. When unset, listing always
    /// answers with the generic status payload.
    pub api_key: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
