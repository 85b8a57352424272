//! CORS policy resolution.
//!
//! The policy is computed per request from the `Origin` header and the
//! configured allow-list. There is no failure case: a header set is always
//! produced, falling back to the first configured origin when nothing
//! matches. A localhost origin of any port is always allowed so local
//! development works without touching the allow-list.

use axum::http::header::{HeaderMap, HeaderName, HeaderValue};

const ALLOW_ORIGIN: HeaderName = HeaderName::from_static("access-control-allow-origin");
const ALLOW_METHODS: HeaderName = HeaderName::from_static("access-control-allow-methods");
const ALLOW_HEADERS: HeaderName = HeaderName::from_static("access-control-allow-headers");
const MAX_AGE: HeaderName = HeaderName::from_static("access-control-max-age");

/// Resolved CORS headers for one request.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allow_origin: String,
}

impl CorsPolicy {
    /// Resolve the policy for a request's `Origin` against the allow-list.
    ///
    /// An allowed origin matches if the request origin starts with the
    /// configured string. `allowed` must be non-empty (enforced by config
    /// validation).
    pub fn resolve(origin: Option<&str>, allowed: &[String]) -> Self {
        let origin = origin.unwrap_or("");

        let matched = allowed
            .iter()
            .find(|candidate| origin.starts_with(candidate.as_str()))
            .map(|s| s.as_str())
            .or_else(|| is_localhost_origin(origin).then_some(origin));

        let allow_origin = matched
            .or_else(|| allowed.first().map(|s| s.as_str()))
            .unwrap_or("")
            .to_string();

        Self { allow_origin }
    }

    pub fn allow_origin(&self) -> &str {
        &self.allow_origin
    }

    /// Write the full header set onto a response header map.
    pub fn apply(&self, headers: &mut HeaderMap) {
        if let Ok(value) = HeaderValue::from_str(&self.allow_origin) {
            headers.insert(ALLOW_ORIGIN, value);
        }
        headers.insert(ALLOW_METHODS, HeaderValue::from_static("POST, GET, OPTIONS"));
        headers.insert(
            ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type, X-API-Key"),
        );
        headers.insert(MAX_AGE, HeaderValue::from_static("86400"));
    }
}

/// `http://localhost:<port>` or `https://localhost:<port>`.
fn is_localhost_origin(origin: &str) -> bool {
    let rest = origin
        .strip_prefix("http://localhost:")
        .or_else(|| origin.strip_prefix("https://localhost:"));
    match rest {
        Some(port) => !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}
