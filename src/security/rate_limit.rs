//! Per-IP rate limiting over the key-value store.
//!
//! A fixed-window counter lives under `ratelimit-<ip>` with TTL equal to
//! the window, so the counter resets implicitly when the window lapses.
//!
//! The check-then-increment is not atomic: two requests from one IP can
//! both read a stale counter and both pass. The external store offers no
//! atomic increment, and the abuse-prevention goal here tolerates the
//! race. Strict quota enforcement would need a compare-and-swap primitive
//! from the backing store.

use std::sync::Arc;

use crate::store::{KvError, KvStore, PutOptions};

const KEY_PREFIX: &str = "ratelimit-";

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// Under the limit; the counter was incremented.
    Allowed,
    /// At or over the limit; the counter was left untouched.
    Limited,
}

/// Fixed-window counter keyed by client IP.
#[derive(Clone)]
pub struct RateLimiter {
    kv: Arc<dyn KvStore>,
    window_secs: u64,
    max_requests: u32,
}

impl RateLimiter {
    pub fn new(kv: Arc<dyn KvStore>, window_secs: u64, max_requests: u32) -> Self {
        Self {
            kv,
            window_secs,
            max_requests,
        }
    }

    /// Check and consume one attempt for `ip`.
    ///
    /// Every allowed call increments the counter, including requests that
    /// later fail validation; failed attempts still consume budget.
    pub async fn check(&self, ip: &str) -> Result<RateLimitDecision, KvError> {
        let key = format!("{KEY_PREFIX}{ip}");

        let attempts = match self.kv.get(&key).await? {
            // An unparseable counter counts as zero.
            Some(raw) => raw.parse::<u32>().unwrap_or(0),
            None => 0,
        };

        if attempts >= self.max_requests {
            tracing::warn!(client = %ip, attempts, "Rate limit exceeded");
            return Ok(RateLimitDecision::Limited);
        }

        self.kv
            .put(
                &key,
                (attempts + 1).to_string(),
                PutOptions {
                    expiration_ttl: Some(self.window_secs),
                    metadata: None,
                },
            )
            .await?;

        Ok(RateLimitDecision::Allowed)
    }
}
