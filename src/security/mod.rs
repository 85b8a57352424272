//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → cors.rs (resolve response headers from Origin)
//!     → rate_limit.rs (check per-IP counter in the store)
//!     → challenge.rs (verify bot-challenge token, if configured)
//!     → Pass to validation and persistence
//! ```
//!
//! # Design Decisions
//! - Fail closed: challenge verifier transport failures reject the request
//! - CORS headers are attached to every response, including errors
//! - No trust in client input

pub mod challenge;
pub mod cors;
pub mod rate_limit;

pub use challenge::{ChallengeError, ChallengeVerifier};
pub use cors::CorsPolicy;
pub use rate_limit::{RateLimitDecision, RateLimiter};
