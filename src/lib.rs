//! Contact-form API service.
//!
//! A small HTTP backend for a single contact form: accept a submission
//! after a fixed pipeline of checks, and list stored submissions behind
//! an API key.
//!
//! # Architecture Overview
//!
//! ```text
//! POST /api/contact
//!     → security/cors      (resolve response headers)
//!     → security/rate_limit (per-IP counter in the KV store)
//!     → forms/parser        (JSON / form-encoded / multipart)
//!     → security/challenge  (bot-token verification, if configured)
//!     → forms/validate      (presence, email, length bounds)
//!     → store/submissions   (persist with TTL)
//!
//! GET /api/contact
//!     → security/cors
//!     → API-key check (masked: wrong key gets a 200 status payload)
//!     → store/submissions   (paginated listing)
//! ```
//!
//! All shared state lives in the external key-value store behind the
//! `KvStore` trait; requests are handled independently with no in-process
//! mutable state between them.

// Core subsystems
pub mod config;
pub mod forms;
pub mod http;
pub mod store;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::ContactConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
