//! Observability subsystem.
//!
//! Structured logging is initialized in `main` via `tracing-subscriber`;
//! this module carries the metrics counters and exporter.

pub mod metrics;
