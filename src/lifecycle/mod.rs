//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup: load config → validate → build server → bind listener
//! Shutdown: SIGINT → Shutdown::trigger → serve loop drains and exits
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
