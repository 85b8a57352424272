//! Key-value storage subsystem.
//!
//! # Data Flow
//! ```text
//! Submit pipeline:
//!     → rate_limit counter (get/put with TTL)
//!     → submissions.rs (create record, put with TTL + metadata)
//!
//! List pipeline:
//!     → submissions.rs (list keys by prefix, fetch each record)
//! ```
//!
//! # Design Decisions
//! - The durable store is an external collaborator; the crate talks to it
//!   only through the `KvStore` trait
//! - Read-your-writes per key is assumed; cross-key transactions are not
//! - Expiry is the store's job (TTL on put), never application sweeps

pub mod memory;
pub mod submissions;

pub use memory::MemoryKv;
pub use submissions::{Submission, SubmissionStore, SUBMISSION_PREFIX};

use async_trait::async_trait;

/// Error type for store operations.
#[derive(Debug, thiserror::Error)]
pub enum KvError {
    #[error("store backend error: {0}")]
    Backend(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Options applied on write.
#[derive(Debug, Default, Clone)]
pub struct PutOptions {
    /// Seconds until the key expires. `None` means no expiry.
    pub expiration_ttl: Option<u64>,
    /// Lightweight metadata stored alongside the value for out-of-band
    /// indexing.
    pub metadata: Option<serde_json::Value>,
}

/// One page of keys from a prefix listing.
#[derive(Debug, Clone)]
pub struct KvListPage {
    /// Matching keys in lexicographic order.
    pub keys: Vec<String>,
    /// Opaque token to resume from; `None` when the listing is complete.
    pub cursor: Option<String>,
    /// True when there are no further pages.
    pub list_complete: bool,
}

/// Durable key-value mapping contract.
///
/// Implementations must provide read-your-writes consistency per key: a
/// `get` issued after a successful `put` of the same key observes the new
/// value.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, KvError>;

    async fn put(&self, key: &str, value: String, opts: PutOptions) -> Result<(), KvError>;

    /// List up to `limit` keys starting with `prefix`, resuming after
    /// `cursor` when given.
    async fn list(
        &self,
        prefix: &str,
        limit: usize,
        cursor: Option<&str>,
    ) -> Result<KvListPage, KvError>;
}
