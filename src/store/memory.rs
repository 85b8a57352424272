//! In-memory `KvStore` backed by a concurrent map.
//!
//! Used for local runs and tests. Expired entries are dropped lazily on
//! read and list; nothing sweeps in the background.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::store::{KvError, KvListPage, KvStore, PutOptions};

struct Entry {
    value: String,
    #[allow(dead_code)]
    metadata: Option<serde_json::Value>,
    expires_at: Option<Instant>,
}

impl Entry {
    fn expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

/// DashMap-backed store with TTL expiry and lexicographic listing.
#[derive(Default)]
pub struct MemoryKv {
    entries: DashMap<String, Entry>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        if let Some(entry) = self.entries.get(key) {
            if entry.expired() {
                drop(entry);
                self.entries.remove(key);
                return Ok(None);
            }
            return Ok(Some(entry.value.clone()));
        }
        Ok(None)
    }

    async fn put(&self, key: &str, value: String, opts: PutOptions) -> Result<(), KvError> {
        let expires_at = opts
            .expiration_ttl
            .map(|secs| Instant::now() + Duration::from_secs(secs));
        self.entries.insert(
            key.to_string(),
            Entry {
                value,
                metadata: opts.metadata,
                expires_at,
            },
        );
        Ok(())
    }

    async fn list(
        &self,
        prefix: &str,
        limit: usize,
        cursor: Option<&str>,
    ) -> Result<KvListPage, KvError> {
        let mut keys: Vec<String> = self
            .entries
            .iter()
            .filter(|e| e.key().starts_with(prefix) && !e.value().expired())
            .map(|e| e.key().clone())
            .collect();
        keys.sort();

        // The cursor is the last key of the previous page.
        if let Some(cursor) = cursor {
            keys.retain(|k| k.as_str() > cursor);
        }

        let list_complete = keys.len() <= limit;
        keys.truncate(limit);
        let cursor = if list_complete {
            None
        } else {
            keys.last().cloned()
        };

        Ok(KvListPage {
            keys,
            cursor,
            list_complete,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_returns_what_was_put() {
        let kv = MemoryKv::new();
        kv.put("a", "1".into(), PutOptions::default()).await.unwrap();
        assert_eq!(kv.get("a").await.unwrap(), Some("1".to_string()));
        assert_eq!(kv.get("b").await.unwrap(), None);
    }

    #[tokio::test]
    async fn expired_entries_are_gone() {
        let kv = MemoryKv::new();
        kv.put(
            "ttl",
            "x".into(),
            PutOptions {
                expiration_ttl: Some(0),
                metadata: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(kv.get("ttl").await.unwrap(), None);

        let page = kv.list("ttl", 10, None).await.unwrap();
        assert!(page.keys.is_empty());
        assert!(page.list_complete);
    }

    #[tokio::test]
    async fn list_pages_in_key_order() {
        let kv = MemoryKv::new();
        for k in ["sub_3", "sub_1", "other_9", "sub_2"] {
            kv.put(k, "v".into(), PutOptions::default()).await.unwrap();
        }

        let first = kv.list("sub_", 2, None).await.unwrap();
        assert_eq!(first.keys, vec!["sub_1", "sub_2"]);
        assert!(!first.list_complete);
        let cursor = first.cursor.expect("cursor on incomplete page");

        let second = kv.list("sub_", 2, Some(&cursor)).await.unwrap();
        assert_eq!(second.keys, vec!["sub_3"]);
        assert!(second.list_complete);
        assert!(second.cursor.is_none());
    }
}
