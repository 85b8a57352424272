//! Submission records and their persistence.

use std::sync::Arc;

use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::store::{KvError, KvStore, PutOptions};

/// Key prefix for persisted submissions. Ids embed the creation time in
/// milliseconds so lexicographic key order approximates creation order.
pub const SUBMISSION_PREFIX: &str = "submission_";

const ID_SUFFIX_LEN: usize = 9;

/// A persisted contact-form entry. Immutable once created; the store's TTL
/// retires it after the retention period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    /// Creation instant, ISO-8601.
    pub timestamp: String,
    pub ip: String,
    pub country: String,
    #[serde(rename = "userAgent")]
    pub user_agent: String,
    /// Reserved for future triage tooling; never mutated here.
    #[serde(default)]
    pub read: bool,
}

/// Generate a submission id: `submission_<unixMillis>_<random>`.
pub fn generate_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_SUFFIX_LEN)
        .map(char::from)
        .collect();
    format!("{}{}_{}", SUBMISSION_PREFIX, Utc::now().timestamp_millis(), suffix)
}

/// One page of submissions plus the pagination handle to fetch the next.
#[derive(Debug)]
pub struct SubmissionPage {
    pub submissions: Vec<Submission>,
    pub cursor: Option<String>,
    pub list_complete: bool,
}

/// Persists and lists submissions over the key-value port.
#[derive(Clone)]
pub struct SubmissionStore {
    kv: Arc<dyn KvStore>,
    retention_secs: u64,
}

impl SubmissionStore {
    pub fn new(kv: Arc<dyn KvStore>, retention_days: u64) -> Self {
        Self {
            kv,
            retention_secs: retention_days * 86_400,
        }
    }

    pub fn kv(&self) -> &Arc<dyn KvStore> {
        &self.kv
    }

    /// Persist a submission under its id. The record is readable
    /// immediately after this returns.
    pub async fn create(&self, submission: &Submission) -> Result<(), KvError> {
        let value = serde_json::to_string(submission)?;
        let metadata = serde_json::json!({
            "email": submission.email,
            "timestamp": submission.timestamp,
        });
        self.kv
            .put(
                &submission.id,
                value,
                PutOptions {
                    expiration_ttl: Some(self.retention_secs),
                    metadata: Some(metadata),
                },
            )
            .await
    }

    /// Fetch up to `limit` submissions, resuming from `cursor`. Records on
    /// the page are returned newest first.
    ///
    /// `limit` must already be range-checked by the caller (1..=1000).
    pub async fn list(
        &self,
        limit: usize,
        cursor: Option<&str>,
    ) -> Result<SubmissionPage, KvError> {
        let page = self.kv.list(SUBMISSION_PREFIX, limit, cursor).await?;

        let mut submissions = Vec::with_capacity(page.keys.len());
        for key in &page.keys {
            // A key can expire between list and get; skip holes.
            if let Some(raw) = self.kv.get(key).await? {
                submissions.push(serde_json::from_str::<Submission>(&raw)?);
            }
        }
        submissions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        Ok(SubmissionPage {
            submissions,
            cursor: page.cursor,
            list_complete: page.list_complete,
        })
    }
}
