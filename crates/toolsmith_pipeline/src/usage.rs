//! Per-tool usage counting, at most once per submission.

use derive_new::new;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use toolsmith_error::StoreError;
use toolsmith_interface::KeyValueStore;
use tracing::{debug, instrument, warn};

/// Counts successful generations per tool.
///
/// Each (session, sequence) pair is counted once even if `record` is called
/// again for it. Store failures are logged and dropped; counts may lag.
#[derive(Clone, new)]
pub struct UsageRecorder {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for UsageRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsageRecorder").finish_non_exhaustive()
    }
}

const MARKER_PREFIX: &str = "usage:seen:";

fn count_key(tool_id: &str) -> String {
    format!("usage:count:{}", tool_id)
}

impl UsageRecorder {
    /// Store key marking a submission as counted.
    pub fn dedupe_key(session_id: &str, sequence: u64) -> String {
        let digest = Sha256::digest(format!("{}:{}", session_id, sequence).as_bytes());
        format!("{}{:x}", MARKER_PREFIX, digest)
    }

    /// Drops the dedupe markers of earlier sessions.
    ///
    /// Markers only guard against recounting a live submission, so they
    /// are cleared whenever a new session starts. Per-tool counts are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be listed or written.
    #[instrument(skip(self))]
    pub async fn clear_markers(&self) -> Result<usize, StoreError> {
        let markers = self.store.keys(MARKER_PREFIX).await?;
        if markers.is_empty() {
            return Ok(0);
        }
        let removed = self.store.remove(&markers).await?;
        debug!(removed, "Cleared usage markers");
        Ok(removed)
    }

    /// Counts one use of `tool_id`. Returns true if this call incremented the count.
    pub async fn record(&self, session_id: &str, sequence: u64, tool_id: &str) -> bool {
        match self.try_record(session_id, sequence, tool_id).await {
            Ok(counted) => counted,
            Err(e) => {
                warn!(tool_id, sequence, error = %e, "Failed to record usage");
                false
            }
        }
    }

    async fn try_record(
        &self,
        session_id: &str,
        sequence: u64,
        tool_id: &str,
    ) -> Result<bool, StoreError> {
        let marker = Self::dedupe_key(session_id, sequence);
        if !self.store.set_if_absent(&marker, tool_id).await? {
            debug!(tool_id, sequence, "Usage already recorded");
            return Ok(false);
        }
        let key = count_key(tool_id);
        let current = self.read_count(&key).await?;
        self.store.set(&key, &(current + 1).to_string()).await?;
        Ok(true)
    }

    async fn read_count(&self, key: &str) -> Result<u64, StoreError> {
        Ok(self
            .store
            .get(key)
            .await?
            .and_then(|v| v.parse().ok())
            .unwrap_or(0))
    }

    /// Recorded uses of `tool_id`; 0 if unknown or unreadable.
    pub async fn count(&self, tool_id: &str) -> u64 {
        self.read_count(&count_key(tool_id)).await.unwrap_or_else(|e| {
            warn!(tool_id, error = %e, "Failed to read usage count");
            0
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryStore;

    #[tokio::test]
    async fn test_repeat_record_counts_once() {
        let recorder = UsageRecorder::new(Arc::new(InMemoryStore::new()));
        assert!(recorder.record("s1", 1, "email-writer").await);
        assert!(!recorder.record("s1", 1, "email-writer").await);
        assert!(recorder.record("s1", 2, "email-writer").await);
        assert!(recorder.record("s2", 1, "email-writer").await);
        assert_eq!(recorder.count("email-writer").await, 3);
        assert_eq!(recorder.count("logo-generator").await, 0);
    }

    #[tokio::test]
    async fn test_clear_markers_keeps_counts() {
        let store = Arc::new(InMemoryStore::new());
        let recorder = UsageRecorder::new(store.clone());
        recorder.record("s1", 1, "email-writer").await;
        recorder.record("s1", 2, "logo-generator").await;
        assert_eq!(store.keys(MARKER_PREFIX).await.unwrap().len(), 2);

        assert_eq!(recorder.clear_markers().await.unwrap(), 2);
        assert!(store.keys(MARKER_PREFIX).await.unwrap().is_empty());
        assert_eq!(recorder.count("email-writer").await, 1);
        assert_eq!(recorder.clear_markers().await.unwrap(), 0);
    }

    #[test]
    fn test_dedupe_key_is_stable() {
        let a = UsageRecorder::dedupe_key("s1", 7);
        assert_eq!(a, UsageRecorder::dedupe_key("s1", 7));
        assert_ne!(a, UsageRecorder::dedupe_key("s1", 8));
        assert_eq!(a.len(), "usage:seen:".len() + 64);
    }
}
