//! Online/offline bookkeeping for the sync layer.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::storage::KeyValueStore;

/// Storage key for the status record.
const SYNC_STATUS_KEY: &str = "sync_status";

/// Connectivity state as observed by the last sync attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub is_online: bool,
    pub last_sync_time: Option<DateTime<Utc>>,
    /// Carried in the persisted shape for a future offline mutation
    /// queue; nothing populates or drains it.
    #[serde(default)]
    pub pending_updates: Vec<serde_json::Value>,
}

impl Default for SyncStatus {
    fn default() -> Self {
        Self {
            is_online: true,
            last_sync_time: None,
            pending_updates: Vec::new(),
        }
    }
}

/// Persists [`SyncStatus`] in the key-value store. Reads degrade to the
/// default record on any failure.
#[derive(Clone)]
pub struct StatusStore {
    kv: Arc<dyn KeyValueStore>,
}

impl StatusStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub async fn load(&self) -> SyncStatus {
        let raw = match self.kv.get(SYNC_STATUS_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return SyncStatus::default(),
            Err(e) => {
                warn!(error = %e, "Failed to read sync status, using default");
                return SyncStatus::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(status) => status,
            Err(e) => {
                warn!(error = %e, "Failed to parse sync status, using default");
                SyncStatus::default()
            }
        }
    }

    async fn save(&self, status: &SyncStatus) -> Result<()> {
        self.kv
            .set(SYNC_STATUS_KEY, serde_json::to_string(status)?)
            .await
    }

    /// Record a successful sync at the given time.
    pub async fn mark_online(&self, at: DateTime<Utc>) -> Result<()> {
        let mut status = self.load().await;
        status.is_online = true;
        status.last_sync_time = Some(at);
        self.save(&status).await
    }

    /// Record a failed sync attempt.
    pub async fn mark_offline(&self) -> Result<()> {
        let mut status = self.load().await;
        status.is_online = false;
        self.save(&status).await
    }

    /// Reset to the never-synced default, used by forced refresh.
    pub async fn reset(&self) -> Result<()> {
        self.save(&SyncStatus::default()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn store() -> (Arc<MemoryStore>, StatusStore) {
        let kv = Arc::new(MemoryStore::new());
        (kv.clone(), StatusStore::new(kv))
    }

    #[tokio::test]
    async fn test_load_defaults_when_missing() {
        let (_kv, store) = store();
        let status = store.load().await;
        assert!(status.is_online);
        assert!(status.last_sync_time.is_none());
        assert!(status.pending_updates.is_empty());
    }

    #[tokio::test]
    async fn test_load_defaults_when_corrupt() {
        let (kv, store) = store();
        kv.set(SYNC_STATUS_KEY, "###".to_string())
            .await
            .expect("seed corrupt value");
        assert_eq!(store.load().await, SyncStatus::default());
    }

    #[tokio::test]
    async fn test_mark_offline_keeps_last_sync_time() {
        let (_kv, store) = store();
        let at = Utc::now();
        store.mark_online(at).await.expect("mark online");
        store.mark_offline().await.expect("mark offline");

        let status = store.load().await;
        assert!(!status.is_online);
        assert_eq!(status.last_sync_time, Some(at));
    }

    #[tokio::test]
    async fn test_reset_clears_last_sync_time() {
        let (_kv, store) = store();
        store.mark_online(Utc::now()).await.expect("mark online");
        store.reset().await.expect("reset");

        let status = store.load().await;
        assert!(status.is_online);
        assert!(status.last_sync_time.is_none());
    }
}
