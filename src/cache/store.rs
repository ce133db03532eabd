//! Versioned, expiring snapshot of remote data.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{Prayer, UserProfile};
use crate::storage::KeyValueStore;

/// Storage key for the snapshot document.
const CACHE_KEY: &str = "app_cache";

/// Snapshots older than this are discarded on read.
const CACHE_EXPIRY_HOURS: i64 = 24;

/// Last-known copies of the remote resources, stored as one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheSnapshot {
    #[serde(default)]
    pub prayers: Vec<Prayer>,
    #[serde(default)]
    pub suggested_prayers: Vec<Prayer>,
    #[serde(default)]
    pub user_profile: Option<UserProfile>,
    pub last_updated: DateTime<Utc>,
    /// App version that wrote the snapshot. A mismatch invalidates it.
    pub version: String,
}

impl CacheSnapshot {
    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.last_updated).num_minutes()
    }
}

/// Partial update to the snapshot. Fields left as `None` keep their
/// previously cached value.
#[derive(Debug, Clone, Default)]
pub struct SnapshotPatch {
    pub prayers: Option<Vec<Prayer>>,
    pub suggested_prayers: Option<Vec<Prayer>>,
    /// Outer `Some` replaces the cached profile, including `Some(None)`
    /// to record that the profile no longer exists remotely.
    pub user_profile: Option<Option<UserProfile>>,
}

impl SnapshotPatch {
    pub fn prayers(prayers: Vec<Prayer>) -> Self {
        Self {
            prayers: Some(prayers),
            ..Self::default()
        }
    }

    pub fn suggested_prayers(suggested: Vec<Prayer>) -> Self {
        Self {
            suggested_prayers: Some(suggested),
            ..Self::default()
        }
    }

    pub fn user_profile(profile: Option<UserProfile>) -> Self {
        Self {
            user_profile: Some(profile),
            ..Self::default()
        }
    }
}

/// Durable local mirror of remote read-mostly data.
///
/// `write` is the only mutator; `read` only mutates by purging a snapshot
/// that has expired or was written by a different app version.
#[derive(Clone)]
pub struct CacheStore {
    kv: Arc<dyn KeyValueStore>,
    version: String,
}

impl CacheStore {
    /// Create a store tagged with the running crate version.
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::with_version(kv, env!("CARGO_PKG_VERSION"))
    }

    pub fn with_version(kv: Arc<dyn KeyValueStore>, version: impl Into<String>) -> Self {
        Self {
            kv,
            version: version.into(),
        }
    }

    /// Load the persisted snapshot.
    ///
    /// Returns None when no snapshot exists, when it cannot be parsed,
    /// or when it is expired or version-mismatched (both purge the
    /// on-disk record). I/O and parse failures are logged, never raised.
    pub async fn read(&self) -> Option<CacheSnapshot> {
        let raw = match self.kv.get(CACHE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "Failed to read cache snapshot");
                return None;
            }
        };

        let snapshot: CacheSnapshot = match serde_json::from_str(&raw) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Failed to parse cache snapshot, treating as absent");
                return None;
            }
        };

        let expired = Utc::now() - snapshot.last_updated > Duration::hours(CACHE_EXPIRY_HOURS);
        let version_mismatch = snapshot.version != self.version;

        if expired || version_mismatch {
            debug!(
                expired,
                version_mismatch,
                snapshot_version = %snapshot.version,
                "Purging invalid cache snapshot"
            );
            if let Err(e) = self.clear().await {
                warn!(error = %e, "Failed to purge invalid cache snapshot");
            }
            return None;
        }

        Some(snapshot)
    }

    /// Merge the patch into the current snapshot and persist the result,
    /// stamped with the current time and app version. Fields absent from
    /// the patch keep their cached value.
    pub async fn write(&self, patch: SnapshotPatch) -> Result<()> {
        let existing = self.read().await;

        let merged = CacheSnapshot {
            prayers: patch
                .prayers
                .or_else(|| existing.as_ref().map(|s| s.prayers.clone()))
                .unwrap_or_default(),
            suggested_prayers: patch
                .suggested_prayers
                .or_else(|| existing.as_ref().map(|s| s.suggested_prayers.clone()))
                .unwrap_or_default(),
            user_profile: patch
                .user_profile
                .unwrap_or_else(|| existing.as_ref().and_then(|s| s.user_profile.clone())),
            last_updated: Utc::now(),
            version: self.version.clone(),
        };

        let raw = serde_json::to_string(&merged).context("Failed to serialize cache snapshot")?;
        self.kv.set(CACHE_KEY, raw).await
    }

    /// Unconditionally delete the persisted snapshot.
    pub async fn clear(&self) -> Result<()> {
        self.kv.remove(CACHE_KEY).await
    }
}
