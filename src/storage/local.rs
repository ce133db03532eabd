//! Device-local user state.
//!
//! Small flags and lists that live outside the cache snapshot: onboarding
//! and tutorial flags, the visited-tab set, and the bookmark / recent /
//! per-prayer-count lists used while no account is signed in. Every read
//! degrades to a default when the value is missing or unreadable.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::models::{push_recent, RECENT_PRAYERS_LIMIT};

use super::KeyValueStore;

const ONBOARDING_COMPLETED_KEY: &str = "onboarding_completed";
const BOOKMARKS_KEY: &str = "user_bookmarks";
const RECENT_PRAYERS_KEY: &str = "recent_prayers";
const PRAYER_STATS_KEY: &str = "prayer_stats";
const NAV_INSTRUCTION_SEEN_KEY: &str = "nav_instruction_seen";
const USER_LOGGED_IN_KEY: &str = "user_logged_in";
const FEATURE_OVERLAY_SEEN_KEY: &str = "feature_overlay_seen";
const VISITED_TABS_KEY: &str = "visited_tabs";

/// Local user state over an injected key-value backend.
#[derive(Clone)]
pub struct LocalState {
    kv: Arc<dyn KeyValueStore>,
}

impl LocalState {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    async fn read_flag(&self, key: &str) -> bool {
        match self.kv.get(key).await {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                warn!(key, error = %e, "Failed to read flag, defaulting to false");
                false
            }
        }
    }

    async fn write_flag(&self, key: &str, value: bool) -> Result<()> {
        self.kv.set(key, value.to_string()).await
    }

    async fn read_json<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let raw = match self.kv.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(e) => {
                warn!(key, error = %e, "Failed to read local value, using default");
                return T::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Failed to parse local value, using default");
                T::default()
            }
        }
    }

    async fn write_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        self.kv.set(key, serde_json::to_string(value)?).await
    }

    // ===== Onboarding =====

    pub async fn is_onboarding_completed(&self) -> bool {
        self.read_flag(ONBOARDING_COMPLETED_KEY).await
    }

    pub async fn mark_onboarding_completed(&self) -> Result<()> {
        self.write_flag(ONBOARDING_COMPLETED_KEY, true).await
    }

    pub async fn reset_onboarding(&self) -> Result<()> {
        self.kv.remove(ONBOARDING_COMPLETED_KEY).await
    }

    // ===== Login flag =====

    pub async fn is_user_logged_in(&self) -> bool {
        self.read_flag(USER_LOGGED_IN_KEY).await
    }

    pub async fn mark_user_logged_in(&self) -> Result<()> {
        self.write_flag(USER_LOGGED_IN_KEY, true).await
    }

    pub async fn mark_user_logged_out(&self) -> Result<()> {
        self.write_flag(USER_LOGGED_IN_KEY, false).await
    }

    // ===== Tutorial overlays =====

    pub async fn has_seen_nav_instruction(&self) -> bool {
        self.read_flag(NAV_INSTRUCTION_SEEN_KEY).await
    }

    pub async fn mark_nav_instruction_seen(&self) -> Result<()> {
        self.write_flag(NAV_INSTRUCTION_SEEN_KEY, true).await
    }

    pub async fn has_seen_feature_overlay(&self) -> bool {
        self.read_flag(FEATURE_OVERLAY_SEEN_KEY).await
    }

    pub async fn mark_feature_overlay_seen(&self) -> Result<()> {
        self.write_flag(FEATURE_OVERLAY_SEEN_KEY, true).await
    }

    pub async fn reset_feature_overlay(&self) -> Result<()> {
        self.kv.remove(FEATURE_OVERLAY_SEEN_KEY).await
    }

    // ===== Visited tabs =====

    pub async fn visited_tabs(&self) -> Vec<String> {
        self.read_json(VISITED_TABS_KEY).await
    }

    pub async fn mark_tab_visited(&self, tab: &str) -> Result<()> {
        let mut tabs = self.visited_tabs().await;
        if !tabs.iter().any(|t| t == tab) {
            tabs.push(tab.to_string());
            self.write_json(VISITED_TABS_KEY, &tabs).await?;
        }
        Ok(())
    }

    pub async fn reset_visited_tabs(&self) -> Result<()> {
        self.kv.remove(VISITED_TABS_KEY).await
    }

    // ===== Bookmarks (unauthenticated) =====

    pub async fn bookmarks(&self) -> Vec<String> {
        self.read_json(BOOKMARKS_KEY).await
    }

    pub async fn add_bookmark(&self, prayer_id: &str) -> Result<()> {
        let mut bookmarks = self.bookmarks().await;
        if !bookmarks.iter().any(|id| id == prayer_id) {
            bookmarks.push(prayer_id.to_string());
            self.write_json(BOOKMARKS_KEY, &bookmarks).await?;
        }
        Ok(())
    }

    pub async fn remove_bookmark(&self, prayer_id: &str) -> Result<()> {
        let bookmarks: Vec<String> = self
            .bookmarks()
            .await
            .into_iter()
            .filter(|id| id != prayer_id)
            .collect();
        self.write_json(BOOKMARKS_KEY, &bookmarks).await
    }

    pub async fn is_bookmarked(&self, prayer_id: &str) -> bool {
        self.bookmarks().await.iter().any(|id| id == prayer_id)
    }

    // ===== Recent prayers (unauthenticated) =====

    pub async fn recent_prayers(&self) -> Vec<String> {
        self.read_json(RECENT_PRAYERS_KEY).await
    }

    pub async fn add_recent_prayer(&self, prayer_id: &str) -> Result<()> {
        let updated = push_recent(&self.recent_prayers().await, prayer_id);
        debug_assert!(updated.len() <= RECENT_PRAYERS_LIMIT);
        self.write_json(RECENT_PRAYERS_KEY, &updated).await
    }

    // ===== Prayer statistics (unauthenticated) =====

    pub async fn prayer_stats(&self) -> HashMap<String, u64> {
        self.read_json(PRAYER_STATS_KEY).await
    }

    pub async fn increment_prayer_count(&self, prayer_id: &str) -> Result<()> {
        let mut stats = self.prayer_stats().await;
        *stats.entry(prayer_id.to_string()).or_insert(0) += 1;
        self.write_json(PRAYER_STATS_KEY, &stats).await
    }
}
