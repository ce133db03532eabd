//! Cache-first access to remote resources.
//!
//! For each resource the coordinator offers a `sync_*` method (one
//! remote attempt, degrading to the cached value on failure) and a
//! `*_with_offline_support` method (serve the cache immediately when it
//! has data, refreshing in the background for next time).

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::api::RemoteDataSource;
use crate::cache::{CacheStore, SnapshotPatch};
use crate::models::{Prayer, UserProfile};

use super::status::{StatusStore, SyncStatus};

/// Refresh the snapshot once it is older than this, even though it is
/// still valid to serve.
const REFRESH_AFTER_MINUTES: i64 = 60;

/// Orchestrates "read cache first, refresh in background" semantics.
///
/// Clone is cheap; all fields are shared handles. Concurrent callers are
/// not deduplicated: each may trigger its own background refresh, and
/// the last full-snapshot write wins.
#[derive(Clone)]
pub struct SyncCoordinator {
    remote: Arc<dyn RemoteDataSource>,
    cache: CacheStore,
    status: StatusStore,
}

impl SyncCoordinator {
    pub fn new(remote: Arc<dyn RemoteDataSource>, cache: CacheStore, status: StatusStore) -> Self {
        Self {
            remote,
            cache,
            status,
        }
    }

    /// Current connectivity bookkeeping.
    pub async fn status(&self) -> SyncStatus {
        self.status.load().await
    }

    /// Record a successful fetch: cache write happens before the status
    /// update, so a caller observing the sync result can rely on the
    /// cache already holding it.
    async fn record_success(&self, patch: SnapshotPatch) {
        if let Err(e) = self.cache.write(patch).await {
            warn!(error = %e, "Failed to write cache after sync");
        }
        if let Err(e) = self.status.mark_online(Utc::now()).await {
            warn!(error = %e, "Failed to update sync status");
        }
    }

    async fn record_failure(&self) {
        if let Err(e) = self.status.mark_offline().await {
            warn!(error = %e, "Failed to update sync status");
        }
    }

    // ===== Prayer catalog =====

    /// Fetch the prayer catalog once, caching on success. On failure,
    /// returns whatever is cached (or an empty list) and flags offline.
    /// Never raises.
    pub async fn sync_prayers(&self) -> Vec<Prayer> {
        match self.remote.fetch_all_prayers().await {
            Ok(fresh) => {
                self.record_success(SnapshotPatch::prayers(fresh.clone()))
                    .await;
                fresh
            }
            Err(e) => {
                warn!(error = %e, "Prayer sync failed, serving cached data");
                self.record_failure().await;
                self.cache
                    .read()
                    .await
                    .map(|s| s.prayers)
                    .unwrap_or_default()
            }
        }
    }

    /// Serve prayers from the cache when it has any, refreshing in the
    /// background; otherwise sync now.
    pub async fn prayers_with_offline_support(&self) -> Vec<Prayer> {
        if let Some(snapshot) = self.cache.read().await {
            if !snapshot.prayers.is_empty() {
                debug!(count = snapshot.prayers.len(), "Serving prayers from cache");
                self.spawn_background(|this| async move {
                    this.sync_prayers().await;
                });
                return snapshot.prayers;
            }
        }
        self.sync_prayers().await
    }

    // ===== Suggested prayers =====

    pub async fn sync_suggested(&self) -> Vec<Prayer> {
        match self.remote.fetch_suggested_prayers().await {
            Ok(fresh) => {
                self.record_success(SnapshotPatch::suggested_prayers(fresh.clone()))
                    .await;
                fresh
            }
            Err(e) => {
                warn!(error = %e, "Suggested-prayer sync failed, serving cached data");
                self.record_failure().await;
                self.cache
                    .read()
                    .await
                    .map(|s| s.suggested_prayers)
                    .unwrap_or_default()
            }
        }
    }

    pub async fn suggested_with_offline_support(&self) -> Vec<Prayer> {
        if let Some(snapshot) = self.cache.read().await {
            if !snapshot.suggested_prayers.is_empty() {
                debug!(
                    count = snapshot.suggested_prayers.len(),
                    "Serving suggested prayers from cache"
                );
                self.spawn_background(|this| async move {
                    this.sync_suggested().await;
                });
                return snapshot.suggested_prayers;
            }
        }
        self.sync_suggested().await
    }

    // ===== User profile =====

    pub async fn sync_profile(&self, user_id: &str) -> Option<UserProfile> {
        match self.remote.fetch_user_profile(user_id).await {
            Ok(fresh) => {
                self.record_success(SnapshotPatch::user_profile(fresh.clone()))
                    .await;
                fresh
            }
            Err(e) => {
                warn!(error = %e, "Profile sync failed, serving cached data");
                self.record_failure().await;
                self.cache.read().await.and_then(|s| s.user_profile)
            }
        }
    }

    pub async fn profile_with_offline_support(&self, user_id: &str) -> Option<UserProfile> {
        if let Some(snapshot) = self.cache.read().await {
            if let Some(profile) = snapshot.user_profile {
                debug!(user_id, "Serving profile from cache");
                let user_id = user_id.to_string();
                self.spawn_background(move |this| async move {
                    this.sync_profile(&user_id).await;
                });
                return Some(profile);
            }
        }
        self.sync_profile(user_id).await
    }

    // ===== Invalidation =====

    /// Drop the cache and reset sync bookkeeping, so the next access is
    /// forced to go remote.
    pub async fn force_refresh(&self) {
        info!("Forcing refresh: clearing cache and sync status");
        if let Err(e) = self.cache.clear().await {
            warn!(error = %e, "Failed to clear cache for forced refresh");
        }
        if let Err(e) = self.status.reset().await {
            warn!(error = %e, "Failed to reset sync status");
        }
    }

    /// Whether the snapshot is absent, version-mismatched, or older than
    /// the refresh window.
    pub async fn needs_refresh(&self) -> bool {
        match self.cache.read().await {
            Some(snapshot) => snapshot.age_minutes() > REFRESH_AFTER_MINUTES,
            None => true,
        }
    }

    /// Detached background refresh. The task is never awaited and its
    /// failures are only logged inside the `sync_*` methods.
    fn spawn_background<F, Fut>(&self, task: F)
    where
        F: FnOnce(SyncCoordinator) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let this = self.clone();
        tokio::spawn(async move {
            task(this).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::BoxFuture;

    use crate::api::ApiError;
    use crate::cache::CacheStore;
    use crate::models::{PrayerCategory, ReminderSettings, VerseOfTheDay};
    use crate::storage::MemoryStore;

    fn prayer(id: &str) -> Prayer {
        Prayer {
            id: id.to_string(),
            title: id.to_string(),
            content: "text".to_string(),
            category: "devotional".to_string(),
            subcategory: None,
            description: None,
            tags: None,
            image: None,
            display_order: None,
            is_suggested: None,
            suggestion_order: None,
        }
    }

    fn profile(id: &str) -> UserProfile {
        UserProfile {
            id: id.to_string(),
            display_name: "Test".to_string(),
            email: "test@example.com".to_string(),
            first_name: None,
            last_name: None,
            student_number: None,
            role: Default::default(),
            bookmarks: Vec::new(),
            preferences: Default::default(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Stub remote: serves fixed data, or errors on every call.
    struct StubRemote {
        prayers: Vec<Prayer>,
        suggested: Vec<Prayer>,
        profile: Option<UserProfile>,
        fail: bool,
    }

    impl StubRemote {
        fn ok(prayers: Vec<Prayer>) -> Self {
            Self {
                prayers,
                suggested: Vec::new(),
                profile: None,
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                prayers: Vec::new(),
                suggested: Vec::new(),
                profile: None,
                fail: true,
            }
        }

        fn result<T: Clone>(&self, value: &T) -> Result<T, ApiError> {
            if self.fail {
                Err(ApiError::ServerError("stub failure".to_string()))
            } else {
                Ok(value.clone())
            }
        }
    }

    impl RemoteDataSource for StubRemote {
        fn fetch_all_prayers(&self) -> BoxFuture<'_, Result<Vec<Prayer>, ApiError>> {
            let result = self.result(&self.prayers);
            Box::pin(async move { result })
        }

        fn fetch_prayer_categories(&self) -> BoxFuture<'_, Result<Vec<PrayerCategory>, ApiError>> {
            let result = self.result(&Vec::new());
            Box::pin(async move { result })
        }

        fn fetch_suggested_prayers(&self) -> BoxFuture<'_, Result<Vec<Prayer>, ApiError>> {
            let result = self.result(&self.suggested);
            Box::pin(async move { result })
        }

        fn fetch_user_profile(
            &self,
            _user_id: &str,
        ) -> BoxFuture<'_, Result<Option<UserProfile>, ApiError>> {
            let result = self.result(&self.profile);
            Box::pin(async move { result })
        }

        fn add_bookmark(&self, _: &str, _: &str) -> BoxFuture<'_, Result<(), ApiError>> {
            Box::pin(async { Ok(()) })
        }

        fn remove_bookmark(&self, _: &str, _: &str) -> BoxFuture<'_, Result<(), ApiError>> {
            Box::pin(async { Ok(()) })
        }

        fn increment_prayer_count(&self, _: &str, _: &str) -> BoxFuture<'_, Result<(), ApiError>> {
            Box::pin(async { Ok(()) })
        }

        fn fetch_recent_prayers(&self, _: &str) -> BoxFuture<'_, Result<Vec<String>, ApiError>> {
            Box::pin(async { Ok(Vec::new()) })
        }

        fn add_recent_prayer(&self, _: &str, _: &str) -> BoxFuture<'_, Result<(), ApiError>> {
            Box::pin(async { Ok(()) })
        }

        fn update_preferences(
            &self,
            _: &str,
            _: &ReminderSettings,
        ) -> BoxFuture<'_, Result<(), ApiError>> {
            Box::pin(async { Ok(()) })
        }

        fn fetch_verse_of_the_day(
            &self,
            _: chrono::NaiveDate,
        ) -> BoxFuture<'_, Result<Option<VerseOfTheDay>, ApiError>> {
            Box::pin(async { Ok(None) })
        }
    }

    fn coordinator(remote: StubRemote) -> (Arc<MemoryStore>, SyncCoordinator) {
        let kv = Arc::new(MemoryStore::new());
        let cache = CacheStore::with_version(kv.clone(), "1.0.0");
        let status = StatusStore::new(kv.clone());
        (
            kv,
            SyncCoordinator::new(Arc::new(remote), cache, status),
        )
    }

    #[tokio::test]
    async fn test_sync_writes_cache_and_marks_online() {
        let (kv, coordinator) = coordinator(StubRemote::ok(vec![prayer("angelus")]));

        let prayers = coordinator.sync_prayers().await;
        assert_eq!(prayers.len(), 1);

        // Cache already holds the result when sync returns.
        let cache = CacheStore::with_version(kv, "1.0.0");
        assert_eq!(cache.read().await.expect("snapshot").prayers, prayers);

        let status = coordinator.status().await;
        assert!(status.is_online);
        assert!(status.last_sync_time.is_some());
    }

    #[tokio::test]
    async fn test_sync_degrades_to_cached_value_on_failure() {
        let (kv, ok) = coordinator(StubRemote::ok(vec![prayer("angelus")]));
        ok.sync_prayers().await;

        let cache = CacheStore::with_version(kv.clone(), "1.0.0");
        let status = StatusStore::new(kv);
        let failing = SyncCoordinator::new(Arc::new(StubRemote::failing()), cache, status);

        let prayers = failing.sync_prayers().await;
        assert_eq!(prayers.len(), 1);
        assert_eq!(prayers[0].id, "angelus");
        assert!(!failing.status().await.is_online);
    }

    #[tokio::test]
    async fn test_sync_returns_empty_default_when_nothing_cached() {
        let (_kv, coordinator) = coordinator(StubRemote::failing());
        assert!(coordinator.sync_prayers().await.is_empty());
        assert!(coordinator.sync_suggested().await.is_empty());
        assert!(coordinator.sync_profile("user-1").await.is_none());
        assert!(!coordinator.status().await.is_online);
    }

    #[tokio::test]
    async fn test_offline_support_serves_cache_without_waiting() {
        let (kv, seeded) = coordinator(StubRemote::ok(vec![prayer("angelus")]));
        seeded.sync_prayers().await;

        // Even with the remote failing, cached data is returned.
        let cache = CacheStore::with_version(kv.clone(), "1.0.0");
        let status = StatusStore::new(kv);
        let failing = SyncCoordinator::new(Arc::new(StubRemote::failing()), cache, status);

        let prayers = failing.prayers_with_offline_support().await;
        assert_eq!(prayers.len(), 1);
    }

    #[tokio::test]
    async fn test_offline_support_syncs_when_cache_empty() {
        let (_kv, coordinator) = coordinator(StubRemote::ok(vec![prayer("angelus")]));
        let prayers = coordinator.prayers_with_offline_support().await;
        assert_eq!(prayers.len(), 1);
    }

    #[tokio::test]
    async fn test_profile_offline_support() {
        let kv = Arc::new(MemoryStore::new());
        let cache = CacheStore::with_version(kv.clone(), "1.0.0");
        let status = StatusStore::new(kv.clone());
        let remote = StubRemote {
            prayers: Vec::new(),
            suggested: Vec::new(),
            profile: Some(profile("user-1")),
            fail: false,
        };
        let coordinator = SyncCoordinator::new(Arc::new(remote), cache, status);

        // First call has no cache: blocking sync.
        let first = coordinator.profile_with_offline_support("user-1").await;
        assert_eq!(first.expect("profile").id, "user-1");

        // Second call is served from the cache.
        let second = coordinator.profile_with_offline_support("user-1").await;
        assert_eq!(second.expect("profile").id, "user-1");
    }

    #[tokio::test]
    async fn test_force_refresh_clears_cache_and_status() {
        let (kv, coordinator) = coordinator(StubRemote::ok(vec![prayer("angelus")]));
        coordinator.sync_prayers().await;
        assert!(!coordinator.needs_refresh().await);

        coordinator.force_refresh().await;

        let cache = CacheStore::with_version(kv, "1.0.0");
        assert!(cache.read().await.is_none());
        assert!(coordinator.needs_refresh().await);
        assert!(coordinator.status().await.last_sync_time.is_none());
    }

    #[tokio::test]
    async fn test_needs_refresh_true_without_cache() {
        let (_kv, coordinator) = coordinator(StubRemote::failing());
        assert!(coordinator.needs_refresh().await);
    }
}
