//! Offline-first core for a devotional prayer companion.
//!
//! The crate wires three pieces together:
//!
//! - [`cache::CacheStore`]: a durable, versioned, 24-hour-expiring
//!   snapshot of remote data (prayer catalog, suggested prayers, user
//!   profile) over an injected [`storage::KeyValueStore`].
//! - [`sync::SyncCoordinator`]: "read cache first, refresh in
//!   background" semantics against an abstract [`api::RemoteDataSource`],
//!   with online/offline bookkeeping and forced-refresh invalidation.
//!   Remote failures never reach the caller; they degrade to the best
//!   cached value.
//! - [`recommend`]: pure prayer-of-the-day and suggested-prayer
//!   selection from the catalog and the wall clock, with an injectable
//!   random tie-break.
//!
//! ```no_run
//! use std::sync::Arc;
//! use praycache::api::ApiClient;
//! use praycache::cache::CacheStore;
//! use praycache::config::Config;
//! use praycache::storage::FileStore;
//! use praycache::sync::{StatusStore, SyncCoordinator};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let kv = Arc::new(FileStore::new(config.data_dir()?)?);
//! let coordinator = SyncCoordinator::new(
//!     Arc::new(ApiClient::new()?),
//!     CacheStore::new(kv.clone()),
//!     StatusStore::new(kv),
//! );
//! let prayers = coordinator.prayers_with_offline_support().await;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod models;
pub mod recommend;
pub mod storage;
pub mod sync;

pub use api::{ApiClient, ApiError, RemoteDataSource};
pub use cache::{CacheSnapshot, CacheStore, SnapshotPatch};
pub use config::Config;
pub use models::{Prayer, PrayerCategory, UserProfile, VerseOfTheDay};
pub use recommend::{prayer_of_the_day, suggested_prayers, Recommendation, TimeContext};
pub use storage::{FileStore, KeyValueStore, LocalState, MemoryStore};
pub use sync::{StatusStore, SyncCoordinator, SyncStatus};
