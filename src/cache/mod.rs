//! Local caching module for offline data access.
//!
//! This module provides the `CacheStore`, a durable snapshot of the
//! prayer catalog, suggested-prayer list, and user profile. Snapshots
//! are stored as a single JSON document, expire after 24 hours, and are
//! discarded when written by a different app version.

pub mod store;

pub use store::{CacheSnapshot, CacheStore, SnapshotPatch};
