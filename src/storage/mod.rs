//! Local persistence primitives.
//!
//! Everything durable on the device goes through the [`KeyValueStore`]
//! trait: the cache snapshot, the sync status record, and the small flags
//! and lists in [`LocalState`]. Consumers receive an injected store rather
//! than reaching for a global, so tests can substitute [`MemoryStore`].

pub mod file;
pub mod local;
pub mod memory;

use anyhow::Result;
use futures::future::BoxFuture;

pub use file::FileStore;
pub use local::LocalState;
pub use memory::MemoryStore;

/// A durable async key-value store holding string values.
///
/// Implementations must tolerate concurrent calls from a single-threaded
/// cooperative scheduler; no cross-key transactionality is expected.
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or None when the key is absent.
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<String>>>;

    /// Stores a value, replacing any previous value for the key.
    fn set(&self, key: &str, value: String) -> BoxFuture<'_, Result<()>>;

    /// Removes the key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> BoxFuture<'_, Result<()>>;
}
