//! In-memory key-value store.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use futures::future::BoxFuture;

use super::KeyValueStore;

/// Ephemeral store backed by a map. The test double for [`FileStore`],
/// also usable where persistence across restarts is not wanted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<String>>> {
        let value = self.values.lock().expect("store lock").get(key).cloned();
        Box::pin(async move { Ok(value) })
    }

    fn set(&self, key: &str, value: String) -> BoxFuture<'_, Result<()>> {
        self.values
            .lock()
            .expect("store lock")
            .insert(key.to_string(), value);
        Box::pin(async move { Ok(()) })
    }

    fn remove(&self, key: &str) -> BoxFuture<'_, Result<()>> {
        self.values.lock().expect("store lock").remove(key);
        Box::pin(async move { Ok(()) })
    }
}
