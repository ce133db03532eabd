//! File-backed key-value store.
//!
//! Each key is stored as `<key>.json` under the store's root directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use futures::future::BoxFuture;

use super::KeyValueStore;

/// Durable store writing one file per key under a root directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at the given directory, creating it if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create storage directory: {}", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<String>>> {
        let path = self.path_for(key);
        Box::pin(async move {
            match tokio::fs::read_to_string(&path).await {
                Ok(contents) => Ok(Some(contents)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
            }
        })
    }

    fn set(&self, key: &str, value: String) -> BoxFuture<'_, Result<()>> {
        let path = self.path_for(key);
        // Write-then-rename so a crash mid-write never leaves a torn value.
        let tmp = self.root.join(format!("{}.json.tmp", key));
        Box::pin(async move {
            tokio::fs::write(&tmp, value)
                .await
                .with_context(|| format!("Failed to write {}", tmp.display()))?;
            tokio::fs::rename(&tmp, &path)
                .await
                .with_context(|| format!("Failed to replace {}", path.display()))?;
            Ok(())
        })
    }

    fn remove(&self, key: &str) -> BoxFuture<'_, Result<()>> {
        let path = self.path_for(key);
        Box::pin(async move {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
            }
        })
    }
}
