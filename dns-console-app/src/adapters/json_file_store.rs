//! JSON-file cache store.
//!
//! Persists the cache blobs to a single JSON file with atomic
//! write-then-rename. A corrupted or version-mismatched file degrades to an
//! empty store with a warning rather than failing the launch — the caches it
//! backs are rebuildable from the backend at any time.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::RwLock;

use dns_console_core::{CacheStore, CoreError, CoreResult};

/// On-disk format version.
const STORE_FILE_VERSION: u32 = 1;

/// Serializable store file format.
#[derive(Debug, Serialize, Deserialize)]
struct StoreFileFormat {
    version: u32,
    entries: HashMap<String, String>,
}

/// File-backed [`CacheStore`] holding every key in one JSON document.
///
/// Writes go to a temporary file first and are moved into place with an
/// atomic rename, so a crash mid-write never leaves a torn file behind.
pub struct JsonFileCacheStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl JsonFileCacheStore {
    /// Create or load a file-backed store.
    ///
    /// Parent directories are created as needed. An unreadable or
    /// version-mismatched file starts the store empty.
    pub async fn new<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    CoreError::StorageError(format!(
                        "Failed to create cache directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        let entries = Self::load_entries(&path).await;

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    async fn load_entries(path: &Path) -> HashMap<String, String> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
            Err(e) => {
                log::warn!("Failed to read cache file {}: {e}", path.display());
                return HashMap::new();
            }
        };

        let file: StoreFileFormat = match serde_json::from_str(&content) {
            Ok(file) => file,
            Err(e) => {
                log::warn!(
                    "Cache file {} is unreadable, starting empty: {e}",
                    path.display()
                );
                return HashMap::new();
            }
        };

        if file.version != STORE_FILE_VERSION {
            log::warn!(
                "Cache file {} has version {} (expected {STORE_FILE_VERSION}), starting empty",
                path.display(),
                file.version
            );
            return HashMap::new();
        }

        file.entries
    }

    /// Write the current map to disk atomically.
    async fn write_to_disk(&self) -> CoreResult<()> {
        let payload = {
            let entries = self.entries.read().await;
            StoreFileFormat {
                version: STORE_FILE_VERSION,
                entries: entries.clone(),
            }
        };

        let json = serde_json::to_string_pretty(&payload)
            .map_err(|e| CoreError::SerializationError(e.to_string()))?;

        let temp_path = self.temp_path();
        fs::write(&temp_path, json.as_bytes()).await.map_err(|e| {
            CoreError::StorageError(format!(
                "Failed to write temp cache file {}: {e}",
                temp_path.display()
            ))
        })?;

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            CoreError::StorageError(format!(
                "Failed to move cache file into place at {}: {e}",
                self.path.display()
            ))
        })?;

        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }
}

#[async_trait]
impl CacheStore for JsonFileCacheStore {
    async fn get(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        {
            let mut entries = self.entries.write().await;
            entries.insert(key.to_string(), value.to_string());
        }
        self.write_to_disk().await
    }

    async fn remove(&self, key: &str) -> CoreResult<()> {
        {
            let mut entries = self.entries.write().await;
            entries.remove(key);
        }
        self.write_to_disk().await
    }
}
