//! Session state persisted to a JSON file.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use toolsmith_error::StoreError;
use toolsmith_interface::KeyValueStore;
use tracing::{debug, instrument};

/// Key-value store backed by one JSON object on disk.
///
/// Every write rewrites the file through a temporary sibling and a rename.
/// The in-memory map only changes once the file write succeeds.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Default location under the user's data directory.
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .map(|dir| dir.join("toolsmith").join("state.json"))
            .unwrap_or_else(|| PathBuf::from(".toolsmith_state.json"))
    }

    /// Opens the store, reading existing entries if the file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    #[instrument(fields(path = %path.as_ref().display()), skip(path))]
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(text) => serde_json::from_str(&text)
                .map_err(|e| StoreError::new(format!("Corrupt state file: {}", e)))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StoreError::new(format!("Failed to read state: {}", e))),
        };
        debug!(entries = entries.len(), "State file opened");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// File backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::new(format!("Failed to create state dir: {}", e)))?;
        }
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| StoreError::new(format!("Failed to encode state: {}", e)))?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| StoreError::new(format!("Failed to write state: {}", e)))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::new(format!("Failed to replace state: {}", e)))
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str) -> Result<bool, StoreError> {
        let mut entries = self.entries.lock().await;
        if entries.contains_key(key) {
            return Ok(false);
        }
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.persist(&next).await?;
        *entries = next;
        Ok(true)
    }

    async fn keys(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .entries
            .lock()
            .await
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn remove(&self, keys: &[String]) -> Result<usize, StoreError> {
        let mut entries = self.entries.lock().await;
        let mut next = entries.clone();
        let removed = keys.iter().filter(|k| next.remove(*k).is_some()).count();
        if removed == 0 {
            return Ok(0);
        }
        self.persist(&next).await?;
        *entries = next;
        Ok(removed)
    }
}
