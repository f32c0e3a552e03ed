//! Key-value store trait for session state.

use async_trait::async_trait;
use toolsmith_error::StoreError;

/// String key-value persistence (browser storage, a file, a database row).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads a value.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes a value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Writes a value only if the key is absent. Returns true when written.
    async fn set_if_absent(&self, key: &str, value: &str) -> Result<bool, StoreError>;

    /// Keys starting with `prefix`, in no particular order.
    async fn keys(&self, prefix: &str) -> Result<Vec<String>, StoreError>;

    /// Deletes every listed key in one write. Returns how many existed.
    async fn remove(&self, keys: &[String]) -> Result<usize, StoreError>;
}
