//! Durable key-value storage abstraction.
//!
//! Plugins persist their records through the host's storage engine,
//! modeled here as a narrow get/put/delete/list interface. The engine
//! guarantees per-key atomicity for individual calls but no cross-call
//! transactions; read-modify-write sequences are last-writer-wins.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use crate::error::StorageError;

/// A single stored entry: a key and an opaque serialized value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEntry {
    /// Storage key
    pub key: String,
    /// Serialized value bytes
    pub value: Vec<u8>,
}

impl StorageEntry {
    /// Create an entry by JSON-encoding a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be serialized.
    pub fn json<T: Serialize>(key: impl Into<String>, value: &T) -> Result<Self, StorageError> {
        Ok(Self {
            key: key.into(),
            value: serde_json::to_vec(value)?,
        })
    }

    /// Decode the entry value as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not valid JSON for `T`.
    pub fn decode_json<T: DeserializeOwned>(&self) -> Result<T, StorageError> {
        Ok(serde_json::from_slice(&self.value)?)
    }
}

/// Durable key-value storage provided by the host.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Get the entry stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<StorageEntry>, StorageError>;

    /// Store an entry, replacing any prior value under its key.
    async fn put(&self, entry: StorageEntry) -> Result<(), StorageError>;

    /// Delete the entry under `key`. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// List keys starting with `prefix`, with the prefix stripped, in
    /// sorted order. Remainders are full key suffixes; a nested key
    /// lists with its separators intact.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError>;
}

/// In-memory storage for tests and local development.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<StorageEntry>, StorageError> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).map(|value| StorageEntry {
            key: key.to_string(),
            value: value.clone(),
        }))
    }

    async fn put(&self, entry: StorageEntry) -> Result<(), StorageError> {
        self.entries.write().await.insert(entry.key, entry.value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let entries = self.entries.read().await;
        let mut keys: Vec<String> = entries
            .keys()
            .filter_map(|key| key.strip_prefix(prefix))
            .map(String::from)
            .collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        name: String,
        count: u32,
    }

    #[test]
    fn test_json_entry_round_trip() {
        let record = Record {
            name: "espresso".to_string(),
            count: 3,
        };
        let entry = StorageEntry::json("records/espresso", &record).unwrap();
        assert_eq!(entry.key, "records/espresso");

        let decoded: Record = entry.decode_json().unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_decode_rejects_mismatched_value() {
        let entry = StorageEntry {
            key: "bad".to_string(),
            value: b"not json".to_vec(),
        };
        assert!(matches!(
            entry.decode_json::<Record>(),
            Err(StorageError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let storage = MemoryStorage::new();
        let entry = StorageEntry::json("config", &42u32).unwrap();
        storage.put(entry.clone()).await.unwrap();

        let fetched = storage.get("config").await.unwrap();
        assert_eq!(fetched, Some(entry));
    }

    #[tokio::test]
    async fn test_get_missing_key_is_none() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("nothing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let storage = MemoryStorage::new();
        storage
            .put(StorageEntry::json("config", &1u32).unwrap())
            .await
            .unwrap();

        storage.delete("config").await.unwrap();
        storage.delete("config").await.unwrap();
        assert_eq!(storage.get("config").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_strips_prefix_and_sorts() {
        let storage = MemoryStorage::new();
        for key in ["role/beta", "role/alpha", "role/gamma", "config"] {
            storage
                .put(StorageEntry::json(key, &0u32).unwrap())
                .await
                .unwrap();
        }

        let roles = storage.list("role/").await.unwrap();
        assert_eq!(roles, vec!["alpha", "beta", "gamma"]);

        let everything = storage.list("").await.unwrap();
        assert_eq!(
            everything,
            vec!["config", "role/alpha", "role/beta", "role/gamma"]
        );
    }

    #[tokio::test]
    async fn test_list_keeps_nested_remainders() {
        let storage = MemoryStorage::new();
        for key in ["role/a", "role/a/b"] {
            storage
                .put(StorageEntry::json(key, &0u32).unwrap())
                .await
                .unwrap();
        }

        let roles = storage.list("role/").await.unwrap();
        assert_eq!(roles, vec!["a", "a/b"]);
    }
}
