//! In-memory key-value store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use super::KvStore;
use crate::error::StoreError;

/// In-memory key-value store for tests and embedding.
///
/// Stores values in a thread-safe HashMap. Not persistent - all data is lost
/// when the last clone is dropped. Clones share state.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryStoreInner>>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    values: HashMap<String, Value>,
    fail_next_set: Option<String>,
    fail_next_remove: Option<String>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    fn inner(&self) -> MutexGuard<'_, MemoryStoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get the number of keys currently stored.
    pub fn len(&self) -> usize {
        self.inner().values.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.inner().values.is_empty()
    }

    /// Whether a key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.inner().values.contains_key(key)
    }

    /// Raw stored value, bypassing the async interface.
    pub fn raw(&self, key: &str) -> Option<Value> {
        self.inner().values.get(key).cloned()
    }

    /// All keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.inner().values.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Cause the next set() to fail with the given error.
    pub fn fail_next_set(&self, error: &str) {
        self.inner().fail_next_set = Some(error.to_string());
    }

    /// Cause the next remove() to fail with the given error.
    pub fn fail_next_remove(&self, error: &str) {
        self.inner().fail_next_remove = Some(error.to_string());
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.inner().values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut inner = self.inner();
        if let Some(error) = inner.fail_next_set.take() {
            return Err(StoreError::Backend(error));
        }
        inner.values.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut inner = self.inner();
        if let Some(error) = inner.fail_next_remove.take() {
            return Err(StoreError::Backend(error));
        }
        inner.values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn memory_store_set_get() {
        let store = MemoryStore::new();
        store.set("k", json!({"a": 1})).await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), Some(json!({"a": 1})));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn memory_store_missing_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn memory_store_overwrites() {
        let store = MemoryStore::new();
        store.set("k", json!(1)).await.unwrap();
        store.set("k", json!(2)).await.unwrap();
        assert_eq!(store.raw("k"), Some(json!(2)));
    }

    #[tokio::test]
    async fn memory_store_remove_is_idempotent() {
        let store = MemoryStore::new();
        store.set("k", json!(1)).await.unwrap();

        store.remove("k").await.unwrap();
        store.remove("k").await.unwrap();

        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn forced_failures_fire_once() {
        let store = MemoryStore::new();
        store.fail_next_set("disk full");
        assert!(matches!(
            store.set("k", json!(1)).await,
            Err(StoreError::Backend(_))
        ));
        assert!(!store.contains("k"));
        store.set("k", json!(1)).await.unwrap();

        store.fail_next_remove("locked");
        assert!(store.remove("k").await.is_err());
        assert!(store.contains("k"));
        store.remove("k").await.unwrap();
        assert!(!store.contains("k"));
    }

    #[tokio::test]
    async fn memory_store_clone_shares_state() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.set("b", json!(1)).await.unwrap();
        other.set("a", json!(2)).await.unwrap();
        assert_eq!(store.keys(), vec!["a".to_string(), "b".to_string()]);
    }
}
