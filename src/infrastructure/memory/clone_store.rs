//! In-Memory Clone Store Implementation

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::application::ports::{CloneStorePort, StoreError};
use crate::domain::CloneId;

/// 内存克隆存储
pub struct InMemoryCloneStore {
    records: DashMap<String, Vec<u8>>,
    operations: AtomicUsize,
}

impl InMemoryCloneStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            operations: AtomicUsize::new(0),
        }
    }

    /// 已执行的读写次数
    pub fn operation_count(&self) -> usize {
        self.operations.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for InMemoryCloneStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CloneStorePort for InMemoryCloneStore {
    async fn put(&self, key: &CloneId, record: &[u8]) -> Result<(), StoreError> {
        self.operations.fetch_add(1, Ordering::SeqCst);
        match self.records.entry(key.as_str().to_string()) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists(key.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(record.to_vec());
                tracing::debug!(clone_id = %key, "Clone record stored in memory");
                Ok(())
            }
        }
    }

    async fn get(&self, key: &CloneId) -> Result<Option<Vec<u8>>, StoreError> {
        self.operations.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.get(key.as_str()).map(|r| r.value().clone()))
    }

    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        let mut keys: Vec<String> = self.records.iter().map(|r| r.key().clone()).collect();
        keys.sort();
        Ok(keys)
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> CloneId {
        CloneId::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_put_get() {
        let store = InMemoryCloneStore::new();
        store.put(&key("voice_a_01"), b"{}").await.unwrap();

        assert_eq!(store.get(&key("voice_a_01")).await.unwrap().unwrap(), b"{}");
        assert!(store.get(&key("voice_b_02")).await.unwrap().is_none());
        assert_eq!(store.operation_count(), 3);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_put_never_overwrites() {
        let store = InMemoryCloneStore::new();
        store.put(&key("voice_a_01"), b"first").await.unwrap();

        let err = store.put(&key("voice_a_01"), b"second").await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(_)));
        assert_eq!(store.get(&key("voice_a_01")).await.unwrap().unwrap(), b"first");
    }

    #[tokio::test]
    async fn test_keys_sorted() {
        let store = InMemoryCloneStore::new();
        store.put(&key("voice_b_02"), b"{}").await.unwrap();
        store.put(&key("voice_a_01"), b"{}").await.unwrap();
        assert_eq!(store.keys().await.unwrap(), vec!["voice_a_01", "voice_b_02"]);
    }
}
