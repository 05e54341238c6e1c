//! In-memory block storage backend.

use std::collections::HashMap;
use std::sync::RwLock;

use bytes::Bytes;
use silt_types::BlockId;
use tracing::debug;

use crate::error::StoreError;
use crate::traits::BlockStore;

/// In-memory block store backed by a `RwLock<HashMap>`.
///
/// Useful for testing and for ephemeral nodes. Tracks total bytes stored
/// against a configurable maximum; a full store rejects further puts, which
/// is also the standard way tests inject write failures.
pub struct MemoryStore {
    blocks: RwLock<HashMap<BlockId, Bytes>>,
    max_bytes: u64,
}

impl MemoryStore {
    /// Create a new in-memory store with the given capacity limit.
    pub fn new(max_bytes: u64) -> Self {
        Self {
            blocks: RwLock::new(HashMap::new()),
            max_bytes,
        }
    }

    /// Overwrite a block in place without touching its key.
    ///
    /// Bypasses content addressing entirely; exists so tests can simulate
    /// store-level bit rot.
    pub fn corrupt(&self, id: BlockId, data: Bytes) {
        let mut map = self.blocks.write().expect("lock poisoned");
        map.insert(id, data);
    }

    fn used_bytes_unlocked(map: &HashMap<BlockId, Bytes>) -> u64 {
        map.values().map(|v| v.len() as u64).sum()
    }
}

#[async_trait::async_trait]
impl BlockStore for MemoryStore {
    async fn put(&self, id: BlockId, data: Bytes) -> Result<(), StoreError> {
        let mut map = self.blocks.write().expect("lock poisoned");
        let used = Self::used_bytes_unlocked(&map);
        let data_len = data.len() as u64;

        // A duplicate put replaces identical content; account for the freed space.
        let existing_len = map.get(&id).map_or(0, |v| v.len() as u64);
        let net_increase = data_len.saturating_sub(existing_len);

        if used + net_increase > self.max_bytes {
            return Err(StoreError::CapacityExceeded {
                needed: net_increase,
                available: self.max_bytes.saturating_sub(used),
            });
        }

        debug!(%id, size = data.len(), "storing block in memory");
        map.insert(id, data);
        Ok(())
    }

    async fn get(&self, id: BlockId) -> Result<Option<Bytes>, StoreError> {
        let map = self.blocks.read().expect("lock poisoned");
        Ok(map.get(&id).cloned())
    }

    async fn delete(&self, id: BlockId) -> Result<(), StoreError> {
        let mut map = self.blocks.write().expect("lock poisoned");
        map.remove(&id);
        debug!(%id, "deleted block from memory");
        Ok(())
    }

    async fn contains(&self, id: BlockId) -> Result<bool, StoreError> {
        let map = self.blocks.read().expect("lock poisoned");
        Ok(map.contains_key(&id))
    }

    async fn list(&self) -> Result<Vec<BlockId>, StoreError> {
        let map = self.blocks.read().expect("lock poisoned");
        Ok(map.keys().copied().collect())
    }

    async fn verify(&self, id: BlockId) -> Result<bool, StoreError> {
        let map = self.blocks.read().expect("lock poisoned");
        match map.get(&id) {
            Some(data) => {
                let computed = BlockId::from_data(data);
                Ok(computed == id)
            }
            None => Err(StoreError::NotFound(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let store = MemoryStore::new(1024 * 1024);
        let data = Bytes::from_static(b"hello block");
        let id = BlockId::from_data(&data);

        store.put(id, data.clone()).await.unwrap();
        let result = store.get(id).await.unwrap();
        assert_eq!(result, Some(data));
    }

    #[tokio::test]
    async fn test_get_nonexistent_returns_none() {
        let store = MemoryStore::new(1024 * 1024);
        let id = BlockId::from_data(b"does not exist");
        let result = store.get(id).await.unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_duplicate_put_is_idempotent() {
        let store = MemoryStore::new(1024 * 1024);
        let data = Bytes::from_static(b"same content");
        let id = BlockId::from_data(&data);

        store.put(id, data.clone()).await.unwrap();
        store.put(id, data.clone()).await.unwrap();

        assert_eq!(store.list().await.unwrap().len(), 1);
        assert_eq!(store.get(id).await.unwrap(), Some(data));
    }

    #[tokio::test]
    async fn test_delete_then_get_returns_none() {
        let store = MemoryStore::new(1024 * 1024);
        let data = Bytes::from_static(b"to be deleted");
        let id = BlockId::from_data(&data);

        store.put(id, data).await.unwrap();
        store.delete(id).await.unwrap();
        let result = store.get(id).await.unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_contains_true_false() {
        let store = MemoryStore::new(1024 * 1024);
        let data = Bytes::from_static(b"exists");
        let id = BlockId::from_data(&data);

        assert!(!store.contains(id).await.unwrap());
        store.put(id, data).await.unwrap();
        assert!(store.contains(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_returns_all_stored_ids() {
        let store = MemoryStore::new(1024 * 1024);
        let blobs = [
            Bytes::from_static(b"block one"),
            Bytes::from_static(b"block two"),
            Bytes::from_static(b"block three"),
        ];
        let mut expected = Vec::new();
        for data in &blobs {
            let id = BlockId::from_data(data);
            store.put(id, data.clone()).await.unwrap();
            expected.push(id);
        }

        let mut listed = store.list().await.unwrap();
        listed.sort();
        expected.sort();
        assert_eq!(listed, expected);
    }

    #[tokio::test]
    async fn test_verify_valid_block() {
        let store = MemoryStore::new(1024 * 1024);
        let data = Bytes::from_static(b"valid block data");
        let id = BlockId::from_data(&data);

        store.put(id, data).await.unwrap();
        assert!(store.verify(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_corrupted_block() {
        let store = MemoryStore::new(1024 * 1024);
        let data = Bytes::from_static(b"original data");
        let id = BlockId::from_data(&data);

        store.put(id, data).await.unwrap();
        store.corrupt(id, Bytes::from_static(b"corrupted data"));

        assert!(!store.verify(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_nonexistent_returns_error() {
        let store = MemoryStore::new(1024 * 1024);
        let id = BlockId::from_data(b"missing");
        let result = store.verify(id).await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_capacity_exceeded() {
        let store = MemoryStore::new(10); // tiny store
        let data = Bytes::from_static(b"this is way too large for the store");
        let id = BlockId::from_data(&data);

        let result = store.put(id, data).await;
        assert!(matches!(
            result.unwrap_err(),
            StoreError::CapacityExceeded { .. }
        ));
    }
}
