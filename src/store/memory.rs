//! In-memory entity store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{EntityStore, StoreKey};
use crate::error::StoreError;

/// Ordered in-process store. Never fails.
pub struct MemoryStore<K, V> {
    entries: RwLock<BTreeMap<K, V>>,
}

impl<K: StoreKey, V> MemoryStore<K, V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Snapshot of all keys in order.
    pub fn keys(&self) -> Vec<K> {
        self.entries.read().keys().copied().collect()
    }
}

impl<K: StoreKey, V> Default for MemoryStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<K, V> EntityStore<K, V> for MemoryStore<K, V>
where
    K: StoreKey,
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &K) -> Result<Option<V>, StoreError> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn put(&self, key: K, value: V) -> Result<(), StoreError> {
        self.entries.write().insert(key, value);
        Ok(())
    }

    async fn put_many(&self, entries: Vec<(K, V)>) -> Result<(), StoreError> {
        self.entries.write().extend(entries);
        Ok(())
    }

    async fn delete(&self, key: &K) -> Result<(), StoreError> {
        self.entries.write().remove(key);
        Ok(())
    }

    async fn delete_many(&self, keys: Vec<K>) -> Result<(), StoreError> {
        let mut entries = self.entries.write();
        for key in &keys {
            entries.remove(key);
        }
        Ok(())
    }

    async fn delete_in_range(&self, low: &K, high: &K) -> Result<(), StoreError> {
        self.entries
            .write()
            .retain(|key, _| key < low || key > high);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CompositeKey;

    #[tokio::test]
    async fn test_put_get_delete() {
        let store: MemoryStore<u64, String> = MemoryStore::new();
        assert_eq!(store.get(&1).await.unwrap(), None);

        store.put(1, "a".into()).await.unwrap();
        store.put(1, "b".into()).await.unwrap();
        assert_eq!(store.get(&1).await.unwrap().as_deref(), Some("b"));

        store.delete(&1).await.unwrap();
        store.delete(&1).await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_range_delete_only_touches_owner() {
        let store: MemoryStore<CompositeKey, u8> = MemoryStore::new();
        store
            .put_many(vec![
                (CompositeKey::new(1, 5), 0),
                (CompositeKey::new(2, 0), 0),
                (CompositeKey::new(2, u64::MAX), 0),
                (CompositeKey::new(3, 1), 0),
            ])
            .await
            .unwrap();

        let (low, high) = CompositeKey::owner_range(2);
        store.delete_in_range(&low, &high).await.unwrap();

        assert_eq!(
            store.keys(),
            vec![CompositeKey::new(1, 5), CompositeKey::new(3, 1)]
        );
    }

    #[tokio::test]
    async fn test_delete_many() {
        let store: MemoryStore<u64, u8> = MemoryStore::new();
        store.put_many(vec![(1, 1), (2, 2), (3, 3)]).await.unwrap();
        store.delete_many(vec![1, 3, 9]).await.unwrap();
        assert_eq!(store.keys(), vec![2]);
    }
}
