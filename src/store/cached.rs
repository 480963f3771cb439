//! Read-through cache in front of another store.
//!
//! Reads check the Moka cache first and fill it from the inner store on a
//! miss. Writes go to the inner store and then drop the cached entry, so the
//! next read fills from whatever the backend ended up holding.
//!
//! Every write bumps a store-wide generation under the same lock that guards
//! fills. A read whose backend call overlapped a write does not fill the
//! cache, so a value read before a delete can never be cached after it.

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use super::{EntityStore, SharedStore, StoreKey};
use crate::cache::{CacheConfig, TypedCache};
use crate::error::StoreError;

pub struct CachedStore<K, V>
where
    K: StoreKey,
    V: Clone + Send + Sync + 'static,
{
    inner: SharedStore<K, V>,
    cache: TypedCache<K, V>,
    generation: Mutex<u64>,
}

impl<K, V> CachedStore<K, V>
where
    K: StoreKey,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(name: &str, inner: SharedStore<K, V>, config: CacheConfig) -> Self {
        Self {
            inner,
            cache: TypedCache::new(name, config),
            generation: Mutex::new(0),
        }
    }

    /// The cache in front of the store.
    pub fn cache(&self) -> &TypedCache<K, V> {
        &self.cache
    }

    /// Record a completed backend write and drop what it made stale.
    fn written(&self, stale: impl FnOnce(&TypedCache<K, V>)) {
        let mut generation = self.generation.lock();
        *generation += 1;
        stale(&self.cache);
    }
}

#[async_trait]
impl<K, V> EntityStore<K, V> for CachedStore<K, V>
where
    K: StoreKey,
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &K) -> Result<Option<V>, StoreError> {
        // Check cache first
        if let Some(value) = self.cache.get(key) {
            return Ok(Some(value));
        }

        let observed = *self.generation.lock();
        let result = self.inner.get(key).await?;

        if let Some(value) = &result {
            let generation = self.generation.lock();
            if *generation == observed {
                self.cache.insert(*key, value.clone());
            } else {
                debug!("Skipped filling {} for {:?}: concurrent write", self.cache.name(), key);
            }
        }

        Ok(result)
    }

    async fn put(&self, key: K, value: V) -> Result<(), StoreError> {
        self.inner.put(key, value).await?;
        self.written(|cache| cache.invalidate(&key));
        Ok(())
    }

    async fn put_many(&self, entries: Vec<(K, V)>) -> Result<(), StoreError> {
        let keys: Vec<K> = entries.iter().map(|(key, _)| *key).collect();
        self.inner.put_many(entries).await?;
        self.written(|cache| keys.iter().for_each(|key| cache.invalidate(key)));
        Ok(())
    }

    async fn delete(&self, key: &K) -> Result<(), StoreError> {
        self.inner.delete(key).await?;
        self.written(|cache| cache.invalidate(key));
        Ok(())
    }

    async fn delete_many(&self, keys: Vec<K>) -> Result<(), StoreError> {
        self.inner.delete_many(keys.clone()).await?;
        self.written(|cache| keys.iter().for_each(|key| cache.invalidate(key)));
        Ok(())
    }

    async fn delete_in_range(&self, low: &K, high: &K) -> Result<(), StoreError> {
        self.inner.delete_in_range(low, high).await?;
        // Moka cannot enumerate by range cheaply; drop everything instead.
        self.written(|cache| cache.invalidate_all());
        debug!("Cleared cache {} after range delete", self.cache.name());
        Ok(())
    }
}
