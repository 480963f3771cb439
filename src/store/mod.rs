//! Keyed entity stores.
//!
//! One async map per entity kind. Every call is independently atomic per
//! key; nothing here spans more than one call, so multi-store updates are
//! eventually consistent at best.
//!
//! ## Backends
//!
//! - [`MemoryStore`] - ordered in-process map
//! - [`MongoStore`] - one MongoDB collection per entity kind
//! - [`CachedStore`] - Moka read-through cache in front of another store

mod cached;
mod holder;
mod memory;
mod mongo;

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

pub use cached::CachedStore;
pub use holder::{OWNER_SCOPED_COLLECTIONS, StoreHolder};
pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Shared handle to a store of one entity kind.
pub type SharedStore<K, V> = Arc<dyn EntityStore<K, V>>;

/// Key of an entity scoped to an owner, e.g. (guild id, user id).
///
/// Ordered by owner first, so all keys of one owner form a contiguous range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CompositeKey {
    pub owner: u64,
    pub id: u64,
}

impl CompositeKey {
    pub fn new(owner: u64, id: u64) -> Self {
        Self { owner, id }
    }

    /// Inclusive bounds covering every key of `owner`.
    pub fn owner_range(owner: u64) -> (Self, Self) {
        (Self::new(owner, 0), Self::new(owner, u64::MAX))
    }
}

impl std::fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.owner, self.id)
    }
}

/// A key usable by every store backend.
pub trait StoreKey: Copy + Ord + Hash + Debug + Send + Sync + 'static {
    /// `(owner, id)` view of the key. Unscoped keys report owner 0.
    fn parts(&self) -> (u64, u64);
}

impl StoreKey for u64 {
    fn parts(&self) -> (u64, u64) {
        (0, *self)
    }
}

impl StoreKey for CompositeKey {
    fn parts(&self) -> (u64, u64) {
        (self.owner, self.id)
    }
}

/// Async keyed storage for one entity kind.
///
/// A missing key is `Ok(None)`, never an error.
#[async_trait]
pub trait EntityStore<K, V>: Send + Sync
where
    K: StoreKey,
    V: Send + Sync + 'static,
{
    /// Read a record.
    async fn get(&self, key: &K) -> Result<Option<V>, StoreError>;

    /// Insert or overwrite a record.
    async fn put(&self, key: K, value: V) -> Result<(), StoreError>;

    /// Insert or overwrite several records in one call.
    ///
    /// Not atomic across entries: a failure may leave part of the batch
    /// written.
    async fn put_many(&self, entries: Vec<(K, V)>) -> Result<(), StoreError>;

    /// Delete a record. Deleting a missing key succeeds.
    async fn delete(&self, key: &K) -> Result<(), StoreError>;

    /// Delete several records in one call.
    async fn delete_many(&self, keys: Vec<K>) -> Result<(), StoreError> {
        for key in &keys {
            self.delete(key).await?;
        }
        Ok(())
    }

    /// Delete every record with `low <= key <= high`.
    async fn delete_in_range(&self, low: &K, high: &K) -> Result<(), StoreError>;
}
