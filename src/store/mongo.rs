//! MongoDB-backed entity store.
//!
//! Each entity kind lives in its own collection. Documents look like
//! `{ _id: "<owner>:<id>", owner, id, record }`; `owner` and `id` are kept as
//! separate fields so range deletes can filter on them.

use std::marker::PhantomData;

use async_trait::async_trait;
use futures::future::join_all;
use mongodb::Collection;
use mongodb::bson::{Document, doc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{EntityStore, StoreKey};
use crate::database::Database;
use crate::error::StoreError;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredEntry<V> {
    #[serde(rename = "_id")]
    key: String,
    owner: i64,
    id: i64,
    record: V,
}

/// Store backed by one MongoDB collection.
pub struct MongoStore<K, V>
where
    V: Send + Sync,
{
    collection: Collection<StoredEntry<V>>,
    _key: PhantomData<fn() -> K>,
}

impl<K, V> MongoStore<K, V>
where
    K: StoreKey,
    V: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Create a store over the named collection.
    pub fn new(db: &Database, collection: &str) -> Self {
        Self {
            collection: db.collection(collection),
            _key: PhantomData,
        }
    }

    fn entry(key: &K, record: V) -> StoredEntry<V> {
        let (owner, id) = key.parts();
        StoredEntry {
            key: document_id(key),
            owner: to_i64(owner),
            id: to_i64(id),
            record,
        }
    }
}

/// `_id` of the document holding `key`.
fn document_id<K: StoreKey>(key: &K) -> String {
    let (owner, id) = key.parts();
    format!("{}:{}", owner, id)
}

/// BSON has no unsigned integers. Snowflake ids fit in 63 bits; anything
/// larger is clamped, which keeps range upper bounds such as `u64::MAX` valid.
fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Filter matching `low <= (owner, id) <= high` in lexicographic order.
fn range_filter<K: StoreKey>(low: &K, high: &K) -> Document {
    let (low_owner, low_id) = low.parts();
    let (high_owner, high_id) = high.parts();
    let (low_owner, low_id) = (to_i64(low_owner), to_i64(low_id));
    let (high_owner, high_id) = (to_i64(high_owner), to_i64(high_id));

    doc! {
        "$and": [
            { "$or": [
                { "owner": { "$gt": low_owner } },
                { "owner": low_owner, "id": { "$gte": low_id } },
            ] },
            { "$or": [
                { "owner": { "$lt": high_owner } },
                { "owner": high_owner, "id": { "$lte": high_id } },
            ] },
        ]
    }
}

/// First error of a batch whose calls all ran.
fn first_failure(results: Vec<Result<(), StoreError>>) -> Result<(), StoreError> {
    let failed = results.iter().filter(|result| result.is_err()).count();
    match results.into_iter().find_map(Result::err) {
        Some(err) => {
            warn!("{} writes of a batch failed, keeping the rest", failed);
            Err(err)
        }
        None => Ok(()),
    }
}

#[async_trait]
impl<K, V> EntityStore<K, V> for MongoStore<K, V>
where
    K: StoreKey,
    V: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn get(&self, key: &K) -> Result<Option<V>, StoreError> {
        let filter = doc! { "_id": document_id(key) };
        let result = self.collection.find_one(filter).await?;
        Ok(result.map(|entry| entry.record))
    }

    async fn put(&self, key: K, value: V) -> Result<(), StoreError> {
        let entry = Self::entry(&key, value);
        let filter = doc! { "_id": entry.key.as_str() };
        let options = mongodb::options::ReplaceOptions::builder()
            .upsert(true)
            .build();

        self.collection
            .replace_one(filter, &entry)
            .with_options(options)
            .await?;

        Ok(())
    }

    /// One upsert per entry, all in flight together. The batch is not
    /// atomic: every upsert runs to completion, so on failure the entries
    /// that succeeded stay written and the first error is returned.
    async fn put_many(&self, entries: Vec<(K, V)>) -> Result<(), StoreError> {
        let count = entries.len();
        let results = join_all(entries.into_iter().map(|(key, value)| self.put(key, value))).await;
        first_failure(results)?;
        debug!(
            "Upserted {} records into {}",
            count,
            self.collection.name()
        );
        Ok(())
    }

    async fn delete(&self, key: &K) -> Result<(), StoreError> {
        let filter = doc! { "_id": document_id(key) };
        self.collection.delete_one(filter).await?;
        Ok(())
    }

    async fn delete_many(&self, keys: Vec<K>) -> Result<(), StoreError> {
        if keys.is_empty() {
            return Ok(());
        }
        let ids: Vec<String> = keys.iter().map(document_id).collect();
        let filter = doc! { "_id": { "$in": ids } };
        self.collection.delete_many(filter).await?;
        Ok(())
    }

    async fn delete_in_range(&self, low: &K, high: &K) -> Result<(), StoreError> {
        let result = self
            .collection
            .delete_many(range_filter(low, high))
            .await?;
        debug!(
            "Range delete on {} removed {} records",
            self.collection.name(),
            result.deleted_count
        );
        Ok(())
    }
}
