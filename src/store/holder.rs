//! One store per entity kind.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use super::{CachedStore, CompositeKey, MemoryStore, MongoStore, SharedStore, StoreKey};
use crate::cache::CacheConfig;
use crate::database::Database;
use crate::model::{
    ChannelRecord, EmojiRecord, GuildRecord, MemberRecord, PendingMemberRequest, RoleRecord,
    VoiceStateRecord,
};

/// Mongo collections keyed by [`CompositeKey`], which need the owner index.
pub const OWNER_SCOPED_COLLECTIONS: [&str; 3] = ["members", "voice_states", "pending_member_requests"];

/// All entity stores shared by the dispatch translator and the shard group.
#[derive(Clone)]
pub struct StoreHolder {
    pub guilds: SharedStore<u64, GuildRecord>,
    /// Keyed by (guild id, user id).
    pub members: SharedStore<CompositeKey, MemberRecord>,
    pub roles: SharedStore<u64, RoleRecord>,
    pub emojis: SharedStore<u64, EmojiRecord>,
    pub text_channels: SharedStore<u64, ChannelRecord>,
    pub voice_channels: SharedStore<u64, ChannelRecord>,
    pub categories: SharedStore<u64, ChannelRecord>,
    /// Keyed by (guild id, user id).
    pub voice_states: SharedStore<CompositeKey, VoiceStateRecord>,
    /// Keyed by (shard index, guild id).
    pub pending_member_requests: SharedStore<CompositeKey, PendingMemberRequest>,
}

impl StoreHolder {
    /// Every kind in its own [`MemoryStore`].
    pub fn in_memory() -> Self {
        Self {
            guilds: Arc::new(MemoryStore::new()),
            members: Arc::new(MemoryStore::new()),
            roles: Arc::new(MemoryStore::new()),
            emojis: Arc::new(MemoryStore::new()),
            text_channels: Arc::new(MemoryStore::new()),
            voice_channels: Arc::new(MemoryStore::new()),
            categories: Arc::new(MemoryStore::new()),
            voice_states: Arc::new(MemoryStore::new()),
            pending_member_requests: Arc::new(MemoryStore::new()),
        }
    }

    /// Every kind in its own MongoDB collection, optionally behind a cache.
    pub fn mongo(db: &Database, cache: Option<&CacheConfig>) -> Self {
        let member_cache = cache.map(CacheConfig::for_members);

        let stores = Self {
            guilds: mongo_store(db, "guilds", cache),
            members: mongo_store(db, "members", member_cache.as_ref()),
            roles: mongo_store(db, "roles", cache),
            emojis: mongo_store(db, "emojis", cache),
            text_channels: mongo_store(db, "text_channels", cache),
            voice_channels: mongo_store(db, "voice_channels", cache),
            categories: mongo_store(db, "categories", cache),
            voice_states: mongo_store(db, "voice_states", cache),
            // Written once per request and read once per final chunk.
            pending_member_requests: mongo_store(db, "pending_member_requests", None),
        };

        info!("MongoDB entity stores ready (cache: {})", cache.is_some());
        stores
    }
}

fn mongo_store<K, V>(db: &Database, name: &str, cache: Option<&CacheConfig>) -> SharedStore<K, V>
where
    K: StoreKey,
    V: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    let store: SharedStore<K, V> = Arc::new(MongoStore::new(db, name));
    match cache {
        Some(config) => Arc::new(CachedStore::new(name, store, config.clone())),
        None => store,
    }
}

impl std::fmt::Debug for StoreHolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreHolder").finish_non_exhaustive()
    }
}
