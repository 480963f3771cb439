//! Test doubles for stores and shard connections.
//!
//! [`TestStores`] builds a [`StoreHolder`] whose stores log every call into
//! one shared [`CallLog`], so tests can assert on exact call sequences
//! across entity kinds.

use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;

use crate::error::{GatewayError, StoreError};
use crate::model::{
    ChannelRecord, EmojiRecord, GuildRecord, MemberRecord, PendingMemberRequest, RoleRecord,
    VoiceStateRecord,
};
use crate::payload::{GatewayCommand, GuildResponse, MemberResponse, RoleResponse, UserResponse};
use crate::shard::GatewayConnection;
use crate::store::{CompositeKey, EntityStore, MemoryStore, StoreHolder, StoreKey};

/// Ordered log of store calls, entries look like `"guilds.get"`.
#[derive(Default)]
pub struct CallLog {
    calls: Mutex<Vec<String>>,
}

impl CallLog {
    fn record(&self, store: &str, op: &str) {
        self.calls.lock().push(format!("{}.{}", store, op));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    /// Calls made against one store.
    pub fn calls_to(&self, store: &str) -> Vec<String> {
        let prefix = format!("{}.", store);
        self.calls()
            .into_iter()
            .filter(|call| call.starts_with(&prefix))
            .collect()
    }
}

/// Memory store that logs every trait call.
pub struct RecordingStore<K, V> {
    name: &'static str,
    inner: MemoryStore<K, V>,
    log: Arc<CallLog>,
}

impl<K, V> RecordingStore<K, V>
where
    K: StoreKey,
    V: Clone + Send + Sync + 'static,
{
    fn new(name: &'static str, log: Arc<CallLog>) -> Self {
        Self {
            name,
            inner: MemoryStore::new(),
            log,
        }
    }

    /// Insert without logging.
    pub async fn seed(&self, key: K, value: V) {
        self.inner.put(key, value).await.unwrap();
    }

    /// Read without logging.
    pub async fn peek(&self, key: &K) -> Option<V> {
        self.inner.get(key).await.unwrap()
    }

    pub fn keys(&self) -> Vec<K> {
        self.inner.keys()
    }
}

#[async_trait]
impl<K, V> EntityStore<K, V> for RecordingStore<K, V>
where
    K: StoreKey,
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &K) -> Result<Option<V>, StoreError> {
        self.log.record(self.name, "get");
        self.inner.get(key).await
    }

    async fn put(&self, key: K, value: V) -> Result<(), StoreError> {
        self.log.record(self.name, "put");
        self.inner.put(key, value).await
    }

    async fn put_many(&self, entries: Vec<(K, V)>) -> Result<(), StoreError> {
        self.log.record(self.name, "put_many");
        self.inner.put_many(entries).await
    }

    async fn delete(&self, key: &K) -> Result<(), StoreError> {
        self.log.record(self.name, "delete");
        self.inner.delete(key).await
    }

    async fn delete_many(&self, keys: Vec<K>) -> Result<(), StoreError> {
        self.log.record(self.name, "delete_many");
        self.inner.delete_many(keys).await
    }

    async fn delete_in_range(&self, low: &K, high: &K) -> Result<(), StoreError> {
        self.log.record(self.name, "delete_in_range");
        self.inner.delete_in_range(low, high).await
    }
}

/// Every kind backed by a [`RecordingStore`] sharing one log.
pub struct TestStores {
    pub log: Arc<CallLog>,
    pub guilds: Arc<RecordingStore<u64, GuildRecord>>,
    pub members: Arc<RecordingStore<CompositeKey, MemberRecord>>,
    pub roles: Arc<RecordingStore<u64, RoleRecord>>,
    pub emojis: Arc<RecordingStore<u64, EmojiRecord>>,
    pub text_channels: Arc<RecordingStore<u64, ChannelRecord>>,
    pub voice_channels: Arc<RecordingStore<u64, ChannelRecord>>,
    pub categories: Arc<RecordingStore<u64, ChannelRecord>>,
    pub voice_states: Arc<RecordingStore<CompositeKey, VoiceStateRecord>>,
    pub pending_member_requests: Arc<RecordingStore<CompositeKey, PendingMemberRequest>>,
}

impl TestStores {
    pub fn new() -> Self {
        let log = Arc::new(CallLog::default());
        Self {
            guilds: Arc::new(RecordingStore::new("guilds", log.clone())),
            members: Arc::new(RecordingStore::new("members", log.clone())),
            roles: Arc::new(RecordingStore::new("roles", log.clone())),
            emojis: Arc::new(RecordingStore::new("emojis", log.clone())),
            text_channels: Arc::new(RecordingStore::new("text_channels", log.clone())),
            voice_channels: Arc::new(RecordingStore::new("voice_channels", log.clone())),
            categories: Arc::new(RecordingStore::new("categories", log.clone())),
            voice_states: Arc::new(RecordingStore::new("voice_states", log.clone())),
            pending_member_requests: Arc::new(RecordingStore::new(
                "pending_member_requests",
                log.clone(),
            )),
            log,
        }
    }

    pub fn holder(&self) -> Arc<StoreHolder> {
        Arc::new(StoreHolder {
            guilds: self.guilds.clone(),
            members: self.members.clone(),
            roles: self.roles.clone(),
            emojis: self.emojis.clone(),
            text_channels: self.text_channels.clone(),
            voice_channels: self.voice_channels.clone(),
            categories: self.categories.clone(),
            voice_states: self.voice_states.clone(),
            pending_member_requests: self.pending_member_requests.clone(),
        })
    }
}

/// Store whose every call fails.
pub struct FailingStore<K, V> {
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K, V> FailingStore<K, V> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<K, V> EntityStore<K, V> for FailingStore<K, V>
where
    K: StoreKey,
    V: Send + Sync + 'static,
{
    async fn get(&self, _key: &K) -> Result<Option<V>, StoreError> {
        Err(StoreError::backend("injected failure"))
    }

    async fn put(&self, _key: K, _value: V) -> Result<(), StoreError> {
        Err(StoreError::backend("injected failure"))
    }

    async fn put_many(&self, _entries: Vec<(K, V)>) -> Result<(), StoreError> {
        Err(StoreError::backend("injected failure"))
    }

    async fn delete(&self, _key: &K) -> Result<(), StoreError> {
        Err(StoreError::backend("injected failure"))
    }

    async fn delete_in_range(&self, _low: &K, _high: &K) -> Result<(), StoreError> {
        Err(StoreError::backend("injected failure"))
    }
}

/// Connection that remembers what was sent and can be told to fail.
pub struct MockConnection {
    shard_index: u32,
    sent: Mutex<Vec<GatewayCommand>>,
    closed: AtomicBool,
    fail_send: bool,
    fail_close: bool,
}

impl MockConnection {
    pub fn new(shard_index: u32) -> Arc<Self> {
        Arc::new(Self::build(shard_index, false, false))
    }

    pub fn failing_send(shard_index: u32) -> Arc<Self> {
        Arc::new(Self::build(shard_index, true, false))
    }

    pub fn failing_close(shard_index: u32) -> Arc<Self> {
        Arc::new(Self::build(shard_index, false, true))
    }

    fn build(shard_index: u32, fail_send: bool, fail_close: bool) -> Self {
        Self {
            shard_index,
            sent: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
            fail_send,
            fail_close,
        }
    }

    pub fn sent(&self) -> Vec<GatewayCommand> {
        self.sent.lock().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GatewayConnection for MockConnection {
    async fn send(&self, command: &GatewayCommand) -> Result<(), GatewayError> {
        if self.fail_send {
            return Err(GatewayError::Transport {
                shard_index: self.shard_index,
                reason: "socket reset".into(),
            });
        }
        self.sent.lock().push(command.clone());
        Ok(())
    }

    async fn close(&self, _force: bool) -> Result<(), GatewayError> {
        self.closed.store(true, Ordering::SeqCst);
        if self.fail_close {
            return Err(GatewayError::Transport {
                shard_index: self.shard_index,
                reason: "close frame rejected".into(),
            });
        }
        Ok(())
    }
}

pub fn user(id: u64) -> UserResponse {
    UserResponse {
        id,
        username: format!("user{}", id),
        discriminator: "0001".into(),
        avatar: None,
        bot: false,
    }
}

pub fn member(user_id: u64) -> MemberResponse {
    MemberResponse {
        user: user(user_id),
        nick: None,
        roles: Vec::new(),
        joined_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        deaf: false,
        mute: false,
    }
}

pub fn role(id: u64, name: &str) -> RoleResponse {
    RoleResponse {
        id,
        name: name.into(),
        color: 0,
        hoist: false,
        position: 1,
        permissions: 0,
        managed: false,
        mentionable: false,
    }
}

/// Bare guild snapshot with no children.
pub fn guild(id: u64, name: &str) -> GuildResponse {
    GuildResponse {
        id,
        name: name.into(),
        icon: None,
        owner_id: 1,
        region: "eu-west".into(),
        afk_channel_id: None,
        afk_timeout: 300,
        verification_level: 0,
        member_count: None,
        roles: Vec::new(),
        emojis: Vec::new(),
        members: Vec::new(),
        channels: Vec::new(),
        voice_states: Vec::new(),
    }
}
