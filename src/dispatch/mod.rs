//! Dispatch translator.
//!
//! Turns decoded dispatch payloads into store mutations plus at most one
//! domain event. Handlers hold no state and take no locks: concurrent
//! invocations for the same guild may interleave their read-modify-write
//! cycles, and the last write wins.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let ctx = DispatchContext::new(stores.clone(), shard_index);
//! if let Some(event) = dispatch::handle(&ctx, payload).await? {
//!     // hand the event to listeners
//! }
//! ```

pub mod guild;

use std::sync::Arc;

use tracing::warn;

use crate::error::DispatchError;
use crate::event::Event;
use crate::payload::Dispatch;
use crate::store::StoreHolder;

/// What a handler gets besides its payload.
#[derive(Debug, Clone)]
pub struct DispatchContext {
    pub stores: Arc<StoreHolder>,
    /// Shard the payload arrived on.
    pub shard_index: u32,
}

impl DispatchContext {
    pub fn new(stores: Arc<StoreHolder>, shard_index: u32) -> Self {
        Self {
            stores,
            shard_index,
        }
    }
}

/// Route a payload to its handler.
///
/// A failure is scoped to this payload: nothing is retried and the event is
/// simply not produced.
pub async fn handle(ctx: &DispatchContext, dispatch: Dispatch) -> Result<Option<Event>, DispatchError> {
    let name = dispatch.name();

    let result = match dispatch {
        Dispatch::GuildBanAdd(p) => guild::ban_add(ctx, p).await.map(|e| Some(Event::Ban(e))),
        Dispatch::GuildBanRemove(p) => guild::ban_remove(ctx, p).await.map(|e| Some(Event::Unban(e))),
        Dispatch::GuildCreate(p) => guild::guild_create(ctx, p)
            .await
            .map(|e| Some(Event::GuildCreate(e))),
        Dispatch::GuildDelete(p) => guild::guild_delete(ctx, p)
            .await
            .map(|e| Some(Event::GuildDelete(e))),
        Dispatch::GuildEmojisUpdate(p) => guild::emojis_update(ctx, p)
            .await
            .map(|e| Some(Event::EmojisUpdate(e))),
        Dispatch::GuildIntegrationsUpdate(p) => guild::integrations_update(ctx, p)
            .await
            .map(|e| Some(Event::IntegrationsUpdate(e))),
        Dispatch::GuildMemberAdd(p) => guild::member_add(ctx, p)
            .await
            .map(|e| Some(Event::MemberJoin(e))),
        Dispatch::GuildMemberRemove(p) => guild::member_remove(ctx, p)
            .await
            .map(|e| Some(Event::MemberLeave(e))),
        Dispatch::GuildMembersChunk(p) => guild::members_chunk(ctx, p)
            .await
            .map(|e| Some(Event::MemberChunk(e))),
        Dispatch::GuildMemberUpdate(p) => guild::member_update(ctx, p).await.map(|()| None),
        Dispatch::GuildRoleCreate(p) => guild::role_create(ctx, p)
            .await
            .map(|e| Some(Event::RoleCreate(e))),
        Dispatch::GuildRoleDelete(p) => guild::role_delete(ctx, p)
            .await
            .map(|e| Some(Event::RoleDelete(e))),
        Dispatch::GuildRoleUpdate(p) => guild::role_update(ctx, p)
            .await
            .map(|e| Some(Event::RoleUpdate(e))),
        Dispatch::GuildUpdate(p) => guild::guild_update(ctx, p)
            .await
            .map(|e| Some(Event::GuildUpdate(e))),
    };

    if let Err(e) = &result {
        warn!("Failed to translate {} on shard {}: {}", name, ctx.shard_index, e);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{GuildBanAdd, GuildCreate, GuildMemberUpdate, GuildRoleCreate};
    use crate::model::GuildRecord;
    use crate::store::MemoryStore;
    use crate::testing::{FailingStore, TestStores, guild, role, user};

    #[tokio::test]
    async fn test_routes_to_handler() {
        let stores = TestStores::new();
        let ctx = DispatchContext::new(stores.holder(), 0);

        let event = handle(
            &ctx,
            Dispatch::GuildBanAdd(GuildBanAdd {
                guild_id: 2,
                user: user(3),
            }),
        )
        .await
        .unwrap();

        match event {
            Some(Event::Ban(ban)) => {
                assert_eq!(ban.guild_id, 2);
                assert_eq!(ban.user.id(), 3);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_member_update_emits_nothing() {
        let stores = TestStores::new();
        let ctx = DispatchContext::new(stores.holder(), 0);

        let event = handle(
            &ctx,
            Dispatch::GuildMemberUpdate(GuildMemberUpdate {
                guild_id: 1,
                user: user(2),
                roles: vec![5],
                nick: Some("new".into()),
            }),
        )
        .await
        .unwrap();

        assert!(event.is_none());
        assert!(stores.log.calls().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_fails_only_that_dispatch() {
        let stores = TestStores::new();
        let mut holder = (*stores.holder()).clone();
        holder.guilds = Arc::new(FailingStore::<u64, GuildRecord>::new());
        let ctx = DispatchContext::new(Arc::new(holder), 0);

        let failed = handle(
            &ctx,
            Dispatch::GuildCreate(GuildCreate {
                guild: guild(1, "broken"),
            }),
        )
        .await;
        assert!(matches!(failed, Err(DispatchError::Store(_))));

        // Role store is healthy, but role create also touches the guild list.
        let failed = handle(
            &ctx,
            Dispatch::GuildRoleCreate(GuildRoleCreate {
                guild_id: 1,
                role: role(8, "ops"),
            }),
        )
        .await;
        assert!(failed.is_err());

        // Payloads that never touch the store keep working.
        let ok = handle(
            &ctx,
            Dispatch::GuildBanAdd(GuildBanAdd {
                guild_id: 1,
                user: user(2),
            }),
        )
        .await;
        assert!(ok.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_handles_concurrent_dispatch_across_guilds() {
        let mut holder = crate::store::StoreHolder::in_memory();
        let guilds: Arc<MemoryStore<u64, GuildRecord>> = Arc::new(MemoryStore::new());
        holder.guilds = guilds.clone();
        let stores = Arc::new(holder);

        let tasks: Vec<_> = (1..=8u64)
            .map(|id| {
                let ctx = DispatchContext::new(stores.clone(), (id % 2) as u32);
                tokio::spawn(async move {
                    handle(
                        &ctx,
                        Dispatch::GuildCreate(GuildCreate {
                            guild: guild(id, "g"),
                        }),
                    )
                    .await
                })
            })
            .collect();

        for task in tasks {
            assert!(task.await.unwrap().unwrap().is_some());
        }
        assert_eq!(guilds.len(), 8);
    }
}
