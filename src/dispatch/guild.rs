//! Guild dispatch handlers.
//!
//! Read-modify-write of a guild's id lists is never locked. A concurrent
//! dispatch touching the same guild can overwrite the list change made
//! here; that lost update is accepted.

use futures::try_join;
use tracing::debug;

use super::DispatchContext;
use crate::error::{DispatchError, StoreError};
use crate::event::{
    BanEvent, EmojisUpdateEvent, Guild, GuildCreateEvent, GuildDeleteEvent, GuildEmoji,
    GuildUpdateEvent, IntegrationsUpdateEvent, Member, MemberChunkEvent, MemberJoinEvent,
    MemberLeaveEvent, Role, RoleCreateEvent, RoleDeleteEvent, RoleUpdateEvent, UnbanEvent, User,
};
use crate::model::{
    ChannelKind, ChannelRecord, EmojiRecord, GuildRecord, MemberRecord, RoleRecord, UserRecord,
    VoiceStateRecord, ids,
};
use crate::payload::{
    GuildBanAdd, GuildBanRemove, GuildCreate, GuildDelete, GuildEmojisUpdate,
    GuildIntegrationsUpdate, GuildMemberAdd, GuildMemberRemove, GuildMemberUpdate,
    GuildMembersChunk, GuildRoleCreate, GuildRoleDelete, GuildRoleUpdate, GuildUpdate,
};
use crate::store::{CompositeKey, SharedStore, StoreKey};

/// Read the cached guild, apply `update`, write it back.
///
/// A guild missing from the cache is left missing.
async fn update_guild<F>(ctx: &DispatchContext, guild_id: u64, update: F) -> Result<(), StoreError>
where
    F: FnOnce(&mut GuildRecord) + Send,
{
    match ctx.stores.guilds.get(&guild_id).await? {
        Some(mut guild) => {
            update(&mut guild);
            ctx.stores.guilds.put(guild_id, guild).await
        }
        None => {
            debug!("Guild {} not cached, id lists left unchanged", guild_id);
            Ok(())
        }
    }
}

/// Batch put that skips the store call when there is nothing to write.
async fn put_all<K, V>(store: &SharedStore<K, V>, entries: Vec<(K, V)>) -> Result<(), StoreError>
where
    K: StoreKey,
    V: Send + Sync + 'static,
{
    if entries.is_empty() {
        return Ok(());
    }
    store.put_many(entries).await
}

pub async fn ban_add(_ctx: &DispatchContext, payload: GuildBanAdd) -> Result<BanEvent, DispatchError> {
    Ok(BanEvent {
        guild_id: payload.guild_id,
        user: User::new(UserRecord::from(&payload.user)),
    })
}

pub async fn ban_remove(
    _ctx: &DispatchContext,
    payload: GuildBanRemove,
) -> Result<UnbanEvent, DispatchError> {
    Ok(UnbanEvent {
        guild_id: payload.guild_id,
        user: User::new(UserRecord::from(&payload.user)),
    })
}

/// Overwrite the guild record, then write the children the payload carries.
pub async fn guild_create(
    ctx: &DispatchContext,
    payload: GuildCreate,
) -> Result<GuildCreateEvent, DispatchError> {
    let response = payload.guild;
    let guild_id = response.id;
    let record = GuildRecord::from(&response);
    let stores = &ctx.stores;

    debug!("Guild create for {} ({})", guild_id, response.name);

    // Full overwrite, no merge with whatever was cached before.
    stores.guilds.put(guild_id, record.clone()).await?;

    let roles: Vec<_> = response
        .roles
        .iter()
        .map(|role| (role.id, RoleRecord::from(role)))
        .collect();
    let emojis: Vec<_> = response
        .emojis
        .iter()
        .map(|emoji| (emoji.id, EmojiRecord::new(emoji, guild_id)))
        .collect();
    let members: Vec<_> = response
        .members
        .iter()
        .map(|member| {
            (
                CompositeKey::new(guild_id, member.user.id),
                MemberRecord::from(member),
            )
        })
        .collect();
    let voice_states: Vec<_> = response
        .voice_states
        .iter()
        .map(|state| {
            (
                CompositeKey::new(guild_id, state.user_id),
                VoiceStateRecord::new(state, guild_id),
            )
        })
        .collect();

    let mut text_channels = Vec::new();
    let mut voice_channels = Vec::new();
    let mut categories = Vec::new();
    for channel in &response.channels {
        let entry = (channel.id, ChannelRecord::new(channel, guild_id));
        match channel.kind {
            ChannelKind::Text => text_channels.push(entry),
            ChannelKind::Voice => voice_channels.push(entry),
            ChannelKind::Category => categories.push(entry),
        }
    }

    try_join!(
        put_all(&stores.roles, roles),
        put_all(&stores.emojis, emojis),
        put_all(&stores.members, members),
        put_all(&stores.voice_states, voice_states),
        put_all(&stores.text_channels, text_channels),
        put_all(&stores.voice_channels, voice_channels),
        put_all(&stores.categories, categories),
    )?;

    Ok(GuildCreateEvent {
        guild: Guild::new(record),
    })
}

/// Delete a guild and everything scoped to it.
///
/// The cached record is read first; its id lists drive the cascade, which
/// runs strictly in order before the guild record itself goes. On a cache
/// miss only the guild record delete is issued.
pub async fn guild_delete(
    ctx: &DispatchContext,
    payload: GuildDelete,
) -> Result<GuildDeleteEvent, DispatchError> {
    let guild_id = payload.id;
    let stores = &ctx.stores;

    let previous = stores.guilds.get(&guild_id).await?;

    match &previous {
        Some(guild) => {
            // Channel ids are shared by the three channel stores; each store
            // only holds the ids of its own kind.
            stores.text_channels.delete_many(guild.channels.clone()).await?;
            stores.voice_channels.delete_many(guild.channels.clone()).await?;
            stores.categories.delete_many(guild.channels.clone()).await?;
            stores.roles.delete_many(guild.roles.clone()).await?;
            stores.emojis.delete_many(guild.emojis.clone()).await?;

            let (low, high) = CompositeKey::owner_range(guild_id);
            stores.members.delete_in_range(&low, &high).await?;
            stores.voice_states.delete_in_range(&low, &high).await?;
            // A member request still open for this guild will never complete.
            stores
                .pending_member_requests
                .delete(&CompositeKey::new(u64::from(ctx.shard_index), guild_id))
                .await?;

            debug!(
                "Cascaded delete of guild {}: {} channels, {} roles, {} emojis",
                guild_id,
                guild.channels.len(),
                guild.roles.len(),
                guild.emojis.len()
            );
        }
        None => debug!("Guild {} not cached, skipping cascade", guild_id),
    }

    stores.guilds.delete(&guild_id).await?;

    Ok(GuildDeleteEvent {
        guild_id,
        guild: previous.map(Guild::new),
        unavailable: payload.unavailable,
    })
}

/// Replace the guild's emoji list with exactly the payload's emojis.
///
/// Emoji records dropped from the list stay in the emoji store.
pub async fn emojis_update(
    ctx: &DispatchContext,
    payload: GuildEmojisUpdate,
) -> Result<EmojisUpdateEvent, DispatchError> {
    let guild_id = payload.guild_id;
    let records: Vec<EmojiRecord> = payload
        .emojis
        .iter()
        .map(|emoji| EmojiRecord::new(emoji, guild_id))
        .collect();
    let emoji_ids: Vec<u64> = records.iter().map(|emoji| emoji.id).collect();

    debug!("Emoji update for guild {}: {} emojis", guild_id, emoji_ids.len());

    update_guild(ctx, guild_id, |guild| guild.emojis = emoji_ids).await?;
    ctx.stores
        .emojis
        .put_many(records.iter().map(|emoji| (emoji.id, emoji.clone())).collect())
        .await?;

    Ok(EmojisUpdateEvent {
        guild_id,
        emojis: records
            .into_iter()
            .map(|emoji| GuildEmoji::new(emoji, guild_id))
            .collect(),
    })
}

pub async fn integrations_update(
    _ctx: &DispatchContext,
    payload: GuildIntegrationsUpdate,
) -> Result<IntegrationsUpdateEvent, DispatchError> {
    Ok(IntegrationsUpdateEvent {
        guild_id: payload.guild_id,
    })
}

pub async fn member_add(
    ctx: &DispatchContext,
    payload: GuildMemberAdd,
) -> Result<MemberJoinEvent, DispatchError> {
    let guild_id = payload.guild_id;
    let response = payload.member;
    let user_id = response.user.id;
    let record = MemberRecord::from(&response);

    debug!("Member {} joined guild {}", user_id, guild_id);

    try_join!(
        update_guild(ctx, guild_id, |guild| ids::add(&mut guild.members, user_id)),
        ctx.stores
            .members
            .put(CompositeKey::new(guild_id, user_id), record.clone()),
    )?;

    Ok(MemberJoinEvent {
        guild_id,
        member: Member::new(record, UserRecord::from(&response.user), guild_id),
    })
}

pub async fn member_remove(
    ctx: &DispatchContext,
    payload: GuildMemberRemove,
) -> Result<MemberLeaveEvent, DispatchError> {
    let guild_id = payload.guild_id;
    let user_id = payload.user.id;

    debug!("Member {} left guild {}", user_id, guild_id);

    let key = CompositeKey::new(guild_id, user_id);
    try_join!(
        update_guild(ctx, guild_id, |guild| ids::remove(&mut guild.members, user_id)),
        ctx.stores.members.delete(&key),
    )?;

    Ok(MemberLeaveEvent {
        guild_id,
        user: User::new(UserRecord::from(&payload.user)),
    })
}

/// Bulk member load answering a member-list request.
///
/// The final chunk of a request clears the pending marker left for it on
/// this shard.
pub async fn members_chunk(
    ctx: &DispatchContext,
    payload: GuildMembersChunk,
) -> Result<MemberChunkEvent, DispatchError> {
    let guild_id = payload.guild_id;
    let user_ids: Vec<u64> = payload.members.iter().map(|member| member.user.id).collect();
    let entries: Vec<(CompositeKey, MemberRecord)> = payload
        .members
        .iter()
        .map(|member| {
            (
                CompositeKey::new(guild_id, member.user.id),
                MemberRecord::from(member),
            )
        })
        .collect();

    debug!(
        "Member chunk {}/{} for guild {}: {} members",
        payload.chunk_index + 1,
        payload.chunk_count,
        guild_id,
        entries.len()
    );

    try_join!(
        update_guild(ctx, guild_id, |guild| ids::add_all(&mut guild.members, user_ids)),
        ctx.stores.members.put_many(entries),
    )?;

    if payload.is_last() {
        let key = CompositeKey::new(u64::from(ctx.shard_index), guild_id);
        ctx.stores.pending_member_requests.delete(&key).await?;
        debug!(
            "Member request for guild {} on shard {} complete",
            guild_id, ctx.shard_index
        );
    }

    Ok(MemberChunkEvent {
        guild_id,
        members: payload
            .members
            .iter()
            .map(|member| {
                Member::new(
                    MemberRecord::from(member),
                    UserRecord::from(&member.user),
                    guild_id,
                )
            })
            .collect(),
    })
}

/// Member updates are not applied to the cache and produce no event.
/// Cached member records can therefore go stale.
pub async fn member_update(
    _ctx: &DispatchContext,
    payload: GuildMemberUpdate,
) -> Result<(), DispatchError> {
    debug!(
        "Ignoring member update for user {} in guild {}",
        payload.user.id, payload.guild_id
    );
    Ok(())
}

pub async fn role_create(
    ctx: &DispatchContext,
    payload: GuildRoleCreate,
) -> Result<RoleCreateEvent, DispatchError> {
    let guild_id = payload.guild_id;
    let record = RoleRecord::from(&payload.role);
    let role_id = record.id;

    debug!("Role {} created in guild {}", role_id, guild_id);

    try_join!(
        update_guild(ctx, guild_id, |guild| ids::add(&mut guild.roles, role_id)),
        ctx.stores.roles.put(role_id, record.clone()),
    )?;

    Ok(RoleCreateEvent {
        guild_id,
        role: Role::new(record, guild_id),
    })
}

/// Member records still listing the role keep it.
pub async fn role_delete(
    ctx: &DispatchContext,
    payload: GuildRoleDelete,
) -> Result<RoleDeleteEvent, DispatchError> {
    let guild_id = payload.guild_id;
    let role_id = payload.role_id;

    debug!("Role {} deleted in guild {}", role_id, guild_id);

    try_join!(
        update_guild(ctx, guild_id, |guild| ids::remove(&mut guild.roles, role_id)),
        ctx.stores.roles.delete(&role_id),
    )?;

    Ok(RoleDeleteEvent { guild_id, role_id })
}

/// The old role is read before the new one is written.
pub async fn role_update(
    ctx: &DispatchContext,
    payload: GuildRoleUpdate,
) -> Result<RoleUpdateEvent, DispatchError> {
    let guild_id = payload.guild_id;
    let record = RoleRecord::from(&payload.role);

    let old = ctx.stores.roles.get(&record.id).await?;
    ctx.stores.roles.put(record.id, record.clone()).await?;

    debug!(
        "Role {} updated in guild {} (previously cached: {})",
        record.id,
        guild_id,
        old.is_some()
    );

    Ok(RoleUpdateEvent {
        current: Role::new(record, guild_id),
        old: old.map(|old| Role::new(old, guild_id)),
    })
}

/// The old guild is read before the new one is written.
pub async fn guild_update(
    ctx: &DispatchContext,
    payload: GuildUpdate,
) -> Result<GuildUpdateEvent, DispatchError> {
    let record = GuildRecord::from(&payload.guild);
    let guild_id = record.id;

    let old = ctx.stores.guilds.get(&guild_id).await?;
    ctx.stores.guilds.put(guild_id, record.clone()).await?;

    debug!(
        "Guild {} updated (previously cached: {})",
        guild_id,
        old.is_some()
    );

    Ok(GuildUpdateEvent {
        current: Guild::new(record),
        old: old.map(Guild::new),
    })
}
