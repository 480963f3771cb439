//! Domain events emitted by the dispatch translator.

pub mod entity;

use serde::Serialize;

pub use entity::{Guild, GuildEmoji, Member, Role, User};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BanEvent {
    pub guild_id: u64,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnbanEvent {
    pub guild_id: u64,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuildCreateEvent {
    pub guild: Guild,
}

/// `guild` is the cached state right before deletion, absent on a cache miss.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuildDeleteEvent {
    pub guild_id: u64,
    pub guild: Option<Guild>,
    pub unavailable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuildUpdateEvent {
    pub current: Guild,
    pub old: Option<Guild>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmojisUpdateEvent {
    pub guild_id: u64,
    pub emojis: Vec<GuildEmoji>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntegrationsUpdateEvent {
    pub guild_id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberJoinEvent {
    pub guild_id: u64,
    pub member: Member,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberLeaveEvent {
    pub guild_id: u64,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberChunkEvent {
    pub guild_id: u64,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleCreateEvent {
    pub guild_id: u64,
    pub role: Role,
}

/// Carries ids only; the deleted role's last state is not looked up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleDeleteEvent {
    pub guild_id: u64,
    pub role_id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleUpdateEvent {
    pub current: Role,
    pub old: Option<Role>,
}

/// Any event the translator can produce.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Ban(BanEvent),
    Unban(UnbanEvent),
    GuildCreate(GuildCreateEvent),
    GuildDelete(GuildDeleteEvent),
    GuildUpdate(GuildUpdateEvent),
    EmojisUpdate(EmojisUpdateEvent),
    IntegrationsUpdate(IntegrationsUpdateEvent),
    MemberJoin(MemberJoinEvent),
    MemberLeave(MemberLeaveEvent),
    MemberChunk(MemberChunkEvent),
    RoleCreate(RoleCreateEvent),
    RoleDelete(RoleDeleteEvent),
    RoleUpdate(RoleUpdateEvent),
}

impl Event {
    /// Guild the event concerns.
    pub fn guild_id(&self) -> u64 {
        match self {
            Self::Ban(e) => e.guild_id,
            Self::Unban(e) => e.guild_id,
            Self::GuildCreate(e) => e.guild.id(),
            Self::GuildDelete(e) => e.guild_id,
            Self::GuildUpdate(e) => e.current.id(),
            Self::EmojisUpdate(e) => e.guild_id,
            Self::IntegrationsUpdate(e) => e.guild_id,
            Self::MemberJoin(e) => e.guild_id,
            Self::MemberLeave(e) => e.guild_id,
            Self::MemberChunk(e) => e.guild_id,
            Self::RoleCreate(e) => e.guild_id,
            Self::RoleDelete(e) => e.guild_id,
            Self::RoleUpdate(e) => e.current.guild_id(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = Event::IntegrationsUpdate(IntegrationsUpdateEvent { guild_id: 3 });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "integrations_update");
        assert_eq!(json["guild_id"], 3);
        assert_eq!(event.guild_id(), 3);
    }
}
