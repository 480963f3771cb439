//! Decoded gateway payloads.
//!
//! Inbound dispatches are a tagged enum resolved once at decode time, so the
//! translator never inspects payload types at runtime.

pub mod command;
pub mod dispatch;
pub mod response;

use serde::{Deserialize, Serialize};

pub use command::{GatewayCommand, RequestGuildMembers, ShardCommand, UpdatePresence, UpdateVoiceState};
pub use dispatch::*;
pub use response::*;

/// A decoded dispatch payload, one variant per event kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "d", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Dispatch {
    GuildBanAdd(GuildBanAdd),
    GuildBanRemove(GuildBanRemove),
    GuildCreate(GuildCreate),
    GuildDelete(GuildDelete),
    GuildEmojisUpdate(GuildEmojisUpdate),
    GuildIntegrationsUpdate(GuildIntegrationsUpdate),
    GuildMemberAdd(GuildMemberAdd),
    GuildMemberRemove(GuildMemberRemove),
    GuildMembersChunk(GuildMembersChunk),
    GuildMemberUpdate(GuildMemberUpdate),
    GuildRoleCreate(GuildRoleCreate),
    GuildRoleDelete(GuildRoleDelete),
    GuildRoleUpdate(GuildRoleUpdate),
    GuildUpdate(GuildUpdate),
}

impl Dispatch {
    /// Gateway event name, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GuildBanAdd(_) => "GUILD_BAN_ADD",
            Self::GuildBanRemove(_) => "GUILD_BAN_REMOVE",
            Self::GuildCreate(_) => "GUILD_CREATE",
            Self::GuildDelete(_) => "GUILD_DELETE",
            Self::GuildEmojisUpdate(_) => "GUILD_EMOJIS_UPDATE",
            Self::GuildIntegrationsUpdate(_) => "GUILD_INTEGRATIONS_UPDATE",
            Self::GuildMemberAdd(_) => "GUILD_MEMBER_ADD",
            Self::GuildMemberRemove(_) => "GUILD_MEMBER_REMOVE",
            Self::GuildMembersChunk(_) => "GUILD_MEMBERS_CHUNK",
            Self::GuildMemberUpdate(_) => "GUILD_MEMBER_UPDATE",
            Self::GuildRoleCreate(_) => "GUILD_ROLE_CREATE",
            Self::GuildRoleDelete(_) => "GUILD_ROLE_DELETE",
            Self::GuildRoleUpdate(_) => "GUILD_ROLE_UPDATE",
            Self::GuildUpdate(_) => "GUILD_UPDATE",
        }
    }
}
