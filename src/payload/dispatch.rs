//! Guild dispatch payloads.

use serde::{Deserialize, Serialize};

use super::response::{EmojiResponse, GuildResponse, MemberResponse, RoleResponse, UserResponse};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildBanAdd {
    pub guild_id: u64,
    pub user: UserResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildBanRemove {
    pub guild_id: u64,
    pub user: UserResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildCreate {
    #[serde(flatten)]
    pub guild: GuildResponse,
}

/// Guild removal or outage. Only the id is guaranteed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildDelete {
    pub id: u64,
    #[serde(default)]
    pub unavailable: bool,
}

/// Complete emoji list of a guild after a change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildEmojisUpdate {
    pub guild_id: u64,
    pub emojis: Vec<EmojiResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildIntegrationsUpdate {
    pub guild_id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildMemberAdd {
    pub guild_id: u64,
    #[serde(flatten)]
    pub member: MemberResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildMemberRemove {
    pub guild_id: u64,
    pub user: UserResponse,
}

/// One response chunk to a member-list request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildMembersChunk {
    pub guild_id: u64,
    pub members: Vec<MemberResponse>,
    #[serde(default)]
    pub chunk_index: u32,
    #[serde(default = "default_chunk_count")]
    pub chunk_count: u32,
}

fn default_chunk_count() -> u32 {
    1
}

impl GuildMembersChunk {
    /// Whether this is the final chunk of its request.
    pub fn is_last(&self) -> bool {
        self.chunk_index.saturating_add(1) >= self.chunk_count
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildMemberUpdate {
    pub guild_id: u64,
    pub user: UserResponse,
    #[serde(default)]
    pub roles: Vec<u64>,
    #[serde(default)]
    pub nick: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildRoleCreate {
    pub guild_id: u64,
    pub role: RoleResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildRoleDelete {
    pub guild_id: u64,
    pub role_id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildRoleUpdate {
    pub guild_id: u64,
    pub role: RoleResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildUpdate {
    #[serde(flatten)]
    pub guild: GuildResponse,
}
