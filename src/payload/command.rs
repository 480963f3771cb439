//! Outbound gateway commands.

use serde::{Deserialize, Serialize};

/// Ask the gateway to stream the member list of a guild back as chunks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestGuildMembers {
    pub guild_id: u64,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatePresence {
    pub status: String,
    #[serde(default)]
    pub afk: bool,
    #[serde(default)]
    pub since: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateVoiceState {
    pub guild_id: u64,
    pub channel_id: Option<u64>,
    #[serde(default)]
    pub self_mute: bool,
    #[serde(default)]
    pub self_deaf: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "d", rename_all = "snake_case")]
pub enum GatewayCommand {
    RequestGuildMembers(RequestGuildMembers),
    UpdatePresence(UpdatePresence),
    UpdateVoiceState(UpdateVoiceState),
}

impl GatewayCommand {
    /// The member-list request carried by this command, if it is one.
    pub fn as_member_request(&self) -> Option<&RequestGuildMembers> {
        match self {
            Self::RequestGuildMembers(request) => Some(request),
            _ => None,
        }
    }
}

/// A command addressed to a single shard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShardCommand {
    pub shard_index: u32,
    pub command: GatewayCommand,
}

impl ShardCommand {
    pub fn new(shard_index: u32, command: GatewayCommand) -> Self {
        Self {
            shard_index,
            command,
        }
    }
}
