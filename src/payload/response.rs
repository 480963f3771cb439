//! Entity snapshots as carried inside dispatch payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ChannelKind;

/// User snapshot provided by the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub discriminator: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

/// Guild member snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberResponse {
    pub user: UserResponse,
    #[serde(default)]
    pub nick: Option<String>,
    #[serde(default)]
    pub roles: Vec<u64>,
    pub joined_at: DateTime<Utc>,
    #[serde(default)]
    pub deaf: bool,
    #[serde(default)]
    pub mute: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleResponse {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub color: u32,
    #[serde(default)]
    pub hoist: bool,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub permissions: u64,
    #[serde(default)]
    pub managed: bool,
    #[serde(default)]
    pub mentionable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmojiResponse {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub roles: Vec<u64>,
    #[serde(default)]
    pub require_colons: bool,
    #[serde(default)]
    pub managed: bool,
    #[serde(default)]
    pub animated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelResponse {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: ChannelKind,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub bitrate: Option<u32>,
    #[serde(default)]
    pub user_limit: Option<u32>,
    #[serde(default)]
    pub parent_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceStateResponse {
    #[serde(default)]
    pub channel_id: Option<u64>,
    pub user_id: u64,
    pub session_id: String,
    #[serde(default)]
    pub deaf: bool,
    #[serde(default)]
    pub mute: bool,
    #[serde(default)]
    pub self_deaf: bool,
    #[serde(default)]
    pub self_mute: bool,
    #[serde(default)]
    pub suppress: bool,
}

/// Full guild snapshot.
///
/// Child collections are only populated on guild create; update payloads
/// usually leave them empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildResponse {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    pub owner_id: u64,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub afk_channel_id: Option<u64>,
    #[serde(default)]
    pub afk_timeout: u32,
    #[serde(default)]
    pub verification_level: u8,
    #[serde(default)]
    pub member_count: Option<u32>,
    #[serde(default)]
    pub roles: Vec<RoleResponse>,
    #[serde(default)]
    pub emojis: Vec<EmojiResponse>,
    #[serde(default)]
    pub members: Vec<MemberResponse>,
    #[serde(default)]
    pub channels: Vec<ChannelResponse>,
    #[serde(default)]
    pub voice_states: Vec<VoiceStateResponse>,
}
