//! Guild record.
//!
//! Besides its own fields a guild keeps denormalized id lists of its
//! children. Those lists drive the cascading delete when the guild goes away.

use serde::{Deserialize, Serialize};

use crate::payload::GuildResponse;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildRecord {
    pub id: u64,
    pub name: String,
    pub icon: Option<String>,
    pub owner_id: u64,
    pub region: String,
    pub afk_channel_id: Option<u64>,
    pub afk_timeout: u32,
    pub verification_level: u8,
    pub member_count: Option<u32>,

    /// Text, voice and category channel ids.
    #[serde(default)]
    pub channels: Vec<u64>,
    #[serde(default)]
    pub roles: Vec<u64>,
    #[serde(default)]
    pub emojis: Vec<u64>,
    /// Member user ids. May contain duplicates.
    #[serde(default)]
    pub members: Vec<u64>,
}

impl From<&GuildResponse> for GuildRecord {
    fn from(response: &GuildResponse) -> Self {
        Self {
            id: response.id,
            name: response.name.clone(),
            icon: response.icon.clone(),
            owner_id: response.owner_id,
            region: response.region.clone(),
            afk_channel_id: response.afk_channel_id,
            afk_timeout: response.afk_timeout,
            verification_level: response.verification_level,
            member_count: response.member_count,
            channels: response.channels.iter().map(|c| c.id).collect(),
            roles: response.roles.iter().map(|r| r.id).collect(),
            emojis: response.emojis.iter().map(|e| e.id).collect(),
            members: response.members.iter().map(|m| m.user.id).collect(),
        }
    }
}
