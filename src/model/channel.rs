//! Guild channel record.
//!
//! Text channels, voice channels and categories share one id space but live
//! in three separate stores; the store holding an id determines its kind.

use serde::{Deserialize, Serialize};

use crate::payload::ChannelResponse;

/// Channel kind, encoded on the wire by its numeric type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ChannelKind {
    Text,
    Voice,
    Category,
}

impl TryFrom<u8> for ChannelKind {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Text),
            2 => Ok(Self::Voice),
            4 => Ok(Self::Category),
            other => Err(format!("unsupported guild channel type {}", other)),
        }
    }
}

impl From<ChannelKind> for u8 {
    fn from(kind: ChannelKind) -> Self {
        match kind {
            ChannelKind::Text => 0,
            ChannelKind::Voice => 2,
            ChannelKind::Category => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelRecord {
    pub id: u64,
    pub guild_id: u64,
    pub kind: ChannelKind,
    pub name: String,
    pub position: i32,
    pub topic: Option<String>,
    pub bitrate: Option<u32>,
    pub user_limit: Option<u32>,
    pub parent_id: Option<u64>,
}

impl ChannelRecord {
    pub fn new(response: &ChannelResponse, guild_id: u64) -> Self {
        Self {
            id: response.id,
            guild_id,
            kind: response.kind,
            name: response.name.clone(),
            position: response.position,
            topic: response.topic.clone(),
            bitrate: response.bitrate,
            user_limit: response.user_limit,
            parent_id: response.parent_id,
        }
    }
}
