//! Voice state record, keyed by (guild id, user id).

use serde::{Deserialize, Serialize};

use crate::payload::VoiceStateResponse;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceStateRecord {
    pub guild_id: u64,
    pub channel_id: Option<u64>,
    pub user_id: u64,
    pub session_id: String,
    pub deaf: bool,
    pub mute: bool,
    pub self_deaf: bool,
    pub self_mute: bool,
    pub suppress: bool,
}

impl VoiceStateRecord {
    pub fn new(response: &VoiceStateResponse, guild_id: u64) -> Self {
        Self {
            guild_id,
            channel_id: response.channel_id,
            user_id: response.user_id,
            session_id: response.session_id.clone(),
            deaf: response.deaf,
            mute: response.mute,
            self_deaf: response.self_deaf,
            self_mute: response.self_mute,
            suppress: response.suppress,
        }
    }
}
