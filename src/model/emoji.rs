//! Custom emoji record.

use serde::{Deserialize, Serialize};

use crate::payload::EmojiResponse;

/// Emojis are keyed globally by emoji id but remember their owning guild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmojiRecord {
    pub id: u64,
    pub guild_id: u64,
    pub name: String,
    pub roles: Vec<u64>,
    pub require_colons: bool,
    pub managed: bool,
    pub animated: bool,
}

impl EmojiRecord {
    pub fn new(response: &EmojiResponse, guild_id: u64) -> Self {
        Self {
            id: response.id,
            guild_id,
            name: response.name.clone(),
            roles: response.roles.clone(),
            require_colons: response.require_colons,
            managed: response.managed,
            animated: response.animated,
        }
    }
}
