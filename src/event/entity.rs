//! Domain entities handed to event listeners.
//!
//! Each wraps a cache record together with the context a listener needs
//! (usually the owning guild id). They are snapshots and never write back.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{EmojiRecord, GuildRecord, MemberRecord, RoleRecord, UserRecord};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    data: UserRecord,
}

impl User {
    pub fn new(data: UserRecord) -> Self {
        Self { data }
    }

    pub fn id(&self) -> u64 {
        self.data.id
    }

    pub fn username(&self) -> &str {
        &self.data.username
    }

    /// `username#discriminator`, or just the username when there is none.
    pub fn tag(&self) -> String {
        if self.data.discriminator.is_empty() || self.data.discriminator == "0" {
            self.data.username.clone()
        } else {
            format!("{}#{}", self.data.username, self.data.discriminator)
        }
    }

    pub fn is_bot(&self) -> bool {
        self.data.bot
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Guild {
    data: GuildRecord,
}

impl Guild {
    pub fn new(data: GuildRecord) -> Self {
        Self { data }
    }

    pub fn id(&self) -> u64 {
        self.data.id
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn owner_id(&self) -> u64 {
        self.data.owner_id
    }

    pub fn data(&self) -> &GuildRecord {
        &self.data
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Member {
    guild_id: u64,
    data: MemberRecord,
    user: UserRecord,
}

impl Member {
    pub fn new(data: MemberRecord, user: UserRecord, guild_id: u64) -> Self {
        Self {
            guild_id,
            data,
            user,
        }
    }

    pub fn guild_id(&self) -> u64 {
        self.guild_id
    }

    pub fn id(&self) -> u64 {
        self.user.id
    }

    /// Nickname if set, otherwise the username.
    pub fn display_name(&self) -> &str {
        self.data.nick.as_deref().unwrap_or(&self.user.username)
    }

    pub fn role_ids(&self) -> &[u64] {
        &self.data.roles
    }

    pub fn joined_at(&self) -> DateTime<Utc> {
        self.data.joined_at
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Role {
    guild_id: u64,
    data: RoleRecord,
}

impl Role {
    pub fn new(data: RoleRecord, guild_id: u64) -> Self {
        Self { guild_id, data }
    }

    pub fn guild_id(&self) -> u64 {
        self.guild_id
    }

    pub fn id(&self) -> u64 {
        self.data.id
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn data(&self) -> &RoleRecord {
        &self.data
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuildEmoji {
    guild_id: u64,
    data: EmojiRecord,
}

impl GuildEmoji {
    pub fn new(data: EmojiRecord, guild_id: u64) -> Self {
        Self { guild_id, data }
    }

    pub fn guild_id(&self) -> u64 {
        self.guild_id
    }

    pub fn id(&self) -> u64 {
        self.data.id
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }
}
