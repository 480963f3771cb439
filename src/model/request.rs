//! Pending member-list request marker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::payload::RequestGuildMembers;

/// Recorded when a member-list request goes out on a shard, keyed by
/// (shard index, guild id), so incoming chunks can be correlated with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingMemberRequest {
    pub shard_index: u32,
    pub guild_id: u64,
    pub query: String,
    pub limit: u32,
    pub requested_at: DateTime<Utc>,
}

impl PendingMemberRequest {
    pub fn new(shard_index: u32, request: &RequestGuildMembers) -> Self {
        Self {
            shard_index,
            guild_id: request.guild_id,
            query: request.query.clone(),
            limit: request.limit,
            requested_at: Utc::now(),
        }
    }
}
