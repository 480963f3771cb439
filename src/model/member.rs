//! Guild member record, keyed by (guild id, user id).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::payload::MemberResponse;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub user_id: u64,
    pub nick: Option<String>,
    pub roles: Vec<u64>,
    pub joined_at: DateTime<Utc>,
    pub deaf: bool,
    pub mute: bool,
}

impl From<&MemberResponse> for MemberRecord {
    fn from(response: &MemberResponse) -> Self {
        Self {
            user_id: response.user.id,
            nick: response.nick.clone(),
            roles: response.roles.clone(),
            joined_at: response.joined_at,
            deaf: response.deaf,
            mute: response.mute,
        }
    }
}
