//! User record.

use serde::{Deserialize, Serialize};

use crate::payload::UserResponse;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    pub username: String,
    pub discriminator: String,
    pub avatar: Option<String>,
    pub bot: bool,
}

impl From<&UserResponse> for UserRecord {
    fn from(response: &UserResponse) -> Self {
        Self {
            id: response.id,
            username: response.username.clone(),
            discriminator: response.discriminator.clone(),
            avatar: response.avatar.clone(),
            bot: response.bot,
        }
    }
}
