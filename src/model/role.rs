//! Role record. Roles are keyed globally by role id.

use serde::{Deserialize, Serialize};

use crate::payload::RoleResponse;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleRecord {
    pub id: u64,
    pub name: String,
    pub color: u32,
    pub hoist: bool,
    pub position: i32,
    pub permissions: u64,
    pub managed: bool,
    pub mentionable: bool,
}

impl From<&RoleResponse> for RoleRecord {
    fn from(response: &RoleResponse) -> Self {
        Self {
            id: response.id,
            name: response.name.clone(),
            color: response.color,
            hoist: response.hoist,
            position: response.position,
            permissions: response.permissions,
            managed: response.managed,
            mentionable: response.mentionable,
        }
    }
}
