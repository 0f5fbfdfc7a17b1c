//! User account models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Role;

/// A user account
///
/// Admins bypass permission checks entirely; staff accounts are checked
/// against their permission strings (for example `"products:write"`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub permissions: Vec<String>,
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Check whether this user may perform `resource:action`
    pub fn has_permission(&self, resource: &str, action: &str) -> bool {
        if self.role == Role::Admin {
            return true;
        }
        let permission = format!("{}:{}", resource, action);
        self.permissions.contains(&permission)
    }
}
