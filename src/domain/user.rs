//! User domain entity and roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{ROLE_ADMINISTRATOR, ROLE_CONTRIBUTOR, ROLE_VIEWER};

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Administrator,
    Contributor,
    Viewer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Administrator => ROLE_ADMINISTRATOR,
            UserRole::Contributor => ROLE_CONTRIBUTOR,
            UserRole::Viewer => ROLE_VIEWER,
        }
    }
}

impl From<&str> for UserRole {
    /// Unknown role strings degrade to the least privileged role.
    fn from(s: &str) -> Self {
        match s {
            ROLE_ADMINISTRATOR => UserRole::Administrator,
            ROLE_CONTRIBUTOR => UserRole::Contributor,
            _ => UserRole::Viewer,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Display name used in email salutations
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}
