//! Signed-in operator profile.

use meract_core::{AdminRole, UserId};
use serde::{Deserialize, Serialize};

/// Role object nested in the profile (`{"name": "main admin"}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleInfo {
    pub name: String,
}

/// Profile returned by sign-in and kept in both session scopes.
///
/// Only the fields the console reads are typed; everything else the backend
/// returns is kept in `extra` so it survives a round trip through the
/// durable store.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<UserId>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub role: Option<RoleInfo>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserProfile {
    #[must_use]
    pub fn admin_role(&self) -> AdminRole {
        self.role
            .as_ref()
            .map_or(AdminRole::Other, |role| AdminRole::from_name(&role.name))
    }

    /// Name shown in the shell header.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.login
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.email.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or("Admin")
    }
}
