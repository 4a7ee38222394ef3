//! Status enums and roles as the backend reports them.
//!
//! Wire values are the backend's (`ACTIVE`, `ONLINE`, `main admin`, ...).
//! Each type also carries the short label the console shows in lists and
//! filters (`active`, `live`, ...).

use serde::{Deserialize, Serialize};

/// Moderation status of a platform user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    #[default]
    Active,
    Warned,
    Blocked,
    /// Any value this client does not know; shown as active.
    #[serde(other)]
    Unknown,
}

impl UserStatus {
    /// Short label used by list views and the status filter.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active | Self::Unknown => "active",
            Self::Warned => "warning",
            Self::Blocked => "blocked",
        }
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Moderation action an admin can apply to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserAction {
    Warn,
    Block,
    Unblock,
    Delete,
}

impl UserAction {
    /// Every action, in menu order.
    pub const ALL: [Self; 4] = [Self::Warn, Self::Block, Self::Unblock, Self::Delete];
}

impl std::fmt::Display for UserAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warn => write!(f, "warn"),
            Self::Block => write!(f, "block"),
            Self::Unblock => write!(f, "unblock"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

impl std::str::FromStr for UserAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "warn" => Ok(Self::Warn),
            "block" => Ok(Self::Block),
            "unblock" => Ok(Self::Unblock),
            "delete" => Ok(Self::Delete),
            _ => Err(format!("invalid user action: {s}")),
        }
    }
}

/// Broadcast status of a stream ("act" in backend terms).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StreamStatus {
    Online,
    #[default]
    Offline,
    #[serde(other)]
    Unknown,
}

impl StreamStatus {
    /// Short label used by the stream list and its status filter.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Online => "live",
            Self::Offline => "offline",
            Self::Unknown => "unknown",
        }
    }

    #[must_use]
    pub const fn is_live(self) -> bool {
        matches!(self, Self::Online)
    }
}

impl std::fmt::Display for StreamStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Rarity tier of an achievement.
///
/// Deserializing is lenient: case is ignored and any unknown tier reads as
/// [`Rarity::Common`], so one odd record does not spoil a whole list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[default]
    Common,
    Rare,
    Epic,
    Legendary,
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Common => write!(f, "common"),
            Self::Rare => write!(f, "rare"),
            Self::Epic => write!(f, "epic"),
            Self::Legendary => write!(f, "legendary"),
        }
    }
}

impl std::str::FromStr for Rarity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "common" => Ok(Self::Common),
            "rare" => Ok(Self::Rare),
            "epic" => Ok(Self::Epic),
            "legendary" => Ok(Self::Legendary),
            _ => Err(format!("invalid rarity: {s}")),
        }
    }
}

impl<'de> Deserialize<'de> for Rarity {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.trim().parse().unwrap_or_default())
    }
}

/// Role of the signed-in console operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdminRole {
    /// May manage other admin accounts.
    #[serde(rename = "main admin")]
    MainAdmin,
    #[serde(rename = "admin")]
    Admin,
    #[serde(other)]
    Other,
}

impl AdminRole {
    /// Map a backend role name (`role.name` on the profile) to a role.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "main admin" => Self::MainAdmin,
            "admin" => Self::Admin,
            _ => Self::Other,
        }
    }

    #[must_use]
    pub const fn can_manage_admins(self) -> bool {
        matches!(self, Self::MainAdmin)
    }
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MainAdmin => write!(f, "main admin"),
            Self::Admin => write!(f, "admin"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Kind of media track a remote participant publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Video,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Audio => write!(f, "audio"),
            Self::Video => write!(f, "video"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_status_wire_values() {
        let status: UserStatus = serde_json::from_str("\"WARNED\"").unwrap();
        assert_eq!(status, UserStatus::Warned);
        assert_eq!(status.label(), "warning");

        let unknown: UserStatus = serde_json::from_str("\"SUSPENDED\"").unwrap();
        assert_eq!(unknown, UserStatus::Unknown);
        assert_eq!(unknown.label(), "active");
    }

    #[test]
    fn test_stream_status_labels() {
        let online: StreamStatus = serde_json::from_str("\"ONLINE\"").unwrap();
        assert!(online.is_live());
        assert_eq!(online.to_string(), "live");
        assert_eq!(StreamStatus::Offline.label(), "offline");
    }

    #[test]
    fn test_user_action_parse() {
        for action in UserAction::ALL {
            assert_eq!(action.to_string().parse::<UserAction>().unwrap(), action);
        }
        assert!("ban".parse::<UserAction>().is_err());
    }

    #[test]
    fn test_rarity_default_and_parse() {
        assert_eq!(Rarity::default(), Rarity::Common);
        assert_eq!("Epic".parse::<Rarity>().unwrap(), Rarity::Epic);
        assert_eq!(serde_json::to_string(&Rarity::Legendary).unwrap(), "\"legendary\"");
    }

    #[test]
    fn test_rarity_wire_is_lenient() {
        let rare: Rarity = serde_json::from_str("\"RARE\"").unwrap();
        assert_eq!(rare, Rarity::Rare);
        let unknown: Rarity = serde_json::from_str("\"Mythic\"").unwrap();
        assert_eq!(unknown, Rarity::Common);
    }

    #[test]
    fn test_admin_role_wire_values() {
        let role: AdminRole = serde_json::from_str("\"main admin\"").unwrap();
        assert!(role.can_manage_admins());
        let role: AdminRole = serde_json::from_str("\"moderator\"").unwrap();
        assert_eq!(role, AdminRole::Other);
        assert!(!role.can_manage_admins());

        assert_eq!(AdminRole::from_name(" main admin "), AdminRole::MainAdmin);
        assert_eq!(AdminRole::from_name("admin"), AdminRole::Admin);
        assert_eq!(AdminRole::from_name("Main Admin"), AdminRole::Other);
    }
}
