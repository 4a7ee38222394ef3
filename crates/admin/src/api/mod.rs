//! Typed data access for the console's entities.
//!
//! Each submodule holds the wire types of one entity and an `impl AdminApi`
//! block with its endpoints. All calls go through the session-aware
//! [`GatewayClient`], so every method here inherits renewal-and-replay.
//!
//! The view models in [`crate::views`] sit on top of this layer and never
//! build requests themselves.

mod achievements;
mod admins;
mod chat;
mod dashboard;
mod guilds;
mod images;
mod ranks;
mod streams;
mod users;

use serde::{Deserialize, Serialize};

pub use achievements::{Achievement, AchievementForm, DEFAULT_ICON};
pub use admins::{Admin, AdminUpdate, NewAdmin};
pub use chat::ChatMessage;
pub use dashboard::{ActivityLog, LogSeverity, StatisticBlocks};
pub use guilds::{ALL, Guild, GuildFilter, GuildForm, GuildMember};
pub use images::image_url;
pub use ranks::Rank;
pub use streams::{ActiveStream, StreamDetail, StreamFilter, StreamRow, StreamStatistics, StreamUser};
pub use users::{User, UserRow, user_rows};

use crate::gateway::GatewayClient;

/// Entry point for the admin API.
#[derive(Debug, Clone)]
pub struct AdminApi {
    gateway: GatewayClient,
}

impl AdminApi {
    #[must_use]
    pub const fn new(gateway: GatewayClient) -> Self {
        Self { gateway }
    }

    #[must_use]
    pub const fn gateway(&self) -> &GatewayClient {
        &self.gateway
    }
}

/// A statistic as the backend reports it: usually a number, sometimes a
/// placeholder string such as `"Not done"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Stat {
    Count(i64),
    Text(String),
}

impl Default for Stat {
    fn default() -> Self {
        Self::Text("-".to_string())
    }
}

impl Stat {
    #[must_use]
    pub const fn count(&self) -> Option<i64> {
        match self {
            Self::Count(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl std::fmt::Display for Stat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{n}"),
            Self::Text(s) if s.eq_ignore_ascii_case("not done") || s.is_empty() => f.write_str("-"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_accepts_numbers_and_text() {
        let count: Stat = serde_json::from_str("12").unwrap();
        assert_eq!(count.count(), Some(12));
        assert_eq!(count.to_string(), "12");

        let text: Stat = serde_json::from_str("\"Not done\"").unwrap();
        assert_eq!(text.count(), None);
        assert_eq!(text.to_string(), "-");

        assert_eq!(Stat::default().to_string(), "-");
    }
}
