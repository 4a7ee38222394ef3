//! Dashboard statistics and the platform activity feed.

use meract_core::ActivityLogId;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{AdminApi, Stat};
use crate::error::GatewayError;
use crate::gateway::RequestDescriptor;

/// Counters shown at the top of the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticBlocks {
    #[serde(default)]
    pub active_users: Stat,
    #[serde(default, alias = "activeStreams")]
    pub active_acts: Stat,
    #[serde(default)]
    pub active_guilds: Stat,
}

/// One entry of an activity feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    #[serde(default)]
    pub id: Option<ActivityLogId>,
    #[serde(default)]
    pub action: Option<String>,
    /// Human-readable age ("5 minutes ago"), computed by the backend.
    #[serde(default)]
    pub time_ago: Option<String>,
}

/// How an activity entry is highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSeverity {
    Success,
    Warning,
    Error,
    Info,
}

impl ActivityLog {
    /// Classify by keywords in the action text.
    ///
    /// "unblocked" is checked before "blocked" since it contains it.
    #[must_use]
    pub fn severity(&self) -> LogSeverity {
        let action = self.action.as_deref().unwrap_or_default().to_lowercase();
        if action.contains("unblocked") {
            LogSeverity::Success
        } else if action.contains("warning") {
            LogSeverity::Warning
        } else if action.contains("blocked") {
            LogSeverity::Error
        } else {
            LogSeverity::Info
        }
    }
}

impl AdminApi {
    /// Fetch the dashboard counters.
    ///
    /// # Errors
    ///
    /// Returns a gateway error if the request fails.
    #[instrument(skip(self))]
    pub async fn statistic_blocks(&self) -> Result<StatisticBlocks, GatewayError> {
        self.gateway
            .fetch_json(RequestDescriptor::get("/user/statistic-blocks"))
            .await
    }

    /// Fetch the platform-wide activity feed.
    ///
    /// # Errors
    ///
    /// Returns a gateway error if the request fails.
    #[instrument(skip(self))]
    pub async fn activity_logs(&self) -> Result<Vec<ActivityLog>, GatewayError> {
        self.gateway
            .fetch_json(RequestDescriptor::get("/user/activity-logs"))
            .await
    }
}
