use super::{ListState, ViewContext};
use crate::api::{ActivityLog, StatisticBlocks};
use crate::error::GatewayError;

/// Counters and the activity feed.
#[derive(Debug)]
pub struct DashboardView {
    ctx: ViewContext,
    stats: StatisticBlocks,
    logs: ListState<ActivityLog>,
}

impl DashboardView {
    #[must_use]
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            stats: StatisticBlocks::default(),
            logs: ListState::default(),
        }
    }

    /// Fetch counters and feed concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first error; whatever loaded is kept.
    pub async fn load(&mut self) -> Result<(), GatewayError> {
        let api = self.ctx.api();
        let (stats, logs) = tokio::join!(api.statistic_blocks(), api.activity_logs());
        let logs = self.logs.apply(logs, "Failed to load activity");
        self.stats = stats?;
        logs
    }

    #[must_use]
    pub const fn stats(&self) -> &StatisticBlocks {
        &self.stats
    }

    #[must_use]
    pub const fn logs(&self) -> &ListState<ActivityLog> {
        &self.logs
    }
}
