use meract_admin::api::LogSeverity;
use meract_admin::views::DashboardView;
use serde_json::json;

use super::{CliError, Console, opt};
use crate::output;

const fn severity_tag(severity: LogSeverity) -> &'static str {
    match severity {
        LogSeverity::Success => "ok",
        LogSeverity::Warning => "warn",
        LogSeverity::Error => "error",
        LogSeverity::Info => "info",
    }
}

pub async fn show(console: &Console) -> Result<(), CliError> {
    let mut view = DashboardView::new(console.ctx());
    view.load().await?;

    let stats = view.stats();
    let logs = view.logs().items();
    console.print(&json!({ "stats": stats, "activity": logs }), || {
        output::line(&format!(
            "Active users: {}  Active streams: {}  Active guilds: {}",
            stats.active_users, stats.active_acts, stats.active_guilds
        ))?;
        let rows: Vec<Vec<String>> = logs
            .iter()
            .map(|log| {
                vec![
                    severity_tag(log.severity()).to_string(),
                    opt(log.action.as_deref()),
                    opt(log.time_ago.as_deref()),
                ]
            })
            .collect();
        output::table(&["", "ACTION", "WHEN"], &rows)
    })
}
