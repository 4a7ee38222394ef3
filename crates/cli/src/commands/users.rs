//! User moderation commands.

use clap::Subcommand;
use meract_admin::views::{UserLogsView, UsersView};
use meract_core::{UserAction, UserId, UserStatus};

use super::{CliError, Console, opt};
use crate::output;

#[derive(Subcommand)]
pub enum UsersAction {
    /// List users sorted by email
    List {
        /// Case-insensitive match on username or email
        #[arg(short, long)]
        search: Option<String>,

        /// `active`, `warning` or `blocked`
        #[arg(long, value_parser = parse_status)]
        status: Option<UserStatus>,
    },
    /// Activity log of one user, newest first
    Logs { user_id: UserId },
    /// Apply `warn`, `block`, `unblock` or `delete` to one user
    Act { user_id: UserId, action: UserAction },
    /// Apply an action to several users, one at a time
    Bulk {
        action: UserAction,
        #[arg(required = true)]
        user_ids: Vec<UserId>,
    },
}

fn parse_status(s: &str) -> Result<UserStatus, String> {
    match s {
        "active" => Ok(UserStatus::Active),
        "warning" => Ok(UserStatus::Warned),
        "blocked" => Ok(UserStatus::Blocked),
        _ => Err(format!("unknown status: {s}")),
    }
}

pub async fn run(console: &Console, action: UsersAction) -> Result<(), CliError> {
    match action {
        UsersAction::List { search, status } => list(console, search, status).await,
        UsersAction::Logs { user_id } => logs(console, user_id).await,
        UsersAction::Act { user_id, action } => {
            let mut view = UsersView::new(console.ctx());
            view.apply(user_id, action).await?;
            console.print_line(&format!("{action} applied to user {user_id}"))
        }
        UsersAction::Bulk { action, user_ids } => bulk(console, action, user_ids).await,
    }
}

async fn list(
    console: &Console,
    search: Option<String>,
    status: Option<UserStatus>,
) -> Result<(), CliError> {
    let mut view = UsersView::new(console.ctx());
    view.load().await?;
    if let Some(term) = search {
        view.set_search(term);
    }
    view.set_status_filter(status);

    let rows = view.visible();
    console.print(&rows, || {
        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|row| {
                vec![
                    row.id.to_string(),
                    row.username.clone(),
                    row.email.clone(),
                    row.status.to_string(),
                    row.warnings.to_string(),
                    row.stream_count.to_string(),
                    row.followers.to_string(),
                    opt(row.last_active.as_deref()),
                ]
            })
            .collect();
        output::table(
            &["ID", "USERNAME", "EMAIL", "STATUS", "WARNINGS", "STREAMS", "FOLLOWERS", "LAST ACTIVE"],
            &cells,
        )
    })
}

async fn logs(console: &Console, user_id: UserId) -> Result<(), CliError> {
    let mut view = UserLogsView::new(console.ctx(), user_id);
    view.load().await?;
    let logs = view.logs().items();
    console.print(logs, || {
        for log in logs {
            output::line(&format!(
                "{:<8} {}  ({})",
                format!("{:?}", log.severity()).to_lowercase(),
                opt(log.action.as_deref()),
                opt(log.time_ago.as_deref())
            ))?;
        }
        Ok(())
    })
}

async fn bulk(console: &Console, action: UserAction, user_ids: Vec<UserId>) -> Result<(), CliError> {
    let mut view = UsersView::new(console.ctx());
    for id in &user_ids {
        view.select(*id);
    }

    let report = view.apply_bulk(action).await;
    for id in &report.succeeded {
        console.print_line(&format!("ok      user {id}"))?;
    }
    for (id, err) in &report.failed {
        console.print_line(&format!("failed  user {id}: {err}"))?;
    }

    if report.is_complete() {
        Ok(())
    } else {
        Err(CliError::Partial {
            failed: report.failed.len(),
            total: report.succeeded.len() + report.failed.len(),
        })
    }
}
