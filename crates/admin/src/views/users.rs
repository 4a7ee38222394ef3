//! User moderation list and per-user activity log.

use std::collections::BTreeSet;

use meract_core::{UserAction, UserId, UserStatus};

use super::{ListState, ViewContext};
use crate::api::{ActivityLog, UserRow};
use crate::error::GatewayError;
use crate::notify::Notice;

/// Outcome of a bulk action, one entry per selected user.
#[derive(Debug, Default)]
pub struct BulkReport {
    pub succeeded: Vec<UserId>,
    pub failed: Vec<(UserId, GatewayError)>,
}

impl BulkReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug)]
pub struct UsersView {
    ctx: ViewContext,
    rows: ListState<UserRow>,
    search: String,
    status: Option<UserStatus>,
    selected: BTreeSet<UserId>,
}

impl UsersView {
    #[must_use]
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            rows: ListState::default(),
            search: String::new(),
            status: None,
            selected: BTreeSet::new(),
        }
    }

    /// # Errors
    ///
    /// Returns the fetch error; previous rows are kept.
    pub async fn load(&mut self) -> Result<(), GatewayError> {
        let result = self.ctx.api().user_rows().await;
        self.rows.apply(result, "Failed to load users")
    }

    #[must_use]
    pub const fn rows(&self) -> &ListState<UserRow> {
        &self.rows
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Filter by status label; `None` shows everyone.
    pub fn set_status_filter(&mut self, status: Option<UserStatus>) {
        self.status = status;
    }

    /// Rows passing the search and status filter.
    #[must_use]
    pub fn visible(&self) -> Vec<&UserRow> {
        self.rows
            .items()
            .iter()
            .filter(|row| self.search.is_empty() || row.matches_search(&self.search))
            .filter(|row| {
                self.status
                    .is_none_or(|status| row.status.label() == status.label())
            })
            .collect()
    }

    pub fn select(&mut self, id: UserId) {
        self.selected.insert(id);
    }

    pub fn toggle(&mut self, id: UserId) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    pub fn select_all_visible(&mut self) {
        let ids: Vec<UserId> = self.visible().iter().map(|row| row.id).collect();
        self.selected.extend(ids);
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    #[must_use]
    pub const fn selected(&self) -> &BTreeSet<UserId> {
        &self.selected
    }

    /// Apply one action, then refetch on success.
    ///
    /// # Errors
    ///
    /// Returns the action's error; nothing is refetched then.
    pub async fn apply(&mut self, id: UserId, action: UserAction) -> Result<(), GatewayError> {
        let result = self.ctx.api().apply_user_action(id, action).await;
        self.ctx
            .report(result, &format!("User {action} applied"), "Action failed")?;
        self.refetch().await;
        Ok(())
    }

    /// Apply `action` to every selected user, one request at a time.
    ///
    /// A failure does not stop the run and nothing is rolled back. The list
    /// is refetched and the selection cleared afterwards.
    pub async fn apply_bulk(&mut self, action: UserAction) -> BulkReport {
        let mut report = BulkReport::default();
        if self.selected.is_empty() {
            self.ctx.notify(Notice::info("No users selected"));
            return report;
        }

        let targets: Vec<UserId> = self.selected.iter().copied().collect();
        for id in targets {
            match self.ctx.api().apply_user_action(id, action).await {
                Ok(()) => report.succeeded.push(id),
                Err(err) => {
                    tracing::warn!(user_id = %id, %action, error = %err, "Bulk action failed for user");
                    report.failed.push((id, err));
                }
            }
        }

        let summary = format!(
            "{action}: {} succeeded, {} failed",
            report.succeeded.len(),
            report.failed.len()
        );
        if report.is_complete() {
            self.ctx.notify(Notice::success(summary));
        } else {
            self.ctx.notify(Notice::error(summary));
        }

        self.selected.clear();
        self.refetch().await;
        report
    }

    async fn refetch(&mut self) {
        if let Err(err) = self.load().await {
            tracing::warn!(error = %err, "Failed to refresh users");
        }
    }
}

/// Activity log of one user, newest first.
#[derive(Debug)]
pub struct UserLogsView {
    ctx: ViewContext,
    user_id: UserId,
    logs: ListState<ActivityLog>,
}

impl UserLogsView {
    #[must_use]
    pub fn new(ctx: ViewContext, user_id: UserId) -> Self {
        Self {
            ctx,
            user_id,
            logs: ListState::default(),
        }
    }

    /// # Errors
    ///
    /// Returns the fetch error.
    pub async fn load(&mut self) -> Result<(), GatewayError> {
        let result = self
            .ctx
            .api()
            .user_activity_logs(self.user_id)
            .await
            .map(|mut logs| {
                logs.reverse();
                logs
            });
        self.logs.apply(result, "Failed to load user logs")
    }

    #[must_use]
    pub const fn logs(&self) -> &ListState<ActivityLog> {
        &self.logs
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use mockito::{Matcher, Server};

    use super::*;
    use crate::api::AdminApi;
    use crate::gateway::GatewayClient;
    use crate::notify::RecordingNotifier;
    use crate::session::SessionState;

    const USERS: &str = r#"[
        {"id":1,"email":"amy@meract.app","login":"amy","status":"ACTIVE"},
        {"id":2,"email":"bob@meract.app","status":"BLOCKED"},
        {"id":3,"email":"cid@meract.app","login":"cid","status":"WARNED"}
    ]"#;

    fn view(server: &Server) -> (UsersView, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let api = AdminApi::new(
            GatewayClient::builder(server.url(), SessionState::in_memory())
                .build()
                .unwrap(),
        );
        (UsersView::new(ViewContext::new(api, notifier.clone())), notifier)
    }

    #[tokio::test]
    async fn test_search_and_status_filter() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/user/all-users")
            .with_body(USERS)
            .create_async()
            .await;

        let (mut view, _) = view(&server);
        view.load().await.unwrap();
        assert_eq!(view.visible().len(), 3);

        view.set_search("BOB");
        let names: Vec<_> = view.visible().iter().map(|r| r.username.clone()).collect();
        assert_eq!(names, ["bob@meract.app"]);

        view.set_search("");
        view.set_status_filter(Some(UserStatus::Warned));
        let ids: Vec<_> = view.visible().iter().map(|r| r.id).collect();
        assert_eq!(ids, [UserId::new(3)]);
    }

    #[tokio::test]
    async fn test_bulk_continues_past_failure() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/user/all-users")
            .with_body(USERS)
            .create_async()
            .await;
        let path = Matcher::Regex(r"^/user/block-user(\?.*)?$".to_string());
        let ok = server
            .mock("POST", path.clone())
            .match_query(Matcher::AnyOf(vec![
                Matcher::UrlEncoded("userId".into(), "1".into()),
                Matcher::UrlEncoded("userId".into(), "3".into()),
            ]))
            .with_status(201)
            .expect(2)
            .create_async()
            .await;
        let failing = server
            .mock("POST", path)
            .match_query(Matcher::UrlEncoded("userId".into(), "2".into()))
            .with_status(400)
            .with_body(r#"{"message":"User already blocked"}"#)
            .expect(1)
            .create_async()
            .await;

        let (mut view, notifier) = view(&server);
        view.load().await.unwrap();
        view.select_all_visible();

        let report = view.apply_bulk(UserAction::Block).await;
        assert_eq!(report.succeeded, [UserId::new(1), UserId::new(3)]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, UserId::new(2));
        assert!(view.selected().is_empty());

        ok.assert_async().await;
        failing.assert_async().await;
        let notices = notifier.notices();
        assert_eq!(notices.last().unwrap().message, "block: 2 succeeded, 1 failed");
    }

    #[tokio::test]
    async fn test_logs_newest_first() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", Matcher::Regex(r"^/user/activity-logs-for-user(\?.*)?$".to_string()))
            .match_query(Matcher::UrlEncoded("userId".into(), "4".into()))
            .with_body(r#"[{"id":1,"action":"first"},{"id":2,"action":"second"}]"#)
            .create_async()
            .await;

        let (users, _) = view(&server);
        let mut logs = UserLogsView::new(users.ctx.clone(), UserId::new(4));
        logs.load().await.unwrap();
        let actions: Vec<_> = logs
            .logs()
            .items()
            .iter()
            .map(|l| l.action.clone().unwrap())
            .collect();
        assert_eq!(actions, ["second", "first"]);
    }
}
