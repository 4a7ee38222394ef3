//! Platform users and moderation actions.

use meract_core::{UserAction, UserId, UserStatus};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{ActivityLog, AdminApi};
use crate::error::GatewayError;
use crate::gateway::RequestDescriptor;

/// A platform user as returned by `/user/all-users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub status: Option<UserStatus>,
    #[serde(default)]
    pub last_activity: Option<String>,
    #[serde(default)]
    pub warnings: Option<i64>,
    #[serde(default)]
    pub streams: Option<i64>,
    #[serde(default)]
    pub followers: Option<i64>,
}

impl User {
    /// Login when set, else email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.login
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.email.as_deref())
            .unwrap_or_default()
    }
}

/// A user as the moderation list shows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRow {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub status: UserStatus,
    pub last_active: Option<String>,
    pub warnings: i64,
    pub stream_count: i64,
    pub followers: i64,
}

impl From<User> for UserRow {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.display_name().to_string(),
            email: user.email.unwrap_or_default(),
            status: user.status.unwrap_or_default(),
            last_active: user.last_activity,
            warnings: user.warnings.unwrap_or_default(),
            stream_count: user.streams.unwrap_or_default(),
            followers: user.followers.unwrap_or_default(),
        }
    }
}

impl UserRow {
    /// Case-insensitive substring match on username or email.
    #[must_use]
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.username.to_lowercase().contains(&term) || self.email.to_lowercase().contains(&term)
    }
}

/// Map users to rows sorted by email.
#[must_use]
pub fn user_rows(users: Vec<User>) -> Vec<UserRow> {
    let mut rows: Vec<UserRow> = users.into_iter().map(UserRow::from).collect();
    rows.sort_by(|a, b| a.email.cmp(&b.email));
    rows
}

const fn action_path(action: UserAction) -> &'static str {
    match action {
        UserAction::Warn => "/user/issue-warning",
        UserAction::Block => "/user/block-user",
        UserAction::Unblock => "/user/unblock-user",
        UserAction::Delete => "/user/delete-user",
    }
}

impl AdminApi {
    /// Fetch every platform user.
    ///
    /// # Errors
    ///
    /// Returns a gateway error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, GatewayError> {
        self.gateway
            .fetch_json(RequestDescriptor::get("/user/all-users"))
            .await
    }

    /// Fetch users as moderation rows, sorted by email.
    ///
    /// # Errors
    ///
    /// Returns a gateway error if the request fails.
    pub async fn user_rows(&self) -> Result<Vec<UserRow>, GatewayError> {
        Ok(user_rows(self.list_users().await?))
    }

    /// Apply a moderation action to one user.
    ///
    /// # Errors
    ///
    /// Returns a gateway error if the backend rejects the action.
    #[instrument(skip(self), fields(user_id = %user_id, action = %action))]
    pub async fn apply_user_action(
        &self,
        user_id: UserId,
        action: UserAction,
    ) -> Result<(), GatewayError> {
        self.gateway
            .execute_unit(RequestDescriptor::post(action_path(action)).query("userId", user_id))
            .await
    }

    /// Activity log of one user, oldest first as the backend sends it.
    ///
    /// # Errors
    ///
    /// Returns a gateway error if the request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn user_activity_logs(&self, user_id: UserId) -> Result<Vec<ActivityLog>, GatewayError> {
        self.gateway
            .fetch_json(
                RequestDescriptor::get("/user/activity-logs-for-user").query("userId", user_id),
            )
            .await
    }

    /// Users that can be invited to a guild.
    ///
    /// # Errors
    ///
    /// Returns a gateway error if the request fails.
    #[instrument(skip(self))]
    pub async fn users_for_guild(&self) -> Result<Vec<User>, GatewayError> {
        self.gateway
            .fetch_json(RequestDescriptor::get("/user/all-users-for-guild"))
            .await
    }
}
