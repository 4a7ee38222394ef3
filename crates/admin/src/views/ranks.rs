use meract_core::{RankId, UserId};

use super::{ListState, ViewContext};
use crate::api::Rank;
use crate::error::GatewayError;

/// Rank catalogue with award and revoke.
#[derive(Debug)]
pub struct RanksView {
    ctx: ViewContext,
    ranks: ListState<Rank>,
}

impl RanksView {
    #[must_use]
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            ranks: ListState::default(),
        }
    }

    /// # Errors
    ///
    /// Returns the fetch error.
    pub async fn load(&mut self) -> Result<(), GatewayError> {
        let result = self.ctx.api().list_ranks().await;
        self.ranks.apply(result, "Failed to load ranks")
    }

    #[must_use]
    pub const fn ranks(&self) -> &ListState<Rank> {
        &self.ranks
    }

    /// # Errors
    ///
    /// Returns the backend's error; nothing is refetched then.
    pub async fn create(&mut self, name: &str) -> Result<(), GatewayError> {
        let result = self.ctx.api().create_rank(name).await;
        self.ctx
            .report(result, "Rank created", "Failed to create rank")?;
        self.refetch().await;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the backend's error; nothing is refetched then.
    pub async fn update(&mut self, id: RankId, name: &str) -> Result<(), GatewayError> {
        let result = self.ctx.api().update_rank(id, name).await;
        self.ctx
            .report(result, "Rank updated", "Failed to update rank")?;
        self.refetch().await;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the backend's error; nothing is refetched then.
    pub async fn delete(&mut self, id: RankId) -> Result<(), GatewayError> {
        let result = self.ctx.api().delete_rank(id).await;
        self.ctx
            .report(result, "Rank deleted", "Failed to delete rank")?;
        self.refetch().await;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the backend's error.
    pub async fn award(&self, user_id: UserId, rank_id: RankId) -> Result<(), GatewayError> {
        let result = self.ctx.api().award_rank(user_id, rank_id).await;
        self.ctx.report(result, "Rank awarded", "Failed to award rank")
    }

    /// # Errors
    ///
    /// Returns the backend's error.
    pub async fn revoke(&self, user_id: UserId, rank_id: RankId) -> Result<(), GatewayError> {
        let result = self.ctx.api().revoke_rank(user_id, rank_id).await;
        self.ctx.report(result, "Rank revoked", "Failed to revoke rank")
    }

    /// Ranks a user holds, for the revoke dialog.
    ///
    /// # Errors
    ///
    /// Returns the fetch error.
    pub async fn held_by(&self, user_id: UserId) -> Result<Vec<Rank>, GatewayError> {
        self.ctx.api().user_ranks(user_id).await
    }

    async fn refetch(&mut self) {
        if let Err(err) = self.load().await {
            tracing::warn!(error = %err, "Failed to refresh ranks");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use mockito::Server;

    use super::*;
    use crate::api::AdminApi;
    use crate::gateway::GatewayClient;
    use crate::notify::RecordingNotifier;
    use crate::session::SessionState;

    #[tokio::test]
    async fn test_create_without_message_uses_fallback() {
        let mut server = Server::new_async().await;
        let list = server
            .mock("GET", "/rank/find-all")
            .expect(0)
            .create_async()
            .await;
        server
            .mock("POST", "/rank/create-rank")
            .with_status(500)
            .create_async()
            .await;

        let notifier = Arc::new(RecordingNotifier::default());
        let api = AdminApi::new(
            GatewayClient::builder(server.url(), SessionState::in_memory())
                .build()
                .unwrap(),
        );
        let mut view = RanksView::new(ViewContext::new(api, notifier.clone()));
        assert!(view.create("Scout").await.is_err());

        list.assert_async().await;
        assert_eq!(notifier.notices()[0].message, "Failed to create rank");
    }
}
