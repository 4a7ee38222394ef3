//! Ranks and rank assignment.

use meract_core::{RankId, UserId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::AdminApi;
use crate::error::GatewayError;
use crate::gateway::RequestDescriptor;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rank {
    pub id: RankId,
    #[serde(default)]
    pub name: String,
}

#[derive(Serialize)]
struct RankForm<'a> {
    name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RankAssignment {
    user_id: UserId,
    rank_id: RankId,
}

/// Entry of `/rank/user/{id}`; the rank is nested.
#[derive(Deserialize)]
struct UserRank {
    rank: Option<Rank>,
}

impl AdminApi {
    /// # Errors
    ///
    /// Returns a gateway error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_ranks(&self) -> Result<Vec<Rank>, GatewayError> {
        self.gateway
            .fetch_json(RequestDescriptor::get("/rank/find-all"))
            .await
    }

    /// # Errors
    ///
    /// Returns a gateway error if the backend rejects the rank.
    #[instrument(skip(self))]
    pub async fn create_rank(&self, name: &str) -> Result<(), GatewayError> {
        let descriptor = RequestDescriptor::post("/rank/create-rank").json(&RankForm { name })?;
        self.gateway.execute_unit(descriptor).await
    }

    /// # Errors
    ///
    /// Returns a gateway error if the backend rejects the update.
    #[instrument(skip(self), fields(rank_id = %id))]
    pub async fn update_rank(&self, id: RankId, name: &str) -> Result<(), GatewayError> {
        let descriptor =
            RequestDescriptor::put(format!("/rank/update-rank/{id}")).json(&RankForm { name })?;
        self.gateway.execute_unit(descriptor).await
    }

    /// # Errors
    ///
    /// Returns a gateway error if the request fails.
    #[instrument(skip(self), fields(rank_id = %id))]
    pub async fn delete_rank(&self, id: RankId) -> Result<(), GatewayError> {
        self.gateway
            .execute_unit(RequestDescriptor::delete(format!("/rank/delete-rank/{id}")))
            .await
    }

    /// # Errors
    ///
    /// Returns a gateway error if the request fails.
    #[instrument(skip(self), fields(user_id = %user_id, rank_id = %rank_id))]
    pub async fn award_rank(&self, user_id: UserId, rank_id: RankId) -> Result<(), GatewayError> {
        let descriptor =
            RequestDescriptor::post("/rank/award").json(&RankAssignment { user_id, rank_id })?;
        self.gateway.execute_unit(descriptor).await
    }

    /// Take a rank away from a user. The backend expects the pair in a
    /// `DELETE` body.
    ///
    /// # Errors
    ///
    /// Returns a gateway error if the request fails.
    #[instrument(skip(self), fields(user_id = %user_id, rank_id = %rank_id))]
    pub async fn revoke_rank(&self, user_id: UserId, rank_id: RankId) -> Result<(), GatewayError> {
        let descriptor = RequestDescriptor::delete(format!("/rank/user/{user_id}"))
            .json(&RankAssignment { user_id, rank_id })?;
        self.gateway.execute_unit(descriptor).await
    }

    /// Ranks currently held by a user.
    ///
    /// # Errors
    ///
    /// Returns a gateway error if the request fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn user_ranks(&self, user_id: UserId) -> Result<Vec<Rank>, GatewayError> {
        let entries: Vec<UserRank> = self
            .gateway
            .fetch_json(RequestDescriptor::get(format!("/rank/user/{user_id}")))
            .await?;
        Ok(entries.into_iter().filter_map(|e| e.rank).collect())
    }
}
