//! Achievements.

use meract_core::{AchievementId, Rarity, UserId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::AdminApi;
use crate::error::GatewayError;
use crate::gateway::RequestDescriptor;

/// Shown when an achievement has no icon of its own.
pub const DEFAULT_ICON: &str = "🏆";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub id: AchievementId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub rarity: Option<Rarity>,
}

impl Achievement {
    #[must_use]
    pub fn icon(&self) -> &str {
        self.icon
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_ICON)
    }

    /// Form prefilled for editing.
    #[must_use]
    pub fn to_form(&self) -> AchievementForm {
        AchievementForm {
            name: self.name.clone(),
            description: self.description.clone().unwrap_or_default(),
            icon: self.icon.clone().unwrap_or_default(),
            rarity: self.rarity.unwrap_or_default(),
        }
    }
}

/// Body of create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AchievementForm {
    pub name: String,
    pub description: String,
    pub icon: String,
    pub rarity: Rarity,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AchievementAward {
    user_id: UserId,
    achievement_id: AchievementId,
}

impl AdminApi {
    /// # Errors
    ///
    /// Returns a gateway error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_achievements(&self) -> Result<Vec<Achievement>, GatewayError> {
        self.gateway
            .fetch_json(RequestDescriptor::get("/achievement/find-all"))
            .await
    }

    /// # Errors
    ///
    /// Returns a gateway error if the backend rejects the achievement.
    #[instrument(skip(self, form), fields(name = %form.name))]
    pub async fn create_achievement(&self, form: &AchievementForm) -> Result<(), GatewayError> {
        let descriptor = RequestDescriptor::post("/achievement/create-achievement").json(form)?;
        self.gateway.execute_unit(descriptor).await
    }

    /// # Errors
    ///
    /// Returns a gateway error if the backend rejects the update.
    #[instrument(skip(self, form), fields(achievement_id = %id))]
    pub async fn update_achievement(
        &self,
        id: AchievementId,
        form: &AchievementForm,
    ) -> Result<(), GatewayError> {
        let descriptor =
            RequestDescriptor::put(format!("/achievement/update-achievement/{id}")).json(form)?;
        self.gateway.execute_unit(descriptor).await
    }

    /// # Errors
    ///
    /// Returns a gateway error if the request fails.
    #[instrument(skip(self), fields(achievement_id = %id))]
    pub async fn delete_achievement(&self, id: AchievementId) -> Result<(), GatewayError> {
        self.gateway
            .execute_unit(RequestDescriptor::delete(format!(
                "/achievement/delete-achievement/{id}"
            )))
            .await
    }

    /// # Errors
    ///
    /// Returns a gateway error if the request fails.
    #[instrument(skip(self), fields(user_id = %user_id, achievement_id = %achievement_id))]
    pub async fn award_achievement(
        &self,
        user_id: UserId,
        achievement_id: AchievementId,
    ) -> Result<(), GatewayError> {
        let descriptor = RequestDescriptor::post("/achievement/award").json(&AchievementAward {
            user_id,
            achievement_id,
        })?;
        self.gateway.execute_unit(descriptor).await
    }
}
