use meract_core::{AchievementId, UserId};

use super::{ListState, ViewContext};
use crate::api::{Achievement, AchievementForm};
use crate::error::GatewayError;

#[derive(Debug)]
pub struct AchievementsView {
    ctx: ViewContext,
    achievements: ListState<Achievement>,
}

impl AchievementsView {
    #[must_use]
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            achievements: ListState::default(),
        }
    }

    /// # Errors
    ///
    /// Returns the fetch error.
    pub async fn load(&mut self) -> Result<(), GatewayError> {
        let result = self.ctx.api().list_achievements().await;
        self.achievements.apply(result, "Failed to load achievements")
    }

    #[must_use]
    pub const fn achievements(&self) -> &ListState<Achievement> {
        &self.achievements
    }

    /// # Errors
    ///
    /// Returns the backend's error; nothing is refetched then.
    pub async fn create(&mut self, form: &AchievementForm) -> Result<(), GatewayError> {
        let result = self.ctx.api().create_achievement(form).await;
        self.ctx
            .report(result, "Achievement created", "Failed to create achievement")?;
        self.refetch().await;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the backend's error; nothing is refetched then.
    pub async fn update(&mut self, id: AchievementId, form: &AchievementForm) -> Result<(), GatewayError> {
        let result = self.ctx.api().update_achievement(id, form).await;
        self.ctx
            .report(result, "Achievement updated", "Failed to update achievement")?;
        self.refetch().await;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the backend's error; nothing is refetched then.
    pub async fn delete(&mut self, id: AchievementId) -> Result<(), GatewayError> {
        let result = self.ctx.api().delete_achievement(id).await;
        self.ctx
            .report(result, "Achievement deleted", "Failed to delete achievement")?;
        self.refetch().await;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the backend's error.
    pub async fn award(&self, user_id: UserId, achievement_id: AchievementId) -> Result<(), GatewayError> {
        let result = self.ctx.api().award_achievement(user_id, achievement_id).await;
        self.ctx
            .report(result, "Achievement awarded", "Failed to award achievement")
    }

    async fn refetch(&mut self) {
        if let Err(err) = self.load().await {
            tracing::warn!(error = %err, "Failed to refresh achievements");
        }
    }
}
