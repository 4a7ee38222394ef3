//! Guild list and membership management.

use meract_core::{GuildId, UserId};

use super::{ListState, ViewContext};
use crate::api::{Guild, GuildFilter, GuildForm};
use crate::error::GatewayError;

#[derive(Debug)]
pub struct GuildsView {
    ctx: ViewContext,
    guilds: ListState<Guild>,
    filter: GuildFilter,
}

impl GuildsView {
    #[must_use]
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            guilds: ListState::default(),
            filter: GuildFilter::default(),
        }
    }

    /// # Errors
    ///
    /// Returns the fetch error; previous guilds are kept.
    pub async fn load(&mut self) -> Result<(), GatewayError> {
        let result = self.ctx.api().list_guilds().await;
        self.guilds.apply(result, "Failed to load guilds")
    }

    #[must_use]
    pub const fn guilds(&self) -> &ListState<Guild> {
        &self.guilds
    }

    pub fn set_filter(&mut self, filter: GuildFilter) {
        self.filter = filter;
    }

    #[must_use]
    pub fn visible(&self) -> Vec<&Guild> {
        self.guilds
            .items()
            .iter()
            .filter(|guild| self.filter.matches(guild))
            .collect()
    }

    /// Logo URL, falling back to the guild's external image.
    #[must_use]
    pub fn logo_url(&self, guild: &Guild) -> String {
        match guild.logo_file_name.as_deref().filter(|f| !f.is_empty()) {
            Some(file) => self.ctx.api().image_url("guild", file),
            None => guild.image.clone().unwrap_or_default(),
        }
    }

    /// # Errors
    ///
    /// Returns the backend's error; nothing is refetched then.
    pub async fn create(&mut self, form: GuildForm) -> Result<(), GatewayError> {
        let result = self.ctx.api().create_guild(form).await;
        self.ctx
            .report(result, "Guild created", "Failed to create guild")?;
        self.refetch().await;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the backend's error; nothing is refetched then.
    pub async fn update(&mut self, id: GuildId, form: GuildForm) -> Result<(), GatewayError> {
        let result = self.ctx.api().update_guild(id, form).await;
        self.ctx
            .report(result, "Guild updated", "Failed to update guild")?;
        self.refetch().await;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the backend's error; nothing is refetched then.
    pub async fn delete(&mut self, id: GuildId) -> Result<(), GatewayError> {
        let result = self.ctx.api().delete_guild(id).await;
        self.ctx
            .report(result, "Guild deleted", "Failed to delete guild")?;
        self.refetch().await;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the backend's error.
    pub async fn invite(&self, guild_id: GuildId, user_id: UserId) -> Result<(), GatewayError> {
        let result = self.ctx.api().invite_to_guild(guild_id, user_id).await;
        self.ctx
            .report(result, "User invited", "Failed to invite user")
    }

    /// # Errors
    ///
    /// Returns the backend's error.
    pub async fn kick(&self, guild_id: GuildId, user_id: UserId) -> Result<(), GatewayError> {
        let result = self.ctx.api().kick_from_guild(guild_id, user_id).await;
        self.ctx
            .report(result, "User removed from guild", "Failed to remove user")
    }

    async fn refetch(&mut self) {
        if let Err(err) = self.load().await {
            tracing::warn!(error = %err, "Failed to refresh guilds");
        }
    }
}
