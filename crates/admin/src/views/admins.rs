//! Admin accounts. Only reachable for a `main admin`.

use meract_core::AdminId;

use super::{ListState, ViewContext};
use crate::api::{Admin, AdminUpdate, NewAdmin};
use crate::error::GatewayError;

#[derive(Debug)]
pub struct AdminsView {
    ctx: ViewContext,
    admins: ListState<Admin>,
}

impl AdminsView {
    #[must_use]
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            admins: ListState::default(),
        }
    }

    /// # Errors
    ///
    /// Returns the fetch error.
    pub async fn load(&mut self) -> Result<(), GatewayError> {
        let result = self.ctx.api().list_admins().await;
        self.admins.apply(result, "Failed to load admins")
    }

    #[must_use]
    pub const fn admins(&self) -> &ListState<Admin> {
        &self.admins
    }

    /// # Errors
    ///
    /// Returns the backend's error; nothing is refetched then.
    pub async fn create(&mut self, admin: &NewAdmin) -> Result<(), GatewayError> {
        let result = self.ctx.api().create_admin(admin).await;
        self.ctx
            .report(result, "Admin created", "Failed to create admin")?;
        self.refetch().await;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the backend's error with validation messages joined.
    pub async fn update(&mut self, id: AdminId, update: &AdminUpdate) -> Result<(), GatewayError> {
        let result = self.ctx.api().update_admin(id, update).await;
        self.ctx
            .report(result, "Admin updated", "Failed to update admin")?;
        self.refetch().await;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the backend's error; nothing is refetched then.
    pub async fn delete(&mut self, id: AdminId) -> Result<(), GatewayError> {
        let result = self.ctx.api().delete_admin(id).await;
        self.ctx
            .report(result, "Admin deleted", "Failed to delete admin")?;
        self.refetch().await;
        Ok(())
    }

    async fn refetch(&mut self) {
        if let Err(err) = self.load().await {
            tracing::warn!(error = %err, "Failed to refresh admins");
        }
    }
}
