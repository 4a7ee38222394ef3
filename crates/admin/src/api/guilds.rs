//! Guilds and guild membership.

use meract_core::{GuildId, UserId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::AdminApi;
use crate::error::GatewayError;
use crate::gateway::{FilePart, MultipartBody, RequestDescriptor};

/// Value of a filter that matches every guild.
pub const ALL: &str = "All";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guild {
    pub id: GuildId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub logo_file_name: Option<String>,
    /// Fallback image URL for guilds without an uploaded logo.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub members: Vec<GuildMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildMember {
    pub id: UserId,
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl GuildMember {
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.login
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.email.as_deref())
            .unwrap_or_default()
    }
}

/// Create/edit form. The photo is optional on both.
#[derive(Debug, Clone, Default)]
pub struct GuildForm {
    pub name: String,
    pub description: String,
    pub photo: Option<FilePart>,
}

impl GuildForm {
    fn into_multipart(self) -> MultipartBody {
        let body = MultipartBody::default()
            .text("name", self.name)
            .text("description", self.description);
        match self.photo {
            Some(photo) => body.file(FilePart {
                name: "photo".to_string(),
                ..photo
            }),
            None => body,
        }
    }
}

/// Region and type filter; `None` or `"All"` matches everything.
#[derive(Debug, Clone, Default)]
pub struct GuildFilter {
    pub region: Option<String>,
    pub kind: Option<String>,
}

impl GuildFilter {
    #[must_use]
    pub fn matches(&self, guild: &Guild) -> bool {
        field_matches(self.region.as_deref(), guild.region.as_deref())
            && field_matches(self.kind.as_deref(), guild.kind.as_deref())
    }
}

fn field_matches(wanted: Option<&str>, actual: Option<&str>) -> bool {
    match wanted {
        None | Some(ALL) => true,
        Some(wanted) => actual == Some(wanted),
    }
}

#[derive(Serialize)]
struct EmptyBody {}

impl AdminApi {
    /// # Errors
    ///
    /// Returns a gateway error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_guilds(&self) -> Result<Vec<Guild>, GatewayError> {
        self.gateway
            .fetch_json(RequestDescriptor::get("/guild/find-all"))
            .await
    }

    /// Fetch one guild with its members.
    ///
    /// # Errors
    ///
    /// Returns a gateway error if the request fails.
    #[instrument(skip(self), fields(guild_id = %id))]
    pub async fn guild(&self, id: GuildId) -> Result<Guild, GatewayError> {
        self.gateway
            .fetch_json(RequestDescriptor::get(format!("/guild/{id}")))
            .await
    }

    /// # Errors
    ///
    /// Returns a gateway error if the backend rejects the guild.
    #[instrument(skip(self, form), fields(name = %form.name))]
    pub async fn create_guild(&self, form: GuildForm) -> Result<(), GatewayError> {
        self.gateway
            .execute_unit(RequestDescriptor::post("/guild/create-guild").multipart(form.into_multipart()))
            .await
    }

    /// # Errors
    ///
    /// Returns a gateway error if the backend rejects the update.
    #[instrument(skip(self, form), fields(guild_id = %id))]
    pub async fn update_guild(&self, id: GuildId, form: GuildForm) -> Result<(), GatewayError> {
        self.gateway
            .execute_unit(RequestDescriptor::put(format!("/guild/{id}")).multipart(form.into_multipart()))
            .await
    }

    /// # Errors
    ///
    /// Returns a gateway error if the request fails.
    #[instrument(skip(self), fields(guild_id = %id))]
    pub async fn delete_guild(&self, id: GuildId) -> Result<(), GatewayError> {
        self.gateway
            .execute_unit(RequestDescriptor::delete(format!("/guild/{id}")))
            .await
    }

    /// # Errors
    ///
    /// Returns a gateway error if the request fails.
    #[instrument(skip(self), fields(guild_id = %guild_id, user_id = %user_id))]
    pub async fn invite_to_guild(&self, guild_id: GuildId, user_id: UserId) -> Result<(), GatewayError> {
        self.membership("/guild/invite-user", guild_id, user_id).await
    }

    /// # Errors
    ///
    /// Returns a gateway error if the request fails.
    #[instrument(skip(self), fields(guild_id = %guild_id, user_id = %user_id))]
    pub async fn kick_from_guild(&self, guild_id: GuildId, user_id: UserId) -> Result<(), GatewayError> {
        self.membership("/guild/kick-out-user", guild_id, user_id).await
    }

    async fn membership(&self, path: &str, guild_id: GuildId, user_id: UserId) -> Result<(), GatewayError> {
        let descriptor = RequestDescriptor::post(path)
            .query("userId", user_id)
            .query("guildId", guild_id)
            .json(&EmptyBody {})?;
        self.gateway.execute_unit(descriptor).await
    }
}
