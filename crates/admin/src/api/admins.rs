//! Console admin accounts. Only a `main admin` sees these endpoints.

use meract_core::AdminId;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::AdminApi;
use crate::error::GatewayError;
use crate::gateway::RequestDescriptor;
use crate::session::RoleInfo;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    pub id: AdminId,
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Option<RoleInfo>,
}

impl Admin {
    #[must_use]
    pub fn role_name(&self) -> &str {
        self.role.as_ref().map_or("", |r| r.name.as_str())
    }
}

/// Data for a new admin account.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub login: String,
    pub email: String,
    pub password: SecretString,
}

/// Profile edit. Empty passwords leave the password unchanged.
#[derive(Debug, Clone)]
pub struct AdminUpdate {
    pub login: String,
    pub email: String,
    pub old_password: SecretString,
    pub new_password: SecretString,
}

impl AdminUpdate {
    /// Edit form prefilled from an existing account.
    #[must_use]
    pub fn for_admin(admin: &Admin) -> Self {
        Self {
            login: admin.login.clone(),
            email: admin.email.clone(),
            old_password: SecretString::from(String::new()),
            new_password: SecretString::from(String::new()),
        }
    }
}

#[derive(Serialize)]
struct CreateAdminBody<'a> {
    login: &'a str,
    password: &'a str,
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateAdminBody<'a> {
    login: &'a str,
    email: &'a str,
    old_password: &'a str,
    new_password: &'a str,
}

impl AdminApi {
    /// # Errors
    ///
    /// Returns a gateway error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_admins(&self) -> Result<Vec<Admin>, GatewayError> {
        self.gateway
            .fetch_json(RequestDescriptor::get("/admin/find-all"))
            .await
    }

    /// # Errors
    ///
    /// Returns a gateway error if the backend rejects the account.
    #[instrument(skip(self, admin), fields(login = %admin.login))]
    pub async fn create_admin(&self, admin: &NewAdmin) -> Result<(), GatewayError> {
        let descriptor = RequestDescriptor::post("/admin/create-admin").json(&CreateAdminBody {
            login: &admin.login,
            password: admin.password.expose_secret(),
            email: &admin.email,
        })?;
        self.gateway.execute_unit(descriptor).await
    }

    /// # Errors
    ///
    /// Returns a gateway error if the backend rejects the update. Validation
    /// failures carry the backend's messages joined with `, `.
    #[instrument(skip(self, update), fields(admin_id = %id))]
    pub async fn update_admin(&self, id: AdminId, update: &AdminUpdate) -> Result<(), GatewayError> {
        let descriptor = RequestDescriptor::put(format!("/admin/{id}")).json(&UpdateAdminBody {
            login: &update.login,
            email: &update.email,
            old_password: update.old_password.expose_secret(),
            new_password: update.new_password.expose_secret(),
        })?;
        self.gateway.execute_unit(descriptor).await
    }

    /// # Errors
    ///
    /// Returns a gateway error if the request fails.
    #[instrument(skip(self), fields(admin_id = %id))]
    pub async fn delete_admin(&self, id: AdminId) -> Result<(), GatewayError> {
        self.gateway
            .execute_unit(RequestDescriptor::delete(format!("/admin/{id}")))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mockito::{Matcher, Server};

    use super::*;
    use crate::gateway::GatewayClient;
    use crate::session::SessionState;

    fn api(server: &Server) -> AdminApi {
        AdminApi::new(
            GatewayClient::builder(server.url(), SessionState::in_memory())
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_new_admin_debug_redacts_password() {
        let admin = NewAdmin {
            login: "ops".to_string(),
            email: "ops@meract.app".to_string(),
            password: SecretString::from("hunter22".to_string()),
        };
        assert!(!format!("{admin:?}").contains("hunter22"));
    }

    #[tokio::test]
    async fn test_update_body_uses_camel_case() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/admin/3")
            .match_body(Matcher::Json(serde_json::json!({
                "login": "ops",
                "email": "ops@meract.app",
                "oldPassword": "",
                "newPassword": ""
            })))
            .with_status(200)
            .create_async()
            .await;

        let admin: Admin =
            serde_json::from_str(r#"{"id":3,"login":"ops","email":"ops@meract.app","role":{"name":"admin"}}"#)
                .unwrap();
        assert_eq!(admin.role_name(), "admin");

        api(&server)
            .update_admin(admin.id, &AdminUpdate::for_admin(&admin))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_validation_messages_are_joined() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/admin/create-admin")
            .with_status(400)
            .with_body(r#"{"message":["email must be an email","password is too short"]}"#)
            .create_async()
            .await;

        let err = api(&server)
            .create_admin(&NewAdmin {
                login: "ops".to_string(),
                email: "nope".to_string(),
                password: SecretString::from("x".to_string()),
            })
            .await
            .unwrap_err();
        assert_eq!(
            err.message(),
            Some("email must be an email, password is too short")
        );
    }
}
