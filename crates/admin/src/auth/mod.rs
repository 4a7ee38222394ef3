//! Sign-in, sign-out, the protected-area gate and the shell menu.

mod gate;
mod menu;

use meract_core::Email;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::instrument;

pub use gate::{AuthGate, GateOutcome};
pub use menu::{MenuSection, menu_for};

use crate::error::GatewayError;
use crate::gateway::{GatewayClient, RequestDescriptor};
use crate::session::UserProfile;

#[derive(Serialize)]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Sign in as an admin and remember the returned profile in both scopes.
///
/// A 401 here is a wrong password, not an expired session, so the call
/// bypasses renewal.
///
/// # Errors
///
/// Returns `GatewayError::Status` with the backend message on rejected
/// credentials, or a session error if the profile cannot be persisted.
#[instrument(skip(client, password), fields(email = %email))]
pub async fn sign_in(
    client: &GatewayClient,
    email: &Email,
    password: &SecretString,
) -> Result<UserProfile, GatewayError> {
    let descriptor = RequestDescriptor::post("/auth/sign-in")
        .query("role", "admin")
        .json(&SignInRequest {
            email: email.as_str(),
            password: password.expose_secret(),
        })?;

    let mut profile: UserProfile = client.execute_once(descriptor).await?.json()?;

    // Some deployments also return the bearer token alongside the profile.
    if let Some(serde_json::Value::String(access)) = profile.extra.remove("access") {
        client
            .session()
            .store_access_token(SecretString::from(access))?;
    }

    client.session().store_profile(profile.clone())?;
    tracing::info!(user = profile.display_name(), "Signed in");
    Ok(profile)
}

/// Forget the session locally: both scopes, profile and cookies.
///
/// # Errors
///
/// Returns an error if the session file cannot be removed.
pub fn sign_out(client: &GatewayClient) -> Result<(), GatewayError> {
    client.session().clear()?;
    tracing::info!("Signed out");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mockito::{Matcher, Server};

    use super::*;
    use crate::session::SessionState;

    #[tokio::test]
    async fn test_sign_in_stores_profile() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Regex(r"^/auth/sign-in(\?.*)?$".to_string()))
            .match_query(Matcher::UrlEncoded("role".into(), "admin".into()))
            .match_body(Matcher::Json(serde_json::json!({
                "email": "root@meract.app",
                "password": "hunter2!"
            })))
            .with_status(201)
            .with_header("set-cookie", "access_token=a1; Path=/")
            .with_body(r#"{"id":1,"login":"root","email":"root@meract.app","role":{"name":"main admin"}}"#)
            .create_async()
            .await;

        let session = SessionState::in_memory();
        let client = GatewayClient::builder(server.url(), session.clone())
            .build()
            .unwrap();

        let profile = sign_in(
            &client,
            &Email::parse("root@meract.app").unwrap(),
            &SecretString::from("hunter2!"),
        )
        .await
        .unwrap();

        assert!(profile.admin_role().can_manage_admins());
        assert_eq!(session.profile().unwrap().display_name(), "root");
        assert_eq!(session.cookie("access_token").as_deref(), Some("a1"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_sign_in_lifts_access_token() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", Matcher::Regex(r"^/auth/sign-in(\?.*)?$".to_string()))
            .with_status(200)
            .with_body(r#"{"login":"ops","access":"tok-9"}"#)
            .create_async()
            .await;

        let session = SessionState::in_memory();
        let client = GatewayClient::builder(server.url(), session.clone())
            .build()
            .unwrap();

        let profile = sign_in(
            &client,
            &Email::parse("ops@meract.app").unwrap(),
            &SecretString::from("pw"),
        )
        .await
        .unwrap();

        assert!(!profile.extra.contains_key("access"));
        assert_eq!(session.access_token().unwrap().expose_secret(), "tok-9");
    }

    #[tokio::test]
    async fn test_sign_in_rejected() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", Matcher::Regex(r"^/auth/sign-in(\?.*)?$".to_string()))
            .with_status(401)
            .with_body(r#"{"message":"Invalid credentials"}"#)
            .create_async()
            .await;

        let session = SessionState::in_memory();
        let client = GatewayClient::builder(server.url(), session.clone())
            .build()
            .unwrap();

        let err = sign_in(
            &client,
            &Email::parse("ops@meract.app").unwrap(),
            &SecretString::from("wrong"),
        )
        .await
        .unwrap_err();

        assert_eq!(err.message(), Some("Invalid credentials"));
        assert!(session.profile().is_none());
    }

    #[tokio::test]
    async fn test_sign_out_clears_session() {
        let session = SessionState::in_memory();
        session.store_access_token(SecretString::from("tok")).unwrap();
        let client = GatewayClient::builder("http://127.0.0.1:9", session.clone())
            .build()
            .unwrap();

        sign_out(&client).unwrap();
        assert!(!session.has_access_token());
    }
}
