//! Gate in front of the protected area.

use reqwest::Method;
use tokio::sync::OnceCell;

use crate::gateway::GatewayClient;
use crate::session::ACCESS_COOKIE;

/// Result of the gate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Authorized,
    RedirectToSignIn,
}

/// One-shot session check.
///
/// The first [`AuthGate::check`] looks for a session marker (the
/// `access_token` cookie or a stored bearer token). Without one it tries a
/// single silent renewal (`POST /auth/refresh`) and looks again. The outcome
/// is cached for the lifetime of the gate; later checks do not re-validate.
#[derive(Debug)]
pub struct AuthGate {
    client: GatewayClient,
    outcome: OnceCell<GateOutcome>,
}

impl AuthGate {
    #[must_use]
    pub fn new(client: GatewayClient) -> Self {
        Self {
            client,
            outcome: OnceCell::new(),
        }
    }

    pub async fn check(&self) -> GateOutcome {
        *self.outcome.get_or_init(|| self.evaluate()).await
    }

    fn has_marker(&self) -> bool {
        let session = self.client.session();
        session.cookie(ACCESS_COOKIE).is_some() || session.has_access_token()
    }

    async fn evaluate(&self) -> GateOutcome {
        if self.has_marker() {
            return GateOutcome::Authorized;
        }

        if let Err(e) = self.client.renew_via(Method::POST).await {
            tracing::info!(error = %e, "No session and silent renewal failed");
            return GateOutcome::RedirectToSignIn;
        }

        if self.has_marker() {
            GateOutcome::Authorized
        } else {
            tracing::info!("Renewal succeeded but left no session marker");
            GateOutcome::RedirectToSignIn
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mockito::Server;
    use secrecy::SecretString;

    use super::*;
    use crate::gateway::REFRESH_PATH;
    use crate::session::SessionState;

    fn gate(server: &Server, session: &SessionState) -> AuthGate {
        AuthGate::new(
            GatewayClient::builder(server.url(), session.clone())
                .build()
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_marker_present_skips_renewal() {
        let mut server = Server::new_async().await;
        let refresh = server
            .mock("POST", REFRESH_PATH)
            .expect(0)
            .create_async()
            .await;

        let session = SessionState::in_memory();
        session.store_access_token(SecretString::from("tok")).unwrap();

        assert_eq!(gate(&server, &session).check().await, GateOutcome::Authorized);
        refresh.assert_async().await;
    }

    #[tokio::test]
    async fn test_renewal_sets_cookie_marker() {
        let mut server = Server::new_async().await;
        let refresh = server
            .mock("POST", REFRESH_PATH)
            .with_status(200)
            .with_header("set-cookie", "access_token=a2; Path=/")
            .expect(1)
            .create_async()
            .await;

        let session = SessionState::in_memory();
        let gate = gate(&server, &session);

        assert_eq!(gate.check().await, GateOutcome::Authorized);
        // Cached: no second renewal.
        assert_eq!(gate.check().await, GateOutcome::Authorized);
        refresh.assert_async().await;
    }

    #[tokio::test]
    async fn test_renewal_failure_redirects() {
        let mut server = Server::new_async().await;
        let refresh = server
            .mock("POST", REFRESH_PATH)
            .with_status(401)
            .expect(1)
            .create_async()
            .await;

        let session = SessionState::in_memory();
        let gate = gate(&server, &session);

        assert_eq!(gate.check().await, GateOutcome::RedirectToSignIn);
        assert_eq!(gate.check().await, GateOutcome::RedirectToSignIn);
        refresh.assert_async().await;
    }

    #[tokio::test]
    async fn test_renewal_without_marker_redirects() {
        let mut server = Server::new_async().await;
        let _refresh = server
            .mock("POST", REFRESH_PATH)
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let session = SessionState::in_memory();
        assert_eq!(
            gate(&server, &session).check().await,
            GateOutcome::RedirectToSignIn
        );
    }
}
