//! Session-aware API gateway.
//!
//! Every backend call goes through [`GatewayClient::execute`], which
//!
//! - attaches `Authorization: Bearer <token>` when the session holds one,
//! - on a 401 renews the session once (`GET /auth/refresh`) and replays the
//!   original request with the new credential,
//! - on a failed renewal clears the session, fires the sign-in redirect and
//!   returns the renewal error,
//! - returns every other failure as is.
//!
//! There is no retry on timeouts or 5xx, no backoff, and concurrent renewals
//! are not coalesced: each runs and the last completed write wins.

mod call;
mod redirect;
mod request;
mod response;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

pub use call::{CallState, CallTrace, Fresh, OutboundCall, Replayed, Stage};
pub use redirect::{LogRedirect, RecordingRedirect, SIGN_IN_PATH, SignInRedirect};
pub use request::{Body, FilePart, MultipartBody, RequestDescriptor};
pub use response::GatewayResponse;

use crate::error::GatewayError;
use crate::session::{SessionCookies, SessionState};

/// Session renewal endpoint.
pub const REFRESH_PATH: &str = "/auth/refresh";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the Meract backend API.
///
/// Cheap to clone; clones share the HTTP connection pool and session.
#[derive(Clone)]
pub struct GatewayClient {
    inner: Arc<GatewayInner>,
}

struct GatewayInner {
    client: reqwest::Client,
    base_url: String,
    session: SessionState,
    redirect: Arc<dyn SignInRedirect>,
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("base_url", &self.inner.base_url)
            .field("session", &self.inner.session)
            .finish_non_exhaustive()
    }
}

/// Builder for [`GatewayClient`].
pub struct GatewayClientBuilder {
    base_url: String,
    session: SessionState,
    timeout: Duration,
    redirect: Arc<dyn SignInRedirect>,
}

impl GatewayClientBuilder {
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn redirect(mut self, redirect: Arc<dyn SignInRedirect>) -> Self {
        self.redirect = redirect;
        self
    }

    /// Build the client.
    ///
    /// Cookies set by the backend go into the session's cookie map.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Http` if the HTTP client cannot be created.
    pub fn build(self) -> Result<GatewayClient, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .cookie_provider(Arc::new(SessionCookies::new(self.session.clone())))
            .build()?;

        Ok(GatewayClient {
            inner: Arc::new(GatewayInner {
                client,
                base_url: self.base_url.trim_end_matches('/').to_string(),
                session: self.session,
                redirect: self.redirect,
            }),
        })
    }
}

fn is_unauthorized(outcome: &Result<GatewayResponse, GatewayError>) -> bool {
    matches!(outcome, Err(GatewayError::Status { status, .. }) if *status == StatusCode::UNAUTHORIZED)
}

/// Body of a successful renewal.
#[derive(Debug, Deserialize)]
struct RenewalBody {
    access: Option<String>,
}

impl GatewayClient {
    #[must_use]
    pub fn builder(base_url: impl Into<String>, session: SessionState) -> GatewayClientBuilder {
        GatewayClientBuilder {
            base_url: base_url.into(),
            session,
            timeout: DEFAULT_TIMEOUT,
            redirect: Arc::new(LogRedirect),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    #[must_use]
    pub fn session(&self) -> &SessionState {
        &self.inner.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Execute a request with renewal-and-replay on 401.
    ///
    /// # Errors
    ///
    /// - `GatewayError::RenewalFailed` if a 401 could not be recovered; the
    ///   session has been cleared and the sign-in redirect fired.
    /// - `GatewayError::Status` for any other non-success status, including a
    ///   401 on the replay.
    /// - `GatewayError::Http` for transport failures.
    #[instrument(skip(self, descriptor), fields(method = %descriptor.method, path = %descriptor.path))]
    pub async fn execute(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<GatewayResponse, GatewayError> {
        let mut call = OutboundCall::new(descriptor);
        let outcome = self.attempt(&mut call).await;
        if !is_unauthorized(&outcome) {
            call.finish(outcome.is_ok());
            return outcome;
        }

        let mut call = call.into_replay();
        tracing::debug!("Authorization expired, renewing session");

        if let Err(err) = self.renew().await {
            call.finish(false);
            self.abandon_session(&err);
            return Err(GatewayError::RenewalFailed(Box::new(err)));
        }

        let outcome = self.attempt(&mut call).await;
        call.finish(outcome.is_ok());
        tracing::trace!(states = ?call.trace().states(), "Replayed call finished");
        outcome
    }

    /// Execute a request without the renewal path.
    ///
    /// Used for sign-in, the renewal call itself and the auth gate.
    ///
    /// # Errors
    ///
    /// Same as [`GatewayClient::execute`] minus `RenewalFailed`.
    #[instrument(skip(self, descriptor), fields(method = %descriptor.method, path = %descriptor.path))]
    pub async fn execute_once(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<GatewayResponse, GatewayError> {
        let mut call = OutboundCall::new(descriptor);
        let outcome = self.attempt(&mut call).await;
        call.finish(outcome.is_ok());
        outcome
    }

    /// Execute and deserialize the JSON body.
    ///
    /// # Errors
    ///
    /// See [`GatewayClient::execute`]; `GatewayError::Parse` on a body of the
    /// wrong shape.
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<T, GatewayError> {
        self.execute(descriptor).await?.json()
    }

    /// Execute and discard the body.
    ///
    /// # Errors
    ///
    /// See [`GatewayClient::execute`].
    pub async fn execute_unit(&self, descriptor: RequestDescriptor) -> Result<(), GatewayError> {
        self.execute(descriptor).await.map(|_| ())
    }

    /// Renew the session with `GET /auth/refresh`.
    ///
    /// # Errors
    ///
    /// Returns the renewal call's error. Session state is left untouched.
    pub async fn renew(&self) -> Result<(), GatewayError> {
        self.renew_via(Method::GET).await
    }

    pub(crate) async fn renew_via(&self, method: Method) -> Result<(), GatewayError> {
        let response = self
            .execute_once(RequestDescriptor::new(method, REFRESH_PATH))
            .await?;

        // No token in the body: the refreshed cookies carry the session.
        let access = serde_json::from_slice::<RenewalBody>(&response.body)
            .ok()
            .and_then(|body| body.access)
            .filter(|token| !token.is_empty());
        if let Some(token) = access {
            self.inner
                .session
                .store_access_token(SecretString::from(token))?;
            tracing::debug!("Stored renewed access token");
        }
        Ok(())
    }

    fn abandon_session(&self, cause: &GatewayError) {
        tracing::warn!(error = %cause, "Session renewal failed, clearing session");
        if let Err(e) = self.inner.session.clear() {
            tracing::error!(error = %e, "Failed to clear session file");
        }
        self.inner.redirect.redirect_to_sign_in(SIGN_IN_PATH);
    }

    /// Send one attempt of `call`. The caller records the terminal state.
    async fn attempt<S: Stage>(
        &self,
        call: &mut OutboundCall<S>,
    ) -> Result<GatewayResponse, GatewayError> {
        call.mark_sent();
        let request = self.build_request(call.descriptor())?;
        self.send(request, S::REPLAYED).await
    }

    fn build_request(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<reqwest::RequestBuilder, GatewayError> {
        let mut builder = self
            .inner
            .client
            .request(descriptor.method.clone(), self.url(&descriptor.path))
            .headers(descriptor.headers.clone());

        if !descriptor.query.is_empty() {
            builder = builder.query(&descriptor.query);
        }

        if let Some(token) = self.inner.session.access_token() {
            builder = builder.bearer_auth(token.expose_secret());
        }

        builder = match &descriptor.body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(value),
            Body::Multipart(body) => builder.multipart(body.to_form()?),
        };

        Ok(builder)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        replayed: bool,
    ) -> Result<GatewayResponse, GatewayError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        if status.is_success() {
            return Ok(GatewayResponse {
                status,
                body,
                replayed,
            });
        }

        tracing::debug!(%status, replayed, "Request rejected");
        Err(GatewayError::from_status(status, &body))
    }
}
