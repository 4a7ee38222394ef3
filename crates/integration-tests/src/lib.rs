//! Shared fixtures for the end-to-end tests.
//!
//! A [`Harness`] couples a mockito backend with a console client whose
//! session lives in a temporary directory, so tests can check both what went
//! over the wire and what was left on disk.

use std::sync::Arc;

use meract_admin::api::AdminApi;
use meract_admin::gateway::{GatewayClient, RecordingRedirect};
use meract_admin::notify::RecordingNotifier;
use meract_admin::session::{SessionError, SessionState};
use meract_admin::views::ViewContext;
use mockito::{Server, ServerGuard};
use tempfile::TempDir;

pub struct Harness {
    pub server: ServerGuard,
    pub session: SessionState,
    pub client: GatewayClient,
    pub redirect: Arc<RecordingRedirect>,
    pub notices: Arc<RecordingNotifier>,
    state_dir: TempDir,
}

impl Harness {
    /// Start a mock backend and a client with an empty durable session.
    ///
    /// # Errors
    ///
    /// Returns an error if the temp dir, session or client cannot be created.
    pub async fn start() -> Result<Self, Box<dyn std::error::Error>> {
        let server = Server::new_async().await;
        let state_dir = tempfile::tempdir()?;
        let session = SessionState::open(state_dir.path())?;
        let redirect = Arc::new(RecordingRedirect::default());
        let client = GatewayClient::builder(server.url(), session.clone())
            .redirect(redirect.clone())
            .build()?;
        Ok(Self {
            server,
            session,
            client,
            redirect,
            notices: Arc::new(RecordingNotifier::default()),
            state_dir,
        })
    }

    #[must_use]
    pub fn api(&self) -> AdminApi {
        AdminApi::new(self.client.clone())
    }

    /// View context whose notices land in [`Harness::notices`].
    #[must_use]
    pub fn ctx(&self) -> ViewContext {
        ViewContext::new(self.api(), self.notices.clone())
    }

    /// Seed a bearer credential, as if a previous sign-in stored one.
    ///
    /// # Errors
    ///
    /// Returns an error if the session file cannot be written.
    pub fn sign_in_with(&self, token: &str) -> Result<(), SessionError> {
        self.session.store_access_token(token.to_string().into())
    }

    /// Load the session again from disk, as a new process would.
    ///
    /// # Errors
    ///
    /// Returns an error if the session file cannot be read.
    pub fn reopen_session(&self) -> Result<SessionState, SessionError> {
        SessionState::open(self.state_dir.path())
    }
}
