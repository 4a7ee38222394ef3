//! Command implementations.

pub mod achievements;
pub mod admins;
pub mod auth;
pub mod dashboard;
pub mod guilds;
pub mod ranks;
pub mod streams;
pub mod users;

use std::sync::Arc;

use meract_admin::api::AdminApi;
use meract_admin::config::ConsoleConfig;
use meract_admin::error::GatewayError;
use meract_admin::gateway::{GatewayClient, LogRedirect};
use meract_admin::notify::TracingNotifier;
use meract_admin::session::{SessionError, SessionState};
use meract_admin::viewer::{RoutingError, ViewerError};
use meract_admin::views::ViewContext;
use serde::Serialize;
use thiserror::Error;

use crate::output;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Viewer(#[from] ViewerError),

    #[error(transparent)]
    Routing(#[from] RoutingError),

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] meract_core::EmailError),

    #[error("Not signed in. Run `meract sign-in` first")]
    NotSignedIn,

    #[error("{0} requires the main admin role")]
    Forbidden(&'static str),

    #[error("Invalid argument: {0}")]
    Invalid(String),

    #[error("{failed} of {total} items failed")]
    Partial { failed: usize, total: usize },
}

/// Everything a command needs.
pub struct Console {
    config: ConsoleConfig,
    client: GatewayClient,
    ctx: ViewContext,
    json: bool,
}

impl Console {
    /// Open the stored session and build the client stack.
    ///
    /// # Errors
    ///
    /// Returns an error if the session file cannot be read or the HTTP
    /// client cannot be built.
    pub fn open(config: ConsoleConfig, json: bool) -> Result<Self, CliError> {
        let session = SessionState::open(&config.state_dir)?;
        let client = GatewayClient::builder(config.api_url.clone(), session)
            .timeout(config.http_timeout)
            .redirect(Arc::new(LogRedirect))
            .build()?;
        let ctx = ViewContext::new(AdminApi::new(client.clone()), Arc::new(TracingNotifier));
        Ok(Self {
            config,
            client,
            ctx,
            json,
        })
    }

    pub const fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub const fn client(&self) -> &GatewayClient {
        &self.client
    }

    pub const fn api(&self) -> &AdminApi {
        self.ctx.api()
    }

    pub fn ctx(&self) -> ViewContext {
        self.ctx.clone()
    }

    pub const fn json(&self) -> bool {
        self.json
    }

    pub fn print_line(&self, text: &str) -> Result<(), CliError> {
        Ok(output::line(text)?)
    }

    /// Print `value` as JSON, or the text rendering when JSON is off.
    pub fn print<T: Serialize + ?Sized>(
        &self,
        value: &T,
        text: impl FnOnce() -> std::io::Result<()>,
    ) -> Result<(), CliError> {
        if self.json {
            output::json(value)?;
        } else {
            text()?;
        }
        Ok(())
    }

    /// Fail unless the stored profile is a main admin.
    pub fn require_main_admin(&self, what: &'static str) -> Result<(), CliError> {
        let profile = self.client.session().profile().ok_or(CliError::NotSignedIn)?;
        if profile.admin_role().can_manage_admins() {
            Ok(())
        } else {
            Err(CliError::Forbidden(what))
        }
    }
}

pub(crate) fn opt(value: Option<&str>) -> String {
    value.filter(|s| !s.is_empty()).unwrap_or("-").to_string()
}
