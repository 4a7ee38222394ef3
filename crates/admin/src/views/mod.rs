//! List view models for the console's sections.
//!
//! A view fetches when it is opened ([`load`](users::UsersView::load) on each
//! view), filters and searches locally, and refetches after every successful
//! mutation. Outcomes are reported through the shared [`Notifier`]. Views
//! never build requests; they call [`AdminApi`].

pub mod achievements;
pub mod admins;
pub mod award;
pub mod dashboard;
pub mod guilds;
pub mod ranks;
pub mod streams;
pub mod users;

use std::sync::Arc;

pub use achievements::AchievementsView;
pub use admins::AdminsView;
pub use award::AwardPicker;
pub use dashboard::DashboardView;
pub use guilds::GuildsView;
pub use ranks::RanksView;
pub use streams::StreamsView;
pub use users::{BulkReport, UserLogsView, UsersView};

use crate::api::AdminApi;
use crate::error::GatewayError;
use crate::notify::{Notice, Notifier};

/// What every view needs: the API and somewhere to report outcomes.
#[derive(Clone)]
pub struct ViewContext {
    api: AdminApi,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for ViewContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewContext")
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}

impl ViewContext {
    #[must_use]
    pub fn new(api: AdminApi, notifier: Arc<dyn Notifier>) -> Self {
        Self { api, notifier }
    }

    #[must_use]
    pub const fn api(&self) -> &AdminApi {
        &self.api
    }

    pub fn notify(&self, notice: Notice) {
        self.notifier.notify(notice);
    }

    /// Report a mutation outcome and pass it through.
    pub(crate) fn report<T>(
        &self,
        result: Result<T, GatewayError>,
        success: &str,
        fallback: &str,
    ) -> Result<T, GatewayError> {
        match &result {
            Ok(_) => self.notify(Notice::success(success)),
            Err(err) => {
                tracing::warn!(error = %err, "{fallback}");
                self.notify(Notice::from_error(err, fallback));
            }
        }
        result
    }
}

/// Items of a list view plus the last load error.
///
/// A failed load keeps the previous items.
#[derive(Debug, Clone)]
pub struct ListState<T> {
    items: Vec<T>,
    loaded: bool,
    error: Option<String>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loaded: false,
            error: None,
        }
    }
}

impl<T> ListState<T> {
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Record a fetch result. The error is returned to the caller as well.
    pub(crate) fn apply(
        &mut self,
        result: Result<Vec<T>, GatewayError>,
        fallback: &str,
    ) -> Result<(), GatewayError> {
        match result {
            Ok(items) => {
                self.items = items;
                self.loaded = true;
                self.error = None;
                Ok(())
            }
            Err(err) => {
                self.error = Some(err.message().unwrap_or(fallback).to_string());
                Err(err)
            }
        }
    }
}
