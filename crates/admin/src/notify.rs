//! Operator notifications.
//!
//! Views report outcomes as [`Notice`]s to a [`Notifier`]. The CLI logs
//! them; tests record them.

use std::sync::Mutex;

use crate::error::{ErrorClass, GatewayError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Error notice carrying the backend's message verbatim, or `fallback`
    /// when the backend gave none.
    #[must_use]
    pub fn from_error(err: &GatewayError, fallback: &str) -> Self {
        let message = match err.class() {
            ErrorClass::SessionLost => "Session expired, please sign in again".to_string(),
            _ => err.message().unwrap_or(fallback).to_string(),
        };
        Self {
            level: NoticeLevel::Error,
            message,
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Emits notices as tracing events.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success | NoticeLevel::Info => {
                tracing::info!(message = %notice.message, "notice");
            }
            NoticeLevel::Error => tracing::warn!(message = %notice.message, "notice"),
        }
    }
}

/// Keeps every notice in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|notices| notices.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;

    #[test]
    fn test_error_notice_prefers_backend_message() {
        let rejected = GatewayError::Status {
            status: StatusCode::CONFLICT,
            message: Some("Rank already exists".to_string()),
        };
        assert_eq!(
            Notice::from_error(&rejected, "Failed to create rank").message,
            "Rank already exists"
        );

        let bare = GatewayError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: None,
        };
        let notice = Notice::from_error(&bare, "Failed to create rank");
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "Failed to create rank");
    }

    #[test]
    fn test_recording_notifier() {
        let notifier = RecordingNotifier::default();
        notifier.notify(Notice::success("Rank created"));
        notifier.notify(Notice::info("Nothing selected"));
        assert_eq!(notifier.notices().len(), 2);
    }
}
