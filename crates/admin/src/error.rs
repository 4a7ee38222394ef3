//! Gateway errors and their mapping onto the console's error taxonomy.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::session::SessionError;

/// Errors returned by [`GatewayClient`](crate::gateway::GatewayClient) and
/// everything built on top of it.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport failure (connect, timeout, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("{}", format_status(*.status, .message.as_deref()))]
    Status {
        status: StatusCode,
        /// `message` from the error payload, joined when it is a list.
        message: Option<String>,
    },

    /// A 401 was answered by a renewal attempt that itself failed.
    ///
    /// Session state has been cleared and the sign-in redirect fired.
    #[error("Session renewal failed: {0}")]
    RenewalFailed(Box<Self>),

    /// Response body did not match the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The request could not be built (bad path, bad multipart part).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Durable session store could not be written.
    #[error("Session store error: {0}")]
    Session(#[from] SessionError),
}

/// Error classes the console reacts to differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// 401 that reached the caller: a replayed call was rejected again.
    AuthorizationExpired,
    /// Renewal failed; the operator must sign in again.
    SessionLost,
    /// 4xx/5xx with a payload; shown verbatim.
    Rejected,
    /// Network, parse or anything else; shown as a generic failure.
    Unknown,
}

impl GatewayError {
    /// HTTP status behind this error, looking through renewal failures.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::RenewalFailed(inner) => inner.status(),
            Self::Http(e) => e.status(),
            _ => None,
        }
    }

    /// Backend-supplied message, if the error payload carried one.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            Self::RenewalFailed(inner) => inner.message(),
            _ => None,
        }
    }

    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::RenewalFailed(_) => ErrorClass::SessionLost,
            Self::Status { status, .. } if *status == StatusCode::UNAUTHORIZED => {
                ErrorClass::AuthorizationExpired
            }
            Self::Status { message: Some(_), .. } => ErrorClass::Rejected,
            _ => ErrorClass::Unknown,
        }
    }

    /// Build a status error from a raw error body.
    pub(crate) fn from_status(status: StatusCode, body: &[u8]) -> Self {
        Self::Status {
            status,
            message: parse_error_message(body),
        }
    }
}

/// `message` in an error payload is either a string or a list of strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum MessageField {
    One(String),
    Many(Vec<String>),
}

#[derive(Deserialize)]
struct ErrorPayload {
    message: Option<MessageField>,
}

/// Extract the `message` of a backend error payload.
pub(crate) fn parse_error_message(body: &[u8]) -> Option<String> {
    let payload: ErrorPayload = serde_json::from_slice(body).ok()?;
    let message = match payload.message? {
        MessageField::One(message) => message,
        MessageField::Many(messages) => messages.join(", "),
    };
    (!message.trim().is_empty()).then_some(message)
}

fn format_status(status: StatusCode, message: Option<&str>) -> String {
    match message {
        Some(message) => format!("API error ({status}): {message}"),
        None => format!("API error ({status})"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_message_string() {
        let body = br#"{"statusCode":400,"message":"Rank already exists"}"#;
        assert_eq!(
            parse_error_message(body).as_deref(),
            Some("Rank already exists")
        );
    }

    #[test]
    fn test_parse_error_message_list() {
        let body = br#"{"message":["email must be an email","password is too short"]}"#;
        assert_eq!(
            parse_error_message(body).as_deref(),
            Some("email must be an email, password is too short")
        );
    }

    #[test]
    fn test_parse_error_message_absent() {
        assert!(parse_error_message(b"<html>Bad Gateway</html>").is_none());
        assert!(parse_error_message(br#"{"error":"Bad Request"}"#).is_none());
        assert!(parse_error_message(br#"{"message":""}"#).is_none());
    }

    #[test]
    fn test_status_error_display() {
        let err = GatewayError::from_status(
            StatusCode::BAD_REQUEST,
            br#"{"message":"Name is required"}"#,
        );
        assert_eq!(err.to_string(), "API error (400 Bad Request): Name is required");

        let err = GatewayError::from_status(StatusCode::BAD_GATEWAY, b"");
        assert_eq!(err.to_string(), "API error (502 Bad Gateway)");
    }

    #[test]
    fn test_error_classes() {
        let expired = GatewayError::from_status(StatusCode::UNAUTHORIZED, b"");
        assert_eq!(expired.class(), ErrorClass::AuthorizationExpired);

        let rejected = GatewayError::from_status(
            StatusCode::CONFLICT,
            br#"{"message":"Login taken"}"#,
        );
        assert_eq!(rejected.class(), ErrorClass::Rejected);
        assert_eq!(rejected.message(), Some("Login taken"));

        let lost = GatewayError::RenewalFailed(Box::new(GatewayError::from_status(
            StatusCode::FORBIDDEN,
            b"",
        )));
        assert_eq!(lost.class(), ErrorClass::SessionLost);
        assert_eq!(lost.status(), Some(StatusCode::FORBIDDEN));

        let unknown = GatewayError::from_status(StatusCode::INTERNAL_SERVER_ERROR, b"");
        assert_eq!(unknown.class(), ErrorClass::Unknown);

        let parse = serde_json::from_str::<u32>("nope").unwrap_err();
        assert_eq!(GatewayError::from(parse).class(), ErrorClass::Unknown);
    }
}
