//! Sign-in redirect side effect.

use std::sync::{Mutex, PoisonError};

/// Where the operator is sent after the session is lost.
pub const SIGN_IN_PATH: &str = "/sign-in";

/// Reacts to a lost session by sending the operator back to sign-in.
pub trait SignInRedirect: Send + Sync {
    fn redirect_to_sign_in(&self, location: &str);
}

/// Logs the redirect and does nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogRedirect;

impl SignInRedirect for LogRedirect {
    fn redirect_to_sign_in(&self, location: &str) {
        tracing::warn!(location, "Session lost, sign-in required");
    }
}

/// Remembers every redirect; used by tests.
#[derive(Debug, Default)]
pub struct RecordingRedirect {
    locations: Mutex<Vec<String>>,
}

impl RecordingRedirect {
    #[must_use]
    pub fn locations(&self) -> Vec<String> {
        self.locations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SignInRedirect for RecordingRedirect {
    fn redirect_to_sign_in(&self, location: &str) {
        self.locations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(location.to_string());
    }
}
