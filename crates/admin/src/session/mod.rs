//! Session state: the bearer credential, the operator profile and cookies.
//!
//! Two scopes are kept, like a browser's local and session storage:
//!
//! - **durable**: persisted to `session.json` in the state directory and
//!   reloaded by the next process,
//! - **session**: process memory only.
//!
//! Every write updates both scopes under one write lock and persists the
//! durable scope before the lock is released, so readers never observe the
//! scopes disagreeing. Reads check the durable scope first; a value in either
//! scope counts.

mod cookies;
mod profile;
mod store;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

pub use cookies::SessionCookies;
pub use profile::{RoleInfo, UserProfile};
use store::{DurableStore, StoredSession};

/// Name of the non-HTTP-only cookie the backend sets while a session is live.
pub const ACCESS_COOKIE: &str = "access_token";

/// Errors from the durable session store.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session file is malformed: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Clone, Default)]
struct Scope {
    access: Option<SecretString>,
    profile: Option<UserProfile>,
}

#[derive(Default)]
struct Scopes {
    durable: Scope,
    session: Scope,
    cookies: BTreeMap<String, String>,
    store: Option<DurableStore>,
}

impl Scopes {
    /// Blocking write of the durable scope, done under the write guard.
    ///
    /// The guard is a `std::sync::RwLock` and is never held across an
    /// `.await`: every caller (including reqwest's `CookieStore` callback)
    /// takes it, mutates, persists and drops it synchronously.
    fn persist(&self) -> Result<(), SessionError> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        store.save(&StoredSession {
            access: self
                .durable
                .access
                .as_ref()
                .map(|token| token.expose_secret().to_string()),
            profile: self.durable.profile.clone(),
            cookies: self.cookies.clone(),
        })
    }
}

/// Shared handle to the session scopes.
#[derive(Clone, Default)]
pub struct SessionState {
    inner: Arc<RwLock<Scopes>>,
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let scopes = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("SessionState")
            .field("durable_access", &scopes.durable.access.as_ref().map(|_| "[REDACTED]"))
            .field("session_access", &scopes.session.access.as_ref().map(|_| "[REDACTED]"))
            .field("profile", &scopes.durable.profile.as_ref().map(UserProfile::display_name))
            .field("cookies", &scopes.cookies.keys().collect::<Vec<_>>())
            .field("store", &scopes.store.as_ref().map(DurableStore::path))
            .finish()
    }
}

impl SessionState {
    /// Open the session persisted under `dir`.
    ///
    /// The session scope starts empty, as it does for a new browser tab. A
    /// malformed session file is discarded with a warning.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Io` if the file exists but cannot be read.
    pub fn open(dir: &Path) -> Result<Self, SessionError> {
        let store = DurableStore::in_dir(dir);
        let stored = match store.load() {
            Ok(stored) => stored,
            Err(SessionError::Serialize(e)) => {
                tracing::warn!(path = %store.path().display(), error = %e, "Discarding malformed session file");
                StoredSession::default()
            }
            Err(e) => return Err(e),
        };

        let scopes = Scopes {
            durable: Scope {
                access: stored.access.map(SecretString::from),
                profile: stored.profile,
            },
            session: Scope::default(),
            cookies: stored.cookies,
            store: Some(store),
        };

        Ok(Self {
            inner: Arc::new(RwLock::new(scopes)),
        })
    }

    /// A session that is never written to disk.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    fn write(&self) -> RwLockWriteGuard<'_, Scopes> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read<T>(&self, f: impl FnOnce(&Scopes) -> T) -> T {
        let scopes = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&scopes)
    }

    /// Current bearer credential, durable scope first.
    #[must_use]
    pub fn access_token(&self) -> Option<SecretString> {
        self.read(|s| s.durable.access.clone().or_else(|| s.session.access.clone()))
    }

    #[must_use]
    pub fn has_access_token(&self) -> bool {
        self.read(|s| s.durable.access.is_some() || s.session.access.is_some())
    }

    /// Write a new credential into both scopes.
    ///
    /// # Errors
    ///
    /// Returns an error if the durable scope cannot be persisted. Memory is
    /// updated either way.
    pub fn store_access_token(&self, token: SecretString) -> Result<(), SessionError> {
        let mut scopes = self.write();
        scopes.session.access = Some(token.clone());
        scopes.durable.access = Some(token);
        scopes.persist()
    }

    /// Signed-in profile, durable scope first.
    #[must_use]
    pub fn profile(&self) -> Option<UserProfile> {
        self.read(|s| {
            s.durable
                .profile
                .clone()
                .or_else(|| s.session.profile.clone())
        })
    }

    /// Write the profile into both scopes.
    ///
    /// # Errors
    ///
    /// Returns an error if the durable scope cannot be persisted.
    pub fn store_profile(&self, profile: UserProfile) -> Result<(), SessionError> {
        let mut scopes = self.write();
        scopes.session.profile = Some(profile.clone());
        scopes.durable.profile = Some(profile);
        scopes.persist()
    }

    /// Drop credentials, profile and cookies from both scopes and delete the
    /// session file.
    ///
    /// # Errors
    ///
    /// Returns an error if the session file cannot be removed. Memory is
    /// cleared either way.
    pub fn clear(&self) -> Result<(), SessionError> {
        let mut scopes = self.write();
        scopes.durable = Scope::default();
        scopes.session = Scope::default();
        scopes.cookies.clear();
        match &scopes.store {
            Some(store) => store.remove(),
            None => Ok(()),
        }
    }

    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.read(|s| s.cookies.get(name).cloned())
    }

    /// `Cookie` header value for the stored cookies, if any.
    #[must_use]
    pub fn cookie_header(&self) -> Option<String> {
        self.read(|s| {
            if s.cookies.is_empty() {
                return None;
            }
            Some(
                s.cookies
                    .iter()
                    .map(|(name, value)| format!("{name}={value}"))
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        })
    }

    /// Apply `Set-Cookie` outcomes: `Some(value)` sets, `None` removes.
    pub(crate) fn apply_cookies(
        &self,
        updates: impl IntoIterator<Item = (String, Option<String>)>,
    ) -> Result<(), SessionError> {
        let mut scopes = self.write();
        let mut changed = false;
        for (name, value) in updates {
            changed |= match value {
                Some(value) => scopes.cookies.insert(name, value.clone()).as_ref() != Some(&value),
                None => scopes.cookies.remove(&name).is_some(),
            };
        }
        if changed { scopes.persist() } else { Ok(()) }
    }

    /// Put a credential into the session scope only, as a fresh tab that
    /// signed in elsewhere would see it.
    #[cfg(test)]
    pub(crate) fn store_session_scope_token(&self, token: &str) {
        self.write().session.access = Some(SecretString::from(token));
    }
}
