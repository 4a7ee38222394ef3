//! Durable session scope: a JSON file in the state directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{SessionError, UserProfile};

const SESSION_FILE: &str = "session.json";

/// On-disk shape of the durable scope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct StoredSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserProfile>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub cookies: BTreeMap<String, String>,
}

/// File-backed store at `<state_dir>/session.json`.
#[derive(Debug, Clone)]
pub(crate) struct DurableStore {
    path: PathBuf,
}

impl DurableStore {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(SESSION_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored session. A missing file is an empty session.
    pub fn load(&self) -> Result<StoredSession, SessionError> {
        match std::fs::read_to_string(&self.path) {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoredSession::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, session: &StoredSession) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, data)?;

        // Owner-only: the file holds a bearer token
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    pub fn remove(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = DurableStore::in_dir(dir.path());
        let session = store.load().unwrap();
        assert!(session.access.is_none());
        assert!(session.cookies.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = DurableStore::in_dir(&dir.path().join("nested"));

        let mut session = StoredSession {
            access: Some("tok-1".to_string()),
            ..StoredSession::default()
        };
        session
            .cookies
            .insert("refresh_token".to_string(), "r1".to_string());
        store.save(&session).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.access.as_deref(), Some("tok-1"));
        assert_eq!(loaded.cookies.get("refresh_token").map(String::as_str), Some("r1"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn test_remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = DurableStore::in_dir(dir.path());
        store.save(&StoredSession::default()).unwrap();
        store.remove().unwrap();
        store.remove().unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = DurableStore::in_dir(dir.path());
        std::fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(store.load(), Err(SessionError::Serialize(_))));
    }
}
