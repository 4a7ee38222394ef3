//! Console configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `MERACT_API_URL` - Base URL of the Meract backend API
//!
//! ## Optional
//! - `MERACT_AGORA_APP_ID` - Media app id (needed to join a stream as viewer)
//! - `MERACT_ROUTING_URL` - OSRM-compatible routing service (default: `https://router.project-osrm.org`)
//! - `MERACT_STATE_DIR` - Directory for the durable session file (default: platform config dir)
//! - `MERACT_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `MERACT_CHAT_POLL_SECS` - Stream chat poll interval (default: 5)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

pub const DEFAULT_ROUTING_URL: &str = "https://router.project-osrm.org";
const DEFAULT_HTTP_TIMEOUT_SECS: &str = "30";
const DEFAULT_CHAT_POLL_SECS: &str = "5";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("No state directory: set MERACT_STATE_DIR")]
    NoStateDir,
}

/// Admin console configuration.
#[derive(Clone)]
pub struct ConsoleConfig {
    /// Backend API base URL, without trailing slash
    pub api_url: String,
    /// Media app id used when joining a stream
    pub agora_app_id: Option<SecretString>,
    /// Routing service base URL, without trailing slash
    pub routing_url: String,
    /// Directory holding the durable session file
    pub state_dir: PathBuf,
    /// Timeout applied to every backend request
    pub http_timeout: Duration,
    /// Interval between stream chat polls
    pub chat_poll_interval: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<SecretString>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
}

impl std::fmt::Debug for ConsoleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleConfig")
            .field("api_url", &self.api_url)
            .field(
                "agora_app_id",
                &self.agora_app_id.as_ref().map(|_| "[REDACTED]"),
            )
            .field("routing_url", &self.routing_url)
            .field("state_dir", &self.state_dir)
            .field("http_timeout", &self.http_timeout)
            .field("chat_poll_interval", &self.chat_poll_interval)
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"))
            .field("sentry_environment", &self.sentry_environment)
            .field("sentry_sample_rate", &self.sentry_sample_rate)
            .finish()
    }
}

impl ConsoleConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `MERACT_API_URL` is missing or any value is
    /// malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`ConsoleConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Lookup(lookup);

        let api_url = parse_base_url("MERACT_API_URL", &env.required("MERACT_API_URL")?)?;
        let routing_url = parse_base_url(
            "MERACT_ROUTING_URL",
            &env.or_default("MERACT_ROUTING_URL", DEFAULT_ROUTING_URL),
        )?;
        let agora_app_id = env.optional("MERACT_AGORA_APP_ID").map(SecretString::from);

        let state_dir = match env.optional("MERACT_STATE_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => default_state_dir().ok_or(ConfigError::NoStateDir)?,
        };

        let http_timeout = Duration::from_secs(parse_secs(
            "MERACT_HTTP_TIMEOUT_SECS",
            &env.or_default("MERACT_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS),
        )?);
        let chat_poll_interval = Duration::from_secs(parse_secs(
            "MERACT_CHAT_POLL_SECS",
            &env.or_default("MERACT_CHAT_POLL_SECS", DEFAULT_CHAT_POLL_SECS),
        )?);

        let sentry_dsn = env.optional("SENTRY_DSN").map(SecretString::from);
        let sentry_environment = env.optional("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = env
            .optional("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            api_url,
            agora_app_id,
            routing_url,
            state_dir,
            http_timeout,
            chat_poll_interval,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Lookup<F>(F);

impl<F> Lookup<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable; blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

/// Validate an http(s) URL and strip any trailing slash.
fn parse_base_url(key: &str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

fn parse_secs(key: &str, raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be greater than zero".to_string(),
        )),
        Ok(secs) => Ok(secs),
        Err(e) => Err(ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
    }
}

fn default_state_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("app", "meract", "meract-admin")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ConsoleConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ConsoleConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_missing_api_url() {
        let err = load(&[("MERACT_STATE_DIR", "/tmp/meract")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "MERACT_API_URL"));
    }

    #[test]
    fn test_defaults() {
        let config = load(&[
            ("MERACT_API_URL", "https://api.meract.app/"),
            ("MERACT_STATE_DIR", "/tmp/meract"),
        ])
        .unwrap();

        assert_eq!(config.api_url, "https://api.meract.app");
        assert_eq!(config.routing_url, DEFAULT_ROUTING_URL);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!(config.chat_poll_interval, Duration::from_secs(5));
        assert!(config.agora_app_id.is_none());
        assert!((config.sentry_sample_rate - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_invalid_url_rejected() {
        let err = load(&[
            ("MERACT_API_URL", "not a url"),
            ("MERACT_STATE_DIR", "/tmp/meract"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "MERACT_API_URL"));

        let err = load(&[
            ("MERACT_API_URL", "ftp://api.meract.app"),
            ("MERACT_STATE_DIR", "/tmp/meract"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, msg) if msg.contains("ftp")));
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let err = load(&[
            ("MERACT_API_URL", "https://api.meract.app"),
            ("MERACT_STATE_DIR", "/tmp/meract"),
            ("MERACT_CHAT_POLL_SECS", "0"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "MERACT_CHAT_POLL_SECS"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = load(&[
            ("MERACT_API_URL", "https://api.meract.app"),
            ("MERACT_STATE_DIR", "/tmp/meract"),
            ("MERACT_AGORA_APP_ID", "agora-app-1234567890"),
            ("SENTRY_DSN", "https://key@sentry.io/42"),
        ])
        .unwrap();

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("https://api.meract.app"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("agora-app-1234567890"));
        assert!(!debug_output.contains("key@sentry.io"));
    }
}
