//! Cookie jar backed by the durable session scope.
//!
//! The console talks to a single API origin, so domain and path attributes
//! are not tracked: every stored cookie is sent on every request.

use chrono::{DateTime, Utc};
use cookie::Cookie;
use reqwest::header::HeaderValue;

use super::SessionState;

/// [`reqwest::cookie::CookieStore`] that reads and writes the session's
/// cookie map, so cookies survive into the next process.
#[derive(Debug, Clone)]
pub struct SessionCookies {
    session: SessionState,
}

impl SessionCookies {
    #[must_use]
    pub const fn new(session: SessionState) -> Self {
        Self { session }
    }
}

impl reqwest::cookie::CookieStore for SessionCookies {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, _url: &url::Url) {
        let now = Utc::now();
        let updates: Vec<_> = cookie_headers
            .filter_map(|header| header.to_str().ok())
            .filter_map(|raw| parse_set_cookie(raw, now))
            .collect();

        if updates.is_empty() {
            return;
        }
        if let Err(e) = self.session.apply_cookies(updates) {
            tracing::warn!(error = %e, "Failed to persist cookies");
        }
    }

    fn cookies(&self, _url: &url::Url) -> Option<HeaderValue> {
        self.session
            .cookie_header()
            .and_then(|header| HeaderValue::from_str(&header).ok())
    }
}

/// Parse one `Set-Cookie` value into `(name, Some(value))` to store or
/// `(name, None)` to delete.
fn parse_set_cookie(raw: &str, now: DateTime<Utc>) -> Option<(String, Option<String>)> {
    let cookie = Cookie::parse(raw).ok()?;
    let value = cookie.value_trimmed();

    let expired = value.is_empty()
        || cookie.max_age().is_some_and(|age| age.whole_seconds() <= 0)
        || cookie
            .expires_datetime()
            .is_some_and(|at| at.unix_timestamp() <= now.timestamp());

    Some((cookie.name().to_string(), (!expired).then(|| value.to_string())))
}
