//! Channel naming and subscriber tokens for the media service.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use meract_core::StreamId;
use rand::Rng;
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::Value;

use crate::api::AdminApi;
use crate::error::GatewayError;
use crate::gateway::RequestDescriptor;

/// Token lifetime requested from the backend, in seconds.
pub const TOKEN_EXPIRY_SECS: u32 = 3600;

/// Media channel of a stream.
#[must_use]
pub fn channel_name(stream_id: StreamId) -> String {
    format!("act_{stream_id}")
}

/// Fresh viewer identity: `viewer_<unix millis>_<0..9999>`.
#[must_use]
pub fn viewer_uid() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u16 = rand::rng().random_range(0..10_000);
    format!("viewer_{millis}_{suffix}")
}

/// Subscriber token and the numeric uid embedded in it.
pub struct ViewerToken {
    pub token: SecretString,
    pub media_uid: u64,
}

impl std::fmt::Debug for ViewerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewerToken")
            .field("token", &"[REDACTED]")
            .field("media_uid", &self.media_uid)
            .finish()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TokenBody {
    Wrapped { token: String },
    Bare(String),
}

/// Request a subscriber token for `channel` as `viewer_uid`.
///
/// # Errors
///
/// Returns a gateway error if the request fails or the body holds no token.
#[tracing::instrument(skip(api))]
pub async fn fetch_viewer_token(
    api: &AdminApi,
    channel: &str,
    viewer_uid: &str,
) -> Result<ViewerToken, GatewayError> {
    let response = api
        .gateway()
        .execute(
            RequestDescriptor::get(format!("/act/token/{channel}/SUBSCRIBER/uid"))
                .query("uid", viewer_uid)
                .query("expiry", TOKEN_EXPIRY_SECS),
        )
        .await?;

    let token = match serde_json::from_slice::<TokenBody>(&response.body) {
        Ok(TokenBody::Wrapped { token } | TokenBody::Bare(token)) => token,
        Err(_) => response.text().trim().to_string(),
    };
    if token.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "token response carried no token".to_string(),
        ));
    }

    let media_uid = jwt_uid(&token);
    tracing::debug!(media_uid, "Fetched viewer token");
    Ok(ViewerToken {
        token: SecretString::from(token),
        media_uid,
    })
}

/// The `uid` claim of a JWT payload, or 0 when absent or unreadable.
#[must_use]
pub fn jwt_uid(token: &str) -> u64 {
    let Some(payload) = token.split('.').nth(1) else {
        return 0;
    };
    let Ok(bytes) = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')) else {
        return 0;
    };
    let Ok(claims) = serde_json::from_slice::<Value>(&bytes) else {
        return 0;
    };
    match claims.get("uid") {
        Some(Value::Number(n)) => n.as_u64().unwrap_or_default(),
        Some(Value::String(s)) => s.parse().unwrap_or_default(),
        _ => 0,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mockito::{Matcher, Server};
    use secrecy::ExposeSecret;

    use super::*;
    use crate::gateway::GatewayClient;
    use crate::session::SessionState;

    fn jwt(claims: &str) -> String {
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256"}"#),
            URL_SAFE_NO_PAD.encode(claims)
        )
    }

    #[test]
    fn test_channel_and_uid_format() {
        assert_eq!(channel_name(StreamId::new(12)), "act_12");

        let uid = viewer_uid();
        let parts: Vec<&str> = uid.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "viewer");
        assert!(parts[1].parse::<i64>().is_ok());
        assert!(parts[2].parse::<u16>().unwrap() < 10_000);
    }

    #[test]
    fn test_jwt_uid() {
        assert_eq!(jwt_uid(&jwt(r#"{"uid":4711}"#)), 4711);
        assert_eq!(jwt_uid(&jwt(r#"{"uid":"42"}"#)), 42);
        assert_eq!(jwt_uid(&jwt(r#"{"sub":"x"}"#)), 0);
        assert_eq!(jwt_uid("not-a-jwt"), 0);
        assert_eq!(jwt_uid("a.!!!.c"), 0);
    }

    #[tokio::test]
    async fn test_fetch_wrapped_and_bare_tokens() {
        let token = jwt(r#"{"uid":7}"#);
        let mut server = Server::new_async().await;
        server
            .mock(
                "GET",
                Matcher::Regex(r"^/act/token/act_3/SUBSCRIBER/uid(\?.*)?$".to_string()),
            )
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("uid".into(), "viewer_1_2".into()),
                Matcher::UrlEncoded("expiry".into(), "3600".into()),
            ]))
            .with_body(serde_json::json!({ "token": token }).to_string())
            .create_async()
            .await;
        server
            .mock(
                "GET",
                Matcher::Regex(r"^/act/token/act_4/SUBSCRIBER/uid(\?.*)?$".to_string()),
            )
            .with_body(serde_json::json!(token).to_string())
            .create_async()
            .await;

        let api = AdminApi::new(
            GatewayClient::builder(server.url(), SessionState::in_memory())
                .build()
                .unwrap(),
        );

        let wrapped = fetch_viewer_token(&api, "act_3", "viewer_1_2").await.unwrap();
        assert_eq!(wrapped.token.expose_secret(), token);
        assert_eq!(wrapped.media_uid, 7);

        let bare = fetch_viewer_token(&api, "act_4", "viewer_1_2").await.unwrap();
        assert_eq!(bare.media_uid, 7);
    }
}
