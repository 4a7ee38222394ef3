//! Live streams ("acts" on the backend): listing, statistics, moderation.

use chrono::{DateTime, Utc};
use meract_core::{GeoPoint, StreamId, StreamStatus, UserId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{AdminApi, Stat};
use crate::error::GatewayError;
use crate::gateway::RequestDescriptor;

/// Owner of a stream, as embedded in the listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamUser {
    #[serde(default)]
    pub id: Option<UserId>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub login: Option<String>,
}

/// A stream from `/admin/streams/active`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveStream {
    pub id: StreamId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub streamer_name: Option<String>,
    #[serde(default)]
    pub user: Option<StreamUser>,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub connected_users: Option<i64>,
    #[serde(default)]
    pub duration: Option<Stat>,
    #[serde(default)]
    pub status: Option<StreamStatus>,
    #[serde(default)]
    pub category_id: Option<Stat>,
    #[serde(default)]
    pub preview_file_name: Option<String>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub likes: Option<i64>,
    #[serde(default)]
    pub start_latitude: Option<f64>,
    #[serde(default)]
    pub start_longitude: Option<f64>,
    #[serde(default)]
    pub destination_latitude: Option<f64>,
    #[serde(default)]
    pub destination_longitude: Option<f64>,
}

/// A stream as the moderation list shows it.
#[derive(Debug, Clone, Serialize)]
pub struct StreamRow {
    pub id: StreamId,
    pub title: String,
    pub streamer: String,
    pub viewers: i64,
    pub duration: String,
    pub status: StreamStatus,
    pub category: String,
    pub thumbnail: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub likes: i64,
    pub user_id: Option<UserId>,
    pub start: Option<GeoPoint>,
    pub destination: Option<GeoPoint>,
}

impl ActiveStream {
    /// Streamer name, else the owner's email, else `Unknown`.
    #[must_use]
    pub fn streamer(&self) -> &str {
        self.streamer_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.user.as_ref().and_then(|u| u.email.as_deref()))
            .unwrap_or("Unknown")
    }
}

impl From<ActiveStream> for StreamRow {
    fn from(stream: ActiveStream) -> Self {
        let streamer = stream.streamer().to_string();
        Self {
            id: stream.id,
            title: stream.title.unwrap_or_default(),
            streamer,
            viewers: stream.connected_users.unwrap_or_default(),
            duration: stream
                .duration
                .map_or_else(|| "-".to_string(), |d| d.to_string()),
            status: stream.status.unwrap_or_default(),
            category: stream
                .category_id
                .map_or_else(|| "-".to_string(), |c| c.to_string()),
            thumbnail: stream.preview_file_name,
            started_at: stream.started_at,
            likes: stream.likes.unwrap_or_default(),
            user_id: stream.user_id.or_else(|| stream.user.and_then(|u| u.id)),
            start: GeoPoint::from_parts(stream.start_latitude, stream.start_longitude),
            destination: GeoPoint::from_parts(
                stream.destination_latitude,
                stream.destination_longitude,
            ),
        }
    }
}

/// Counters above the stream list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamStatistics {
    #[serde(default)]
    pub active_streams: Stat,
    #[serde(default)]
    pub all_spectators: Stat,
    #[serde(default)]
    pub admin_blocked: Stat,
}

/// Stream detail with its media files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamDetail {
    pub id: StreamId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<Stat>,
    #[serde(default)]
    pub status: Option<StreamStatus>,
    #[serde(default)]
    pub duration: Option<Stat>,
    #[serde(default)]
    pub intro_url: Option<String>,
    #[serde(default)]
    pub outro_url: Option<String>,
    #[serde(default)]
    pub music_url: Option<String>,
}

impl StreamDetail {
    /// Intro, music and outro files as public URLs, skipping missing ones.
    #[must_use]
    pub fn media_urls(&self, base_url: &str) -> Vec<(&'static str, String)> {
        [
            ("intro", &self.intro_url),
            ("music", &self.music_url),
            ("outro", &self.outro_url),
        ]
        .into_iter()
        .filter_map(|(label, file)| {
            let url = super::image_url(base_url, "stream", file.as_deref()?);
            (!url.is_empty()).then_some((label, url))
        })
        .collect()
    }
}

/// Status and category filter; `None` matches everything.
#[derive(Debug, Clone, Default)]
pub struct StreamFilter {
    pub status: Option<StreamStatus>,
    pub category: Option<String>,
}

impl StreamFilter {
    #[must_use]
    pub fn matches(&self, row: &StreamRow) -> bool {
        self.status.is_none_or(|status| row.status == status)
            && self
                .category
                .as_deref()
                .is_none_or(|category| row.category == category)
    }
}

#[derive(Serialize)]
struct AddLikes {
    count: u32,
}

impl AdminApi {
    /// # Errors
    ///
    /// Returns a gateway error if the request fails.
    #[instrument(skip(self))]
    pub async fn active_streams(&self) -> Result<Vec<ActiveStream>, GatewayError> {
        self.gateway
            .fetch_json(RequestDescriptor::get("/admin/streams/active"))
            .await
    }

    /// # Errors
    ///
    /// Returns a gateway error if the request fails.
    pub async fn stream_rows(&self) -> Result<Vec<StreamRow>, GatewayError> {
        Ok(self
            .active_streams()
            .await?
            .into_iter()
            .map(StreamRow::from)
            .collect())
    }

    /// # Errors
    ///
    /// Returns a gateway error if the request fails.
    #[instrument(skip(self))]
    pub async fn stream_statistics(&self) -> Result<StreamStatistics, GatewayError> {
        self.gateway
            .fetch_json(RequestDescriptor::get("/act/statistic"))
            .await
    }

    /// Stop a stream.
    ///
    /// # Errors
    ///
    /// Returns a gateway error if the request fails.
    #[instrument(skip(self), fields(stream_id = %id))]
    pub async fn terminate_stream(&self, id: StreamId) -> Result<(), GatewayError> {
        self.gateway
            .execute_unit(RequestDescriptor::post("/act/stop-act").query("id", id))
            .await
    }

    /// Add likes to a stream.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::InvalidRequest` for a zero count without
    /// calling the backend, else a gateway error if the request fails.
    #[instrument(skip(self), fields(stream_id = %id))]
    pub async fn add_likes(&self, id: StreamId, count: u32) -> Result<(), GatewayError> {
        if count == 0 {
            return Err(GatewayError::InvalidRequest(
                "like count must be greater than zero".to_string(),
            ));
        }
        let descriptor =
            RequestDescriptor::post(format!("/admin/streams/{id}/add-likes")).json(&AddLikes { count })?;
        self.gateway.execute_unit(descriptor).await
    }

    /// # Errors
    ///
    /// Returns a gateway error if the request fails.
    #[instrument(skip(self), fields(stream_id = %id))]
    pub async fn stream_detail(&self, id: StreamId) -> Result<StreamDetail, GatewayError> {
        self.gateway
            .fetch_json(RequestDescriptor::get(format!("/act/get-act/{id}")))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mockito::{Matcher, Server};

    use super::*;
    use crate::gateway::GatewayClient;
    use crate::session::SessionState;

    #[test]
    fn test_row_mapping() {
        let stream: ActiveStream = serde_json::from_str(
            r#"{
                "id": 11,
                "title": "Morning walk",
                "user": {"id": 4, "email": "walker@meract.app"},
                "connectedUsers": 17,
                "status": "ONLINE",
                "categoryId": 3,
                "startedAt": "2026-03-01T08:00:00Z",
                "startLatitude": 50.45,
                "startLongitude": 30.52,
                "destinationLatitude": 50.40,
                "destinationLongitude": null
            }"#,
        )
        .unwrap();

        let row = StreamRow::from(stream);
        assert_eq!(row.streamer, "walker@meract.app");
        assert_eq!(row.viewers, 17);
        assert_eq!(row.status.label(), "live");
        assert_eq!(row.category, "3");
        assert_eq!(row.duration, "-");
        assert_eq!(row.user_id, Some(UserId::new(4)));
        assert!(row.start.is_some());
        assert!(row.destination.is_none());
        assert!(row.started_at.is_some());
    }

    #[test]
    fn test_streamer_fallbacks() {
        let named: ActiveStream =
            serde_json::from_str(r#"{"id":1,"streamerName":"Kate","user":{"email":"k@m.app"}}"#).unwrap();
        assert_eq!(named.streamer(), "Kate");

        let anonymous: ActiveStream = serde_json::from_str(r#"{"id":2}"#).unwrap();
        assert_eq!(anonymous.streamer(), "Unknown");
        assert_eq!(StreamRow::from(anonymous).status, StreamStatus::Offline);
    }

    #[test]
    fn test_filter() {
        let row = StreamRow::from(
            serde_json::from_str::<ActiveStream>(r#"{"id":1,"status":"ONLINE","categoryId":"music"}"#)
                .unwrap(),
        );
        assert!(StreamFilter::default().matches(&row));
        assert!(StreamFilter {
            status: Some(StreamStatus::Online),
            category: Some("music".to_string()),
        }
        .matches(&row));
        assert!(!StreamFilter {
            status: Some(StreamStatus::Offline),
            category: None,
        }
        .matches(&row));
    }

    #[test]
    fn test_detail_media_urls() {
        let detail: StreamDetail =
            serde_json::from_str(r#"{"id":3,"introUrl":"intro.mp4","musicUrl":"","outroUrl":null}"#).unwrap();
        assert_eq!(
            detail.media_urls("https://api.meract.app"),
            [("intro", "https://api.meract.app/image/photo/stream/intro.mp4".to_string())]
        );
    }

    #[tokio::test]
    async fn test_add_likes_rejects_zero_locally() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let api = AdminApi::new(
            GatewayClient::builder(server.url(), SessionState::in_memory())
                .build()
                .unwrap(),
        );
        let err = api.add_likes(StreamId::new(1), 0).await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidRequest(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_add_likes_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/admin/streams/9/add-likes")
            .match_body(Matcher::Json(serde_json::json!({"count": 100})))
            .with_status(201)
            .create_async()
            .await;

        let api = AdminApi::new(
            GatewayClient::builder(server.url(), SessionState::in_memory())
                .build()
                .unwrap(),
        );
        api.add_likes(StreamId::new(9), 100).await.unwrap();
        mock.assert_async().await;
    }
}
