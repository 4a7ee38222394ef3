//! Live stream viewer: media subscription, chat and route.
//!
//! A [`StreamViewer`] owns one media session for one stream. It joins the
//! stream's channel with a subscriber token, subscribes to everyone already
//! publishing, then follows [`MediaEvent`]s. [`StreamViewer::close`] always
//! leaves the channel, whether or not the join succeeded.

mod chat;
mod media;
mod route;
mod token;

use std::collections::BTreeSet;
use std::time::Duration;

use meract_core::{MediaKind, StreamId};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

pub use chat::ChatPoller;
pub use media::{
    LogMedia, MediaCall, MediaError, MediaEvent, MediaSession, ParticipantId, RecordingMedia,
    RemoteParticipant,
};
pub use route::{RouteClient, RoutingError};
pub use token::{TOKEN_EXPIRY_SECS, ViewerToken, channel_name, fetch_viewer_token, jwt_uid, viewer_uid};

use crate::api::AdminApi;
use crate::error::GatewayError;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("media app id is not configured")]
    MissingAppId,

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Media(#[from] MediaError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerStatus {
    Idle,
    Connecting,
    Connected,
    Failed(String),
    Closed,
}

pub struct StreamViewer<M: MediaSession> {
    api: AdminApi,
    media: M,
    stream_id: StreamId,
    channel: String,
    viewer_uid: String,
    video: BTreeSet<ParticipantId>,
    status: ViewerStatus,
}

impl<M: MediaSession> std::fmt::Debug for StreamViewer<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamViewer")
            .field("channel", &self.channel)
            .field("viewer_uid", &self.viewer_uid)
            .field("video", &self.video)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl<M: MediaSession> StreamViewer<M> {
    #[must_use]
    pub fn new(api: AdminApi, media: M, stream_id: StreamId) -> Self {
        Self {
            api,
            media,
            stream_id,
            channel: channel_name(stream_id),
            viewer_uid: viewer_uid(),
            video: BTreeSet::new(),
            status: ViewerStatus::Idle,
        }
    }

    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    #[must_use]
    pub fn viewer_uid(&self) -> &str {
        &self.viewer_uid
    }

    #[must_use]
    pub const fn status(&self) -> &ViewerStatus {
        &self.status
    }

    /// Participants whose video is subscribed.
    #[must_use]
    pub const fn video_participants(&self) -> &BTreeSet<ParticipantId> {
        &self.video
    }

    #[must_use]
    pub const fn media(&self) -> &M {
        &self.media
    }

    /// Join the stream's channel and subscribe to present participants.
    ///
    /// # Errors
    ///
    /// Returns the token, join or subscribe error; the status records it.
    #[tracing::instrument(skip(self, app_id), fields(channel = %self.channel))]
    pub async fn connect(&mut self, app_id: Option<&SecretString>) -> Result<(), ViewerError> {
        self.status = ViewerStatus::Connecting;
        match self.join(app_id).await {
            Ok(()) => {
                self.status = ViewerStatus::Connected;
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "Error joining channel");
                self.status = ViewerStatus::Failed(err.to_string());
                Err(err)
            }
        }
    }

    async fn join(&mut self, app_id: Option<&SecretString>) -> Result<(), ViewerError> {
        let app_id = app_id.ok_or(ViewerError::MissingAppId)?;
        let token = fetch_viewer_token(&self.api, &self.channel, &self.viewer_uid).await?;
        self.media
            .join(
                app_id.expose_secret(),
                &self.channel,
                token.token.expose_secret(),
                token.media_uid,
            )
            .await?;

        for participant in self.media.remote_participants() {
            if participant.has_video {
                self.media.subscribe(participant.uid, MediaKind::Video).await?;
                self.video.insert(participant.uid);
            }
            if participant.has_audio {
                self.media.subscribe(participant.uid, MediaKind::Audio).await?;
            }
        }
        Ok(())
    }

    /// Follow a participant change.
    ///
    /// # Errors
    ///
    /// Returns the subscribe error for a publish event.
    pub async fn handle_event(&mut self, event: MediaEvent) -> Result<(), ViewerError> {
        match event {
            MediaEvent::Published(uid, kind) => {
                self.media.subscribe(uid, kind).await?;
                if kind == MediaKind::Video {
                    self.video.insert(uid);
                }
            }
            MediaEvent::Unpublished(uid, MediaKind::Video) | MediaEvent::Left(uid) => {
                self.video.remove(&uid);
            }
            MediaEvent::Unpublished(_, MediaKind::Audio) => {}
        }
        Ok(())
    }

    /// Start polling this stream's chat.
    #[must_use]
    pub fn chat(&self, period: Duration) -> ChatPoller {
        ChatPoller::spawn(self.api.clone(), self.stream_id, period)
    }

    /// Post to the stream chat as this viewer.
    ///
    /// # Errors
    ///
    /// Returns the gateway error when both chat routes fail.
    pub async fn send_chat(&self, text: &str) -> Result<bool, GatewayError> {
        self.api
            .send_chat_message(self.stream_id, text, &self.viewer_uid)
            .await
    }

    /// Leave the channel. Safe to call more than once.
    pub async fn close(&mut self) {
        if self.status == ViewerStatus::Closed {
            return;
        }
        if let Err(err) = self.media.leave().await {
            tracing::warn!(error = %err, "Failed to leave media channel");
        }
        self.video.clear();
        self.status = ViewerStatus::Closed;
    }
}
