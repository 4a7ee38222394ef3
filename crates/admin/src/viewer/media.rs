//! Real-time media session seam.
//!
//! The console only subscribes; it never publishes. Implementations wrap a
//! media SDK. [`LogMedia`] stands in where no SDK is linked, and
//! [`RecordingMedia`] scripts participants for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use meract_core::MediaKind;
use thiserror::Error;

/// Numeric participant id on the media service.
pub type ParticipantId = u64;

#[derive(Debug, Error)]
#[error("media session error: {0}")]
pub struct MediaError(pub String);

/// A participant already in the channel when the viewer joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteParticipant {
    pub uid: ParticipantId,
    pub has_audio: bool,
    pub has_video: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaEvent {
    Published(ParticipantId, MediaKind),
    Unpublished(ParticipantId, MediaKind),
    Left(ParticipantId),
}

#[async_trait]
pub trait MediaSession: Send + Sync {
    async fn join(
        &self,
        app_id: &str,
        channel: &str,
        token: &str,
        uid: ParticipantId,
    ) -> Result<(), MediaError>;

    async fn leave(&self) -> Result<(), MediaError>;

    async fn subscribe(&self, participant: ParticipantId, kind: MediaKind) -> Result<(), MediaError>;

    /// Participants currently in the channel.
    fn remote_participants(&self) -> Vec<RemoteParticipant>;
}

/// Logs every call and reports an empty channel.
#[derive(Debug, Default)]
pub struct LogMedia;

#[async_trait]
impl MediaSession for LogMedia {
    async fn join(
        &self,
        _app_id: &str,
        channel: &str,
        _token: &str,
        uid: ParticipantId,
    ) -> Result<(), MediaError> {
        tracing::info!(channel, uid, "Joined media channel");
        Ok(())
    }

    async fn leave(&self) -> Result<(), MediaError> {
        tracing::info!("Left media channel");
        Ok(())
    }

    async fn subscribe(&self, participant: ParticipantId, kind: MediaKind) -> Result<(), MediaError> {
        tracing::info!(participant, %kind, "Subscribed");
        Ok(())
    }

    fn remote_participants(&self) -> Vec<RemoteParticipant> {
        Vec::new()
    }
}

/// Call recorded by [`RecordingMedia`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaCall {
    Join { channel: String, uid: ParticipantId },
    Leave,
    Subscribe(ParticipantId, MediaKind),
}

/// Records calls and serves a fixed participant snapshot.
#[derive(Debug, Default)]
pub struct RecordingMedia {
    present: Vec<RemoteParticipant>,
    fail_join: bool,
    calls: Mutex<Vec<MediaCall>>,
}

impl RecordingMedia {
    #[must_use]
    pub fn with_participants(present: Vec<RemoteParticipant>) -> Self {
        Self {
            present,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failing_join() -> Self {
        Self {
            fail_join: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn calls(&self) -> Vec<MediaCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: MediaCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

#[async_trait]
impl MediaSession for RecordingMedia {
    async fn join(
        &self,
        _app_id: &str,
        channel: &str,
        _token: &str,
        uid: ParticipantId,
    ) -> Result<(), MediaError> {
        self.record(MediaCall::Join {
            channel: channel.to_string(),
            uid,
        });
        if self.fail_join {
            return Err(MediaError("invalid token".to_string()));
        }
        Ok(())
    }

    async fn leave(&self) -> Result<(), MediaError> {
        self.record(MediaCall::Leave);
        Ok(())
    }

    async fn subscribe(&self, participant: ParticipantId, kind: MediaKind) -> Result<(), MediaError> {
        self.record(MediaCall::Subscribe(participant, kind));
        Ok(())
    }

    fn remote_participants(&self) -> Vec<RemoteParticipant> {
        self.present.clone()
    }
}
