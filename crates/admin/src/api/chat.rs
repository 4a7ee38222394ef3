//! Stream chat.
//!
//! The backend has served chat from two route families over time, so both
//! reads and writes try the `/act` route first and fall back to `/chat`.
//! A lost session is never retried on the fallback route.

use meract_core::StreamId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use super::AdminApi;
use crate::error::{ErrorClass, GatewayError};
use crate::gateway::RequestDescriptor;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    #[serde(default)]
    pub user_name: Option<String>,
    /// Numeric or string depending on who sent the message.
    #[serde(default)]
    pub user_id: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl ChatMessage {
    /// Sender name, else sender id.
    #[must_use]
    pub fn author(&self) -> String {
        if let Some(name) = self.user_name.as_deref().filter(|s| !s.is_empty()) {
            return name.to_string();
        }
        match &self.user_id {
            Some(Value::String(id)) => id.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }

    #[must_use]
    pub fn body(&self) -> &str {
        self.message
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.text.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Serialize)]
struct ActMessage<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatSend<'a> {
    act_id: StreamId,
    message: &'a str,
    user_id: &'a str,
}

fn should_fall_back(err: &GatewayError) -> bool {
    err.class() != ErrorClass::SessionLost
}

impl AdminApi {
    /// Fetch the chat of a stream.
    ///
    /// # Errors
    ///
    /// Returns the fallback route's error when both routes fail.
    #[instrument(skip(self), fields(stream_id = %id))]
    pub async fn chat_messages(&self, id: StreamId) -> Result<Vec<ChatMessage>, GatewayError> {
        match self
            .gateway
            .fetch_json(RequestDescriptor::get(format!("/act/{id}/messages")))
            .await
        {
            Ok(messages) => Ok(messages),
            Err(err) if should_fall_back(&err) => {
                tracing::debug!(error = %err, "Chat read failed, trying fallback route");
                self.gateway
                    .fetch_json(RequestDescriptor::get(format!("/chat/{id}/messages")))
                    .await
            }
            Err(err) => Err(err),
        }
    }

    /// Post a chat message as `viewer_uid`.
    ///
    /// Returns `false` without calling the backend when the text is blank.
    ///
    /// # Errors
    ///
    /// Returns the fallback route's error when both routes fail.
    #[instrument(skip(self, text), fields(stream_id = %id))]
    pub async fn send_chat_message(
        &self,
        id: StreamId,
        text: &str,
        viewer_uid: &str,
    ) -> Result<bool, GatewayError> {
        if text.trim().is_empty() {
            return Ok(false);
        }

        let primary = RequestDescriptor::post(format!("/act/{id}/message")).json(&ActMessage { text })?;
        match self.gateway.execute_unit(primary).await {
            Ok(()) => Ok(true),
            Err(err) if should_fall_back(&err) => {
                tracing::debug!(error = %err, "Chat send failed, trying fallback route");
                let fallback = RequestDescriptor::post("/chat/send").json(&ChatSend {
                    act_id: id,
                    message: text,
                    user_id: viewer_uid,
                })?;
                self.gateway.execute_unit(fallback).await.map(|()| true)
            }
            Err(err) => Err(err),
        }
    }
}
