//! Background chat polling.

use std::time::Duration;

use meract_core::StreamId;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::api::{AdminApi, ChatMessage};

/// Polls a stream's chat immediately and then every `period`.
///
/// Fetch errors are ignored and the last good messages kept. Dropping the
/// poller stops the schedule; a fetch already in flight is not cancelled.
#[derive(Debug)]
pub struct ChatPoller {
    handle: JoinHandle<()>,
    messages: watch::Receiver<Vec<ChatMessage>>,
}

impl ChatPoller {
    /// Start polling. Must be called inside a tokio runtime.
    #[must_use]
    pub fn spawn(api: AdminApi, stream_id: StreamId, period: Duration) -> Self {
        let (tx, messages) = watch::channel(Vec::new());
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match api.chat_messages(stream_id).await {
                    Ok(latest) => {
                        if tx.send(latest).is_err() {
                            break;
                        }
                    }
                    Err(err) => tracing::debug!(error = %err, "Chat poll failed"),
                }
            }
        });
        Self { handle, messages }
    }

    /// Latest messages.
    #[must_use]
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages.borrow().clone()
    }

    /// Receiver that wakes on every successful poll.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<ChatMessage>> {
        self.messages.clone()
    }
}

impl Drop for ChatPoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mockito::Server;

    use super::*;
    use crate::gateway::GatewayClient;
    use crate::session::SessionState;

    #[tokio::test]
    async fn test_first_poll_is_immediate() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/act/9/messages")
            .with_body(r#"[{"userName":"kate","message":"hi"}]"#)
            .create_async()
            .await;

        let api = AdminApi::new(
            GatewayClient::builder(server.url(), SessionState::in_memory())
                .build()
                .unwrap(),
        );
        let poller = ChatPoller::spawn(api, StreamId::new(9), Duration::from_secs(3600));
        let mut rx = poller.subscribe();

        tokio::time::timeout(Duration::from_secs(5), rx.changed())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(poller.messages()[0].body(), "hi");
    }

    #[tokio::test]
    async fn test_drop_stops_polling() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/act/9/messages")
            .with_body("[]")
            .create_async()
            .await;

        let api = AdminApi::new(
            GatewayClient::builder(server.url(), SessionState::in_memory())
                .build()
                .unwrap(),
        );
        let poller = ChatPoller::spawn(api, StreamId::new(9), Duration::from_millis(10));
        let mut rx = poller.subscribe();
        drop(poller);

        // The sender lives in the aborted task, so the channel closes.
        tokio::time::timeout(Duration::from_secs(5), async {
            while rx.changed().await.is_ok() {}
        })
        .await
        .unwrap();
    }
}
