//! Stream moderation list.

use meract_core::StreamId;

use super::{ListState, ViewContext};
use crate::api::{StreamFilter, StreamRow, StreamStatistics};
use crate::error::GatewayError;

#[derive(Debug)]
pub struct StreamsView {
    ctx: ViewContext,
    rows: ListState<StreamRow>,
    stats: StreamStatistics,
    filter: StreamFilter,
}

impl StreamsView {
    #[must_use]
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            rows: ListState::default(),
            stats: StreamStatistics::default(),
            filter: StreamFilter::default(),
        }
    }

    /// Fetch the stream list and its counters.
    ///
    /// # Errors
    ///
    /// Returns the first error; whatever loaded is kept.
    pub async fn load(&mut self) -> Result<(), GatewayError> {
        let api = self.ctx.api();
        let (rows, stats) = tokio::join!(api.stream_rows(), api.stream_statistics());
        let rows = self.rows.apply(rows, "Failed to load streams");
        let stats = stats.map(|stats| self.stats = stats);
        rows.and(stats)
    }

    #[must_use]
    pub const fn rows(&self) -> &ListState<StreamRow> {
        &self.rows
    }

    #[must_use]
    pub const fn stats(&self) -> &StreamStatistics {
        &self.stats
    }

    pub fn set_filter(&mut self, filter: StreamFilter) {
        self.filter = filter;
    }

    #[must_use]
    pub fn visible(&self) -> Vec<&StreamRow> {
        self.rows
            .items()
            .iter()
            .filter(|row| self.filter.matches(row))
            .collect()
    }

    /// Stop a stream, then refetch streams and counters.
    ///
    /// # Errors
    ///
    /// Returns the backend's error; nothing is refetched then.
    pub async fn terminate(&mut self, id: StreamId) -> Result<(), GatewayError> {
        let result = self.ctx.api().terminate_stream(id).await;
        self.ctx
            .report(result, "Stream terminated", "Failed to terminate stream")?;
        self.refetch().await;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns the backend's error, or `InvalidRequest` for a zero count.
    pub async fn add_likes(&mut self, id: StreamId, count: u32) -> Result<(), GatewayError> {
        let result = self.ctx.api().add_likes(id, count).await;
        self.ctx
            .report(result, &format!("Added {count} likes"), "Failed to add likes")?;
        self.refetch().await;
        Ok(())
    }

    async fn refetch(&mut self) {
        if let Err(err) = self.load().await {
            tracing::warn!(error = %err, "Failed to refresh streams");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use mockito::{Matcher, Server};

    use super::*;
    use crate::api::AdminApi;
    use crate::gateway::GatewayClient;
    use crate::notify::RecordingNotifier;
    use crate::session::SessionState;

    #[tokio::test]
    async fn test_terminate_refetches_list_and_stats() {
        let mut server = Server::new_async().await;
        let list = server
            .mock("GET", "/admin/streams/active")
            .with_body(r#"[{"id":7,"status":"ONLINE"}]"#)
            .expect(2)
            .create_async()
            .await;
        let stats = server
            .mock("GET", "/act/statistic")
            .with_body(r#"{"activeStreams":1,"allSpectators":"Not done","adminBlocked":0}"#)
            .expect(2)
            .create_async()
            .await;
        let stop = server
            .mock("POST", Matcher::Regex(r"^/act/stop-act(\?.*)?$".to_string()))
            .match_query(Matcher::UrlEncoded("id".into(), "7".into()))
            .with_status(201)
            .create_async()
            .await;

        let notifier = Arc::new(RecordingNotifier::default());
        let api = AdminApi::new(
            GatewayClient::builder(server.url(), SessionState::in_memory())
                .build()
                .unwrap(),
        );
        let mut view = StreamsView::new(ViewContext::new(api, notifier.clone()));
        view.load().await.unwrap();
        assert_eq!(view.stats().all_spectators.to_string(), "-");

        view.terminate(StreamId::new(7)).await.unwrap();

        stop.assert_async().await;
        list.assert_async().await;
        stats.assert_async().await;
        assert_eq!(notifier.notices()[0].message, "Stream terminated");
    }
}
