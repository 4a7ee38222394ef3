//! Stream moderation and viewing commands.

use std::time::Duration;

use clap::Subcommand;
use meract_admin::api::{ChatMessage, StreamFilter, StreamRow};
use meract_admin::viewer::{LogMedia, RouteClient, StreamViewer};
use meract_admin::views::StreamsView;
use meract_core::{StreamId, StreamStatus};

use super::{CliError, Console, opt};
use crate::output;

#[derive(Subcommand)]
pub enum StreamsAction {
    /// List active streams
    List {
        /// `live` or `offline`
        #[arg(long, value_parser = parse_status)]
        status: Option<StreamStatus>,

        #[arg(long)]
        category: Option<String>,
    },
    /// Stream counters
    Stats,
    /// Stream detail with media files
    Show { stream_id: StreamId },
    /// Stop a stream
    Terminate { stream_id: StreamId },
    /// Add likes to a stream
    AddLikes { stream_id: StreamId, count: u32 },
    /// Print a stream's chat
    Chat {
        stream_id: StreamId,

        /// Keep polling until interrupted
        #[arg(short, long)]
        follow: bool,
    },
    /// Post to a stream's chat
    Say { stream_id: StreamId, text: String },
    /// Walking route from the stream's start to its destination
    Route { stream_id: StreamId },
    /// Join a stream as a viewer and follow its chat
    Watch {
        stream_id: StreamId,

        /// Leave after this many seconds instead of waiting for Ctrl-C
        #[arg(long)]
        seconds: Option<u64>,
    },
}

fn parse_status(s: &str) -> Result<StreamStatus, String> {
    match s {
        "live" => Ok(StreamStatus::Online),
        "offline" => Ok(StreamStatus::Offline),
        _ => Err(format!("unknown status: {s}")),
    }
}

pub async fn run(console: &Console, action: StreamsAction) -> Result<(), CliError> {
    let mut view = StreamsView::new(console.ctx());
    match action {
        StreamsAction::List { status, category } => {
            view.load().await?;
            view.set_filter(StreamFilter { status, category });
            print_rows(console, &view.visible())
        }
        StreamsAction::Stats => {
            let stats = console.api().stream_statistics().await?;
            console.print(&stats, || {
                output::line(&format!(
                    "Active streams: {}  Spectators: {}  Blocked by admins: {}",
                    stats.active_streams, stats.all_spectators, stats.admin_blocked
                ))
            })
        }
        StreamsAction::Show { stream_id } => {
            let detail = console.api().stream_detail(stream_id).await?;
            let media = detail.media_urls(console.client().base_url());
            console.print(&detail, || {
                output::line(&format!(
                    "{} [{}] {}",
                    opt(detail.name.as_deref()),
                    detail.status.unwrap_or_default(),
                    detail
                        .category
                        .as_ref()
                        .map_or_else(|| "-".to_string(), ToString::to_string)
                ))?;
                for (label, url) in &media {
                    output::line(&format!("  {label}: {url}"))?;
                }
                Ok(())
            })
        }
        StreamsAction::Terminate { stream_id } => {
            view.terminate(stream_id).await?;
            print_rows(console, &view.visible())
        }
        StreamsAction::AddLikes { stream_id, count } => {
            view.add_likes(stream_id, count).await?;
            console.print_line(&format!("Added {count} likes to stream {stream_id}"))
        }
        StreamsAction::Chat { stream_id, follow } => chat(console, stream_id, follow).await,
        StreamsAction::Say { stream_id, text } => {
            let viewer = StreamViewer::new(console.api().clone(), LogMedia, stream_id);
            if viewer.send_chat(&text).await? {
                console.print_line("Sent")
            } else {
                Err(CliError::Invalid("message is blank".to_string()))
            }
        }
        StreamsAction::Route { stream_id } => route(console, stream_id).await,
        StreamsAction::Watch { stream_id, seconds } => watch(console, stream_id, seconds).await,
    }
}

fn print_rows(console: &Console, rows: &[&StreamRow]) -> Result<(), CliError> {
    console.print(rows, || {
        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|row| {
                vec![
                    row.id.to_string(),
                    row.title.clone(),
                    row.streamer.clone(),
                    row.status.to_string(),
                    row.viewers.to_string(),
                    row.likes.to_string(),
                    row.duration.clone(),
                    row.category.clone(),
                ]
            })
            .collect();
        output::table(
            &["ID", "TITLE", "STREAMER", "STATUS", "VIEWERS", "LIKES", "DURATION", "CATEGORY"],
            &cells,
        )
    })
}

fn print_messages(messages: &[ChatMessage]) -> std::io::Result<()> {
    for message in messages {
        output::line(&format!("{}: {}", message.author(), message.body()))?;
    }
    Ok(())
}

async fn chat(console: &Console, stream_id: StreamId, follow: bool) -> Result<(), CliError> {
    if !follow {
        let messages = console.api().chat_messages(stream_id).await?;
        return console.print(&messages, || print_messages(&messages));
    }

    let viewer = StreamViewer::new(console.api().clone(), LogMedia, stream_id);
    let poller = viewer.chat(console.config().chat_poll_interval);
    follow_chat(poller, None).await
}

/// Print every chat update until Ctrl-C or `limit` elapses.
async fn follow_chat(
    poller: meract_admin::viewer::ChatPoller,
    limit: Option<Duration>,
) -> Result<(), CliError> {
    let mut updates = poller.subscribe();
    let mut printed = 0;
    let deadline = async {
        match limit {
            Some(limit) => tokio::time::sleep(limit).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let messages = updates.borrow_and_update().clone();
                // The backend returns the whole history on every poll.
                print_messages(messages.get(printed..).unwrap_or(&messages))?;
                printed = messages.len();
            }
            _ = tokio::signal::ctrl_c() => break,
            () = &mut deadline => break,
        }
    }
    Ok(())
}

async fn route(console: &Console, stream_id: StreamId) -> Result<(), CliError> {
    let rows = console.api().stream_rows().await?;
    let row = rows
        .iter()
        .find(|row| row.id == stream_id)
        .ok_or_else(|| CliError::Invalid(format!("stream {stream_id} is not active")))?;

    let client = RouteClient::new(console.config().routing_url.clone(), console.config().http_timeout)?;
    let points = client
        .route_between(row.start, row.destination)
        .await
        .unwrap_or_default();
    console.print(&points, || {
        if points.is_empty() {
            return output::line("No route");
        }
        for point in &points {
            output::line(&format!("{:.6},{:.6}", point.latitude, point.longitude))?;
        }
        Ok(())
    })
}

async fn watch(console: &Console, stream_id: StreamId, seconds: Option<u64>) -> Result<(), CliError> {
    let mut viewer = StreamViewer::new(console.api().clone(), LogMedia, stream_id);
    let connected = viewer.connect(console.config().agora_app_id.as_ref()).await;
    if let Err(err) = connected {
        viewer.close().await;
        return Err(err.into());
    }
    console.print_line(&format!(
        "Watching {} as {} (Ctrl-C to leave)",
        viewer.channel(),
        viewer.viewer_uid()
    ))?;

    let poller = viewer.chat(console.config().chat_poll_interval);
    let result = follow_chat(poller, seconds.map(Duration::from_secs)).await;
    viewer.close().await;
    result
}
