//! Async operations for the TUI
//!
//! Uses channels to communicate between the sync TUI loop and async tasks.
//! Each command is served by its own task, so a long metrics scan never
//! delays a timeline fetch. Results are tagged with the view they belong to
//! and applied by the loop; tasks never touch view state directly.

use std::sync::Arc;

use chrono::Local;
use tokio::sync::mpsc;

use crate::api::MastodonClient;
use crate::api::mastodon::PAGE_LIMIT;
use crate::app::state::TimelineMode;
use crate::metrics::{DailyMetric, fetch_daily_metrics};
use crate::models::{Account, GroupedNotification, Post};

/// Progress channel capacity. Ticks are liveness signals; when the loop
/// falls behind, dropping some is fine.
pub const PROGRESS_CAPACITY: usize = 4;

/// Identifies which view a result or error belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedId {
    /// One of the timeline feeds
    Timeline(TimelineMode),
    /// The profile view
    Profile,
    /// The notifications view
    Notifications,
    /// The metrics view
    Metrics,
}

/// Commands sent from the TUI to the async worker
#[derive(Debug, Clone)]
pub enum AsyncCommand {
    /// Fetch a timeline page; `since_id` requests only items newer than it
    FetchTimeline {
        mode: TimelineMode,
        since_id: Option<String>,
    },
    /// Fetch the logged-in account and its recent posts
    FetchProfile,
    /// Fetch the newest grouped notifications
    FetchNotifications,
    /// Run a metrics scan, streaming scanned-record counts into `progress`.
    /// The sender is dropped when the scan ends, which is the completion
    /// signal; the series or error arrives separately as a result.
    FetchMetrics {
        range_days: u32,
        progress: mpsc::Sender<usize>,
    },
    /// Shutdown the worker
    Shutdown,
}

/// Results sent back from the async worker to the TUI
#[derive(Debug)]
pub enum AsyncResult {
    /// Timeline page, echoing the cursor the request was made with
    Timeline {
        mode: TimelineMode,
        posts: Vec<Post>,
        since_id: Option<String>,
    },
    /// Logged-in account and its posts
    Profile { account: Account, posts: Vec<Post> },
    /// Newest grouped notifications
    Notifications { groups: Vec<GroupedNotification> },
    /// Completed metrics series
    Metrics { series: Vec<DailyMetric> },
    /// A fetch failed; scoped to one view
    Failed { feed: FeedId, message: String },
}

/// Channel handles for communicating with the async worker
pub struct AsyncHandle {
    /// Send commands to the worker
    pub cmd_tx: mpsc::Sender<AsyncCommand>,
    /// Receive results from the worker
    pub result_rx: mpsc::Receiver<AsyncResult>,
}

/// Spawn the async worker and return handles
pub fn spawn_worker(client: Arc<MastodonClient>) -> AsyncHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<AsyncCommand>(32);
    let (result_tx, result_rx) = mpsc::channel::<AsyncResult>(32);

    tokio::spawn(async move {
        while let Some(cmd) = cmd_rx.recv().await {
            if matches!(cmd, AsyncCommand::Shutdown) {
                break;
            }
            let client = client.clone();
            let result_tx = result_tx.clone();
            tokio::spawn(async move {
                handle_command(&client, &result_tx, cmd).await;
            });
        }
    });

    AsyncHandle { cmd_tx, result_rx }
}

async fn handle_command(
    client: &MastodonClient,
    result_tx: &mpsc::Sender<AsyncResult>,
    cmd: AsyncCommand,
) {
    match cmd {
        AsyncCommand::Shutdown => {}
        AsyncCommand::FetchTimeline { mode, since_id } => {
            handle_timeline(client, result_tx, mode, since_id).await;
        }
        AsyncCommand::FetchProfile => {
            handle_profile(client, result_tx).await;
        }
        AsyncCommand::FetchNotifications => {
            handle_notifications(client, result_tx).await;
        }
        AsyncCommand::FetchMetrics {
            range_days,
            progress,
        } => {
            handle_metrics(client, result_tx, range_days, progress).await;
        }
    }
}

async fn handle_timeline(
    client: &MastodonClient,
    result_tx: &mpsc::Sender<AsyncResult>,
    mode: TimelineMode,
    since_id: Option<String>,
) {
    let since = since_id.as_deref();
    let fetched = match mode {
        TimelineMode::Home => client.home_timeline_page(PAGE_LIMIT, since).await,
        TimelineMode::Local => {
            client
                .public_timeline_page(PAGE_LIMIT, true, false, since, None)
                .await
        }
        TimelineMode::Federated => {
            client
                .public_timeline_page(PAGE_LIMIT, false, false, since, None)
                .await
        }
        TimelineMode::Trending => client.trending_posts(PAGE_LIMIT).await,
    };

    let result = match fetched {
        Ok(posts) => AsyncResult::Timeline {
            mode,
            posts,
            since_id,
        },
        Err(e) => {
            tracing::warn!("Timeline fetch ({}) failed: {e}", mode.name());
            AsyncResult::Failed {
                feed: FeedId::Timeline(mode),
                message: e.to_string(),
            }
        }
    };
    let _ = result_tx.send(result).await;
}

async fn handle_profile(client: &MastodonClient, result_tx: &mpsc::Sender<AsyncResult>) {
    let account = match client.verify_credentials().await {
        Ok(account) => account,
        Err(e) => {
            tracing::warn!("Credential check failed: {e}");
            let _ = result_tx
                .send(AsyncResult::Failed {
                    feed: FeedId::Profile,
                    message: e.to_string(),
                })
                .await;
            return;
        }
    };

    let result = match client
        .account_posts(&account.id, PAGE_LIMIT, true, false, None)
        .await
    {
        Ok(posts) => AsyncResult::Profile { account, posts },
        Err(e) => AsyncResult::Failed {
            feed: FeedId::Profile,
            message: e.to_string(),
        },
    };
    let _ = result_tx.send(result).await;
}

async fn handle_notifications(client: &MastodonClient, result_tx: &mpsc::Sender<AsyncResult>) {
    let result = match client.grouped_notifications(PAGE_LIMIT).await {
        Ok(groups) => AsyncResult::Notifications { groups },
        Err(e) => AsyncResult::Failed {
            feed: FeedId::Notifications,
            message: e.to_string(),
        },
    };
    let _ = result_tx.send(result).await;
}

async fn handle_metrics(
    client: &MastodonClient,
    result_tx: &mpsc::Sender<AsyncResult>,
    range_days: u32,
    progress: mpsc::Sender<usize>,
) {
    let now = Local::now().fixed_offset();

    let scanned = fetch_daily_metrics(
        range_days,
        now,
        |limit, max_id| {
            let client = client.clone();
            async move {
                client
                    .grouped_notifications_page(limit, max_id.as_deref())
                    .await
                    .map_err(Into::into)
            }
        },
        // try_send: under backpressure ticks are dropped, not awaited
        |count| {
            let _ = progress.try_send(count);
        },
    )
    .await;

    // Dropping the sender closes the progress stream; the loop treats the
    // closure as "scan over" whether or not the result has arrived yet.
    drop(progress);

    let result = match scanned {
        Ok(series) => AsyncResult::Metrics { series },
        Err(e) => {
            tracing::warn!("Metrics scan failed: {e}");
            AsyncResult::Failed {
                feed: FeedId::Metrics,
                message: e.to_string(),
            }
        }
    };
    let _ = result_tx.send(result).await;
}
