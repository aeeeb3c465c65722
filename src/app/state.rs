//! Application state
//!
//! One [`FeedState`] per view, each moving through Idle, Loading and
//! Loaded/Error independently. The `Loading` status doubles as the fetch
//! guard: at most one request per view is in flight, and a refresh during
//! `Loading` is dropped, not queued. Results coming back from the worker are
//! tagged with their view, so a fetch that outlives a tab switch still lands
//! in the state it was started for.

use tokio::sync::mpsc;

use crate::app::async_ops::{AsyncCommand, AsyncResult, FeedId, PROGRESS_CAPACITY};
use crate::config::Config;
use crate::metrics::DailyMetric;
use crate::models::{Account, GroupedNotification, Post};
use crate::theme::Theme;

/// Top-level tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    /// Timeline feeds (home/local/federated/trending)
    #[default]
    Timeline,
    /// Local filter over the home feed
    Search,
    /// The logged-in account's posts
    Profile,
    /// Daily engagement chart
    Metrics,
    /// Grouped notifications
    Notifications,
}

impl Tab {
    /// Display order of the tabs
    pub const ALL: [Self; 5] = [
        Self::Timeline,
        Self::Search,
        Self::Profile,
        Self::Metrics,
        Self::Notifications,
    ];

    /// Next tab in display order, wrapping
    pub fn next(&self) -> Self {
        match self {
            Self::Timeline => Self::Search,
            Self::Search => Self::Profile,
            Self::Profile => Self::Metrics,
            Self::Metrics => Self::Notifications,
            Self::Notifications => Self::Timeline,
        }
    }

    /// Previous tab in display order, wrapping
    pub fn prev(&self) -> Self {
        match self {
            Self::Timeline => Self::Notifications,
            Self::Search => Self::Timeline,
            Self::Profile => Self::Search,
            Self::Metrics => Self::Profile,
            Self::Notifications => Self::Metrics,
        }
    }

    /// Tab label
    pub fn title(&self) -> &'static str {
        match self {
            Self::Timeline => "Timeline",
            Self::Search => "Search",
            Self::Profile => "Profile",
            Self::Metrics => "Metrics",
            Self::Notifications => "Notifications",
        }
    }
}

/// Which timeline feed is shown on the Timeline tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimelineMode {
    /// Accounts you follow
    #[default]
    Home,
    /// Public posts from this instance
    Local,
    /// Public posts from the whole known network
    Federated,
    /// Posts trending on this instance
    Trending,
}

impl TimelineMode {
    /// Mode label
    pub fn name(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Local => "Local",
            Self::Federated => "Federated",
            Self::Trending => "Trending",
        }
    }
}

/// Lifecycle of one view's data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    /// Never fetched
    #[default]
    Idle,
    /// A fetch is in flight
    Loading,
    /// Data is present
    Loaded,
    /// The last fetch failed
    Error,
}

/// Items, pagination cursor and load status for one view
#[derive(Debug)]
pub struct FeedState<T> {
    /// Items, newest first
    pub items: Vec<T>,
    /// Id of the newest item, used as `since_id` on the next refresh
    pub cursor: Option<String>,
    /// Load lifecycle; `Loading` doubles as the fetch guard
    pub status: LoadStatus,
    /// Error text when `status` is `Error`
    pub error: Option<String>,
    /// Transient message (e.g. an empty refresh), cleared on the next fetch
    pub notice: Option<String>,
    /// Index of the highlighted item
    pub selected: usize,
}

impl<T> Default for FeedState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            cursor: None,
            status: LoadStatus::Idle,
            error: None,
            notice: None,
            selected: 0,
        }
    }
}

impl<T> FeedState<T> {
    fn begin_loading(&mut self) {
        self.status = LoadStatus::Loading;
        self.error = None;
        self.notice = None;
    }

    fn fail(&mut self, message: String) {
        self.status = LoadStatus::Error;
        self.error = Some(message);
    }

    /// Merge a returned page. `since_id` is the cursor the request carried:
    /// empty means replace, non-empty means prepend. An empty prepend batch
    /// leaves items and cursor untouched and surfaces a notice instead.
    fn apply_page(
        &mut self,
        batch: Vec<T>,
        since_id: Option<&str>,
        id_of: impl Fn(&T) -> &str,
        empty_notice: &str,
    ) {
        self.status = LoadStatus::Loaded;
        self.error = None;

        if since_id.is_none() {
            self.cursor = batch.first().map(|item| id_of(item).to_string());
            self.items = batch;
            self.selected = 0;
            return;
        }

        if batch.is_empty() {
            self.notice = Some(empty_notice.to_string());
            return;
        }

        self.cursor = batch.first().map(|item| id_of(item).to_string());
        // Keep the highlight on the same item after the insert
        self.selected += batch.len();
        let mut merged = batch;
        merged.append(&mut self.items);
        self.items = merged;
    }

    /// The highlighted item, if any
    pub fn selected_item(&self) -> Option<&T> {
        self.items.get(self.selected)
    }

    /// Move the highlight down
    pub fn select_next(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + 1).min(self.items.len() - 1);
        }
    }

    /// Move the highlight up
    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

/// The four timeline feeds, cached independently
#[derive(Debug, Default)]
pub struct TimelineStates {
    home: FeedState<Post>,
    local: FeedState<Post>,
    federated: FeedState<Post>,
    trending: FeedState<Post>,
}

impl TimelineStates {
    /// Feed for `mode`
    pub fn get(&self, mode: TimelineMode) -> &FeedState<Post> {
        match mode {
            TimelineMode::Home => &self.home,
            TimelineMode::Local => &self.local,
            TimelineMode::Federated => &self.federated,
            TimelineMode::Trending => &self.trending,
        }
    }

    /// Mutable feed for `mode`
    pub fn get_mut(&mut self, mode: TimelineMode) -> &mut FeedState<Post> {
        match mode {
            TimelineMode::Home => &mut self.home,
            TimelineMode::Local => &mut self.local,
            TimelineMode::Federated => &mut self.federated,
            TimelineMode::Trending => &mut self.trending,
        }
    }
}

/// Metrics view: series, range and in-flight scan progress
pub struct MetricsState {
    /// Day-bucketed series, oldest first
    pub series: Vec<DailyMetric>,
    /// Scan lifecycle
    pub status: LoadStatus,
    /// Error text when the scan failed
    pub error: Option<String>,
    /// Index of the highlighted day
    pub selected: usize,
    /// Window length in days (7 or 30)
    pub range_days: u32,
    /// Live progress stream of the current scan; `None` when no scan is
    /// showing progress (never started, or the stream closed)
    pub progress_rx: Option<mpsc::Receiver<usize>>,
    /// Cumulative records scanned, from the latest progress tick
    pub scanned: usize,
}

impl Default for MetricsState {
    fn default() -> Self {
        Self {
            series: Vec::new(),
            status: LoadStatus::Idle,
            error: None,
            selected: 0,
            range_days: 7,
            progress_rx: None,
            scanned: 0,
        }
    }
}

/// Search tab: local filter over the home timeline
#[derive(Debug, Default)]
pub struct SearchState {
    /// Filter text
    pub query: String,
    /// Index of the highlighted result
    pub selected: usize,
}

/// Application state
pub struct AppState {
    /// Configuration
    pub config: Config,
    /// Current theme
    pub theme: Theme,
    /// Whether to quit
    pub should_quit: bool,
    /// Active tab
    pub tab: Tab,
    /// Active timeline mode
    pub timeline_mode: TimelineMode,
    /// Per-mode timeline feeds
    pub timelines: TimelineStates,
    /// Logged-in account's posts
    pub profile: FeedState<Post>,
    /// Logged-in account, once fetched
    pub profile_account: Option<Account>,
    /// Grouped notifications feed
    pub notifications: FeedState<GroupedNotification>,
    /// Metrics view
    pub metrics: MetricsState,
    /// Search tab
    pub search: SearchState,
    /// Whether keystrokes go into the search query
    pub search_input: bool,
    /// Status message (bottom bar)
    pub status_message: String,
}

impl AppState {
    /// Create the initial state; nothing is fetched until a tab asks
    pub fn new(config: Config) -> Self {
        let theme = config.theme;
        Self {
            config,
            theme,
            should_quit: false,
            tab: Tab::Timeline,
            timeline_mode: TimelineMode::Home,
            timelines: TimelineStates::default(),
            profile: FeedState::default(),
            profile_account: None,
            notifications: FeedState::default(),
            metrics: MetricsState::default(),
            search: SearchState::default(),
            search_input: false,
            status_message: String::new(),
        }
    }

    /// Switch tabs. A view that already has items is served from cache;
    /// an empty one gets a fetch unless one is in flight, so a view that
    /// errored (or came back empty) retries on the next visit.
    pub fn select_tab(&mut self, tab: Tab) -> Option<AsyncCommand> {
        self.tab = tab;
        self.search_input = tab == Tab::Search && self.search.query.is_empty();
        match tab {
            Tab::Timeline => self.ensure_timeline_loaded(self.timeline_mode),
            // Search filters the home feed, so make sure it exists
            Tab::Search => self.ensure_timeline_loaded(TimelineMode::Home),
            Tab::Profile => {
                if self.profile.status == LoadStatus::Loading || !self.profile.items.is_empty() {
                    None
                } else {
                    self.profile.begin_loading();
                    Some(AsyncCommand::FetchProfile)
                }
            }
            Tab::Notifications => {
                if self.notifications.status == LoadStatus::Loading
                    || !self.notifications.items.is_empty()
                {
                    None
                } else {
                    self.notifications.begin_loading();
                    Some(AsyncCommand::FetchNotifications)
                }
            }
            Tab::Metrics => {
                if self.metrics.status == LoadStatus::Loading || !self.metrics.series.is_empty() {
                    None
                } else {
                    Some(self.begin_metrics_scan())
                }
            }
        }
    }

    pub fn next_tab(&mut self) -> Option<AsyncCommand> {
        self.select_tab(self.tab.next())
    }

    pub fn prev_tab(&mut self) -> Option<AsyncCommand> {
        self.select_tab(self.tab.prev())
    }

    /// Switch timeline mode, fetching only if that feed has nothing to show
    pub fn select_timeline_mode(&mut self, mode: TimelineMode) -> Option<AsyncCommand> {
        self.timeline_mode = mode;
        self.ensure_timeline_loaded(mode)
    }

    fn ensure_timeline_loaded(&mut self, mode: TimelineMode) -> Option<AsyncCommand> {
        let feed = self.timelines.get_mut(mode);
        if feed.status == LoadStatus::Loading || !feed.items.is_empty() {
            return None;
        }
        feed.begin_loading();
        Some(AsyncCommand::FetchTimeline {
            mode,
            since_id: None,
        })
    }

    /// Refresh the active view. A no-op while that view is already loading.
    pub fn refresh(&mut self) -> Option<AsyncCommand> {
        match self.tab {
            Tab::Timeline => self.refresh_timeline(self.timeline_mode),
            Tab::Search => self.refresh_timeline(TimelineMode::Home),
            Tab::Profile => {
                if self.profile.status == LoadStatus::Loading {
                    return None;
                }
                self.profile.begin_loading();
                Some(AsyncCommand::FetchProfile)
            }
            Tab::Notifications => {
                if self.notifications.status == LoadStatus::Loading {
                    return None;
                }
                self.notifications.begin_loading();
                Some(AsyncCommand::FetchNotifications)
            }
            Tab::Metrics => {
                if self.metrics.status == LoadStatus::Loading {
                    return None;
                }
                Some(self.begin_metrics_scan())
            }
        }
    }

    fn refresh_timeline(&mut self, mode: TimelineMode) -> Option<AsyncCommand> {
        let feed = self.timelines.get_mut(mode);
        if feed.status == LoadStatus::Loading {
            return None;
        }
        // Trending has no since_id pagination; a refresh replaces it
        let since_id = if mode == TimelineMode::Trending {
            None
        } else {
            feed.cursor.clone()
        };
        feed.begin_loading();
        Some(AsyncCommand::FetchTimeline { mode, since_id })
    }

    /// Switch the metrics range. Selecting the range that is already loaded
    /// does nothing; a new range starts a fresh scan unless one is running.
    pub fn select_metrics_range(&mut self, range_days: u32) -> Option<AsyncCommand> {
        if self.metrics.status == LoadStatus::Loading {
            return None;
        }
        if self.metrics.range_days == range_days && self.metrics.status == LoadStatus::Loaded {
            return None;
        }
        self.metrics.range_days = range_days;
        Some(self.begin_metrics_scan())
    }

    fn begin_metrics_scan(&mut self) -> AsyncCommand {
        let (progress_tx, progress_rx) = mpsc::channel(PROGRESS_CAPACITY);
        self.metrics.status = LoadStatus::Loading;
        self.metrics.error = None;
        self.metrics.scanned = 0;
        self.metrics.progress_rx = Some(progress_rx);
        AsyncCommand::FetchMetrics {
            range_days: self.metrics.range_days,
            progress: progress_tx,
        }
    }

    /// Apply a worker result to the view it was started for, active or not.
    pub fn apply_result(&mut self, result: AsyncResult) {
        match result {
            AsyncResult::Timeline {
                mode,
                posts,
                since_id,
            } => {
                self.timelines.get_mut(mode).apply_page(
                    posts,
                    since_id.as_deref(),
                    |post| &post.id,
                    "No new posts.",
                );
            }
            AsyncResult::Profile { account, posts } => {
                self.profile_account = Some(account);
                self.profile
                    .apply_page(posts, None, |post| &post.id, "No new posts.");
            }
            AsyncResult::Notifications { groups } => {
                self.notifications.apply_page(
                    groups,
                    None,
                    |group| &group.most_recent_id,
                    "No new notifications.",
                );
            }
            AsyncResult::Metrics { series } => {
                self.metrics.selected = series.len().saturating_sub(1);
                self.metrics.series = series;
                self.metrics.status = LoadStatus::Loaded;
                self.metrics.error = None;
            }
            AsyncResult::Failed { feed, message } => match feed {
                FeedId::Timeline(mode) => self.timelines.get_mut(mode).fail(message),
                FeedId::Profile => self.profile.fail(message),
                FeedId::Notifications => self.notifications.fail(message),
                FeedId::Metrics => {
                    self.metrics.status = LoadStatus::Error;
                    self.metrics.error = Some(message);
                }
            },
        }
    }

    /// Drain at most one progress tick. A closed stream means the scan is
    /// over, whether or not its result has been applied yet.
    pub fn poll_metrics_progress(&mut self) {
        let Some(rx) = &mut self.metrics.progress_rx else {
            return;
        };
        match rx.try_recv() {
            Ok(scanned) => self.metrics.scanned = scanned,
            Err(mpsc::error::TryRecvError::Empty) => {}
            Err(mpsc::error::TryRecvError::Disconnected) => {
                self.metrics.progress_rx = None;
            }
        }
    }

    /// The timeline feed currently on screen
    pub fn active_timeline(&self) -> &FeedState<Post> {
        self.timelines.get(self.timeline_mode)
    }

    /// Home-feed posts matching the search query, newest first
    pub fn search_results(&self) -> Vec<&Post> {
        let query = self.search.query.to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        self.timelines
            .get(TimelineMode::Home)
            .items
            .iter()
            .filter(|post| {
                post.content.to_lowercase().contains(&query)
                    || post.account.handle.to_lowercase().contains(&query)
                    || post.account.display_name.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Move the selection down in the active view
    pub fn select_next(&mut self) {
        match self.tab {
            Tab::Timeline => self.timelines.get_mut(self.timeline_mode).select_next(),
            Tab::Search => {
                let results = self.search_results().len();
                if results > 0 {
                    self.search.selected = (self.search.selected + 1).min(results - 1);
                }
            }
            Tab::Profile => self.profile.select_next(),
            Tab::Notifications => self.notifications.select_next(),
            Tab::Metrics => {
                if !self.metrics.series.is_empty() {
                    self.metrics.selected =
                        (self.metrics.selected + 1).min(self.metrics.series.len() - 1);
                }
            }
        }
    }

    /// Move the selection up in the active view
    pub fn select_prev(&mut self) {
        match self.tab {
            Tab::Timeline => self.timelines.get_mut(self.timeline_mode).select_prev(),
            Tab::Search => self.search.selected = self.search.selected.saturating_sub(1),
            Tab::Profile => self.profile.select_prev(),
            Tab::Notifications => self.notifications.select_prev(),
            Tab::Metrics => self.metrics.selected = self.metrics.selected.saturating_sub(1),
        }
    }

    /// Cycle through themes
    pub fn next_theme(&mut self) {
        self.theme = self.theme.next();
        self.config.theme = self.theme;
    }

    /// Set status message
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Account;

    fn post(id: &str, content: &str) -> Post {
        Post {
            id: id.to_string(),
            account: Account {
                id: "a1".to_string(),
                handle: "ferris@example.social".to_string(),
                display_name: "Ferris".to_string(),
                avatar_url: None,
            },
            content: content.to_string(),
            created_at: chrono::Utc::now(),
            url: None,
            boosted_by: None,
            like_count: 0,
            boost_count: 0,
            reply_count: 0,
        }
    }

    fn loaded_state_with_home(posts: Vec<Post>) -> AppState {
        let mut state = AppState::new(Config::default());
        let cmd = state.select_tab(Tab::Timeline);
        assert!(cmd.is_some());
        state.apply_result(AsyncResult::Timeline {
            mode: TimelineMode::Home,
            posts,
            since_id: None,
        });
        state
    }

    #[test]
    fn loaded_tab_is_served_from_cache() {
        let mut state = loaded_state_with_home(vec![post("10", "hello")]);

        state.select_tab(Tab::Notifications);
        assert!(state.select_tab(Tab::Timeline).is_none());
        assert_eq!(state.active_timeline().items.len(), 1);
    }

    #[test]
    fn refresh_fetches_but_not_while_loading() {
        let mut state = loaded_state_with_home(vec![post("10", "hello")]);

        let first = state.refresh();
        assert!(matches!(
            first,
            Some(AsyncCommand::FetchTimeline {
                mode: TimelineMode::Home,
                since_id: Some(ref id),
            }) if id == "10"
        ));
        // Loading acts as the fetch guard
        assert!(state.refresh().is_none());
    }

    #[test]
    fn replace_sets_cursor_to_newest_item() {
        let state = loaded_state_with_home(vec![post("30", "newest"), post("20", "older")]);
        let feed = state.timelines.get(TimelineMode::Home);
        assert_eq!(feed.cursor.as_deref(), Some("30"));
        assert_eq!(feed.status, LoadStatus::Loaded);
    }

    #[test]
    fn refresh_prepends_and_advances_cursor() {
        let mut state = loaded_state_with_home(vec![post("10", "old")]);
        state.refresh();
        state.apply_result(AsyncResult::Timeline {
            mode: TimelineMode::Home,
            posts: vec![post("12", "new"), post("11", "newer than old")],
            since_id: Some("10".to_string()),
        });

        let feed = state.timelines.get(TimelineMode::Home);
        assert_eq!(
            feed.items.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(),
            ["12", "11", "10"]
        );
        assert_eq!(feed.cursor.as_deref(), Some("12"));
    }

    #[test]
    fn empty_refresh_keeps_items_and_surfaces_a_notice() {
        let mut state = loaded_state_with_home(vec![post("10", "old")]);
        state.refresh();
        state.apply_result(AsyncResult::Timeline {
            mode: TimelineMode::Home,
            posts: Vec::new(),
            since_id: Some("10".to_string()),
        });

        let feed = state.timelines.get(TimelineMode::Home);
        assert_eq!(feed.items.len(), 1);
        assert_eq!(feed.cursor.as_deref(), Some("10"));
        assert_eq!(feed.status, LoadStatus::Loaded);
        assert_eq!(feed.notice.as_deref(), Some("No new posts."));
    }

    #[test]
    fn stale_result_lands_in_its_own_view() {
        let mut state = AppState::new(Config::default());
        state.select_tab(Tab::Timeline);
        // User switches away before the fetch completes
        state.select_tab(Tab::Notifications);

        state.apply_result(AsyncResult::Timeline {
            mode: TimelineMode::Home,
            posts: vec![post("10", "arrived late")],
            since_id: None,
        });

        assert_eq!(state.tab, Tab::Notifications);
        let home = state.timelines.get(TimelineMode::Home);
        assert_eq!(home.status, LoadStatus::Loaded);
        assert_eq!(home.items.len(), 1);
    }

    #[test]
    fn failure_is_scoped_to_one_view() {
        let mut state = loaded_state_with_home(vec![post("10", "hello")]);
        state.apply_result(AsyncResult::Failed {
            feed: FeedId::Notifications,
            message: "request failed".to_string(),
        });

        assert_eq!(state.notifications.status, LoadStatus::Error);
        assert_eq!(
            state.timelines.get(TimelineMode::Home).status,
            LoadStatus::Loaded
        );
    }

    #[test]
    fn errored_view_refetches_on_the_next_visit() {
        let mut state = AppState::new(Config::default());
        assert!(state.select_tab(Tab::Timeline).is_some());
        state.apply_result(AsyncResult::Failed {
            feed: FeedId::Timeline(TimelineMode::Home),
            message: "request failed".to_string(),
        });

        state.select_tab(Tab::Notifications);
        let cmd = state.select_tab(Tab::Timeline);
        assert!(matches!(
            cmd,
            Some(AsyncCommand::FetchTimeline {
                mode: TimelineMode::Home,
                since_id: None,
            })
        ));
        let feed = state.timelines.get(TimelineMode::Home);
        assert_eq!(feed.status, LoadStatus::Loading);
        assert!(feed.error.is_none());
    }

    #[test]
    fn metrics_error_starts_a_fresh_scan_on_revisit() {
        let mut state = AppState::new(Config::default());
        assert!(state.select_tab(Tab::Metrics).is_some());
        state.apply_result(AsyncResult::Failed {
            feed: FeedId::Metrics,
            message: "request failed".to_string(),
        });

        state.select_tab(Tab::Timeline);
        assert!(matches!(
            state.select_tab(Tab::Metrics),
            Some(AsyncCommand::FetchMetrics { range_days: 7, .. })
        ));
    }

    #[test]
    fn empty_loaded_view_refetches_on_the_next_visit() {
        let mut state = AppState::new(Config::default());
        assert!(state.select_tab(Tab::Notifications).is_some());
        state.apply_result(AsyncResult::Notifications { groups: Vec::new() });
        assert_eq!(state.notifications.status, LoadStatus::Loaded);

        state.select_tab(Tab::Timeline);
        assert!(matches!(
            state.select_tab(Tab::Notifications),
            Some(AsyncCommand::FetchNotifications)
        ));
    }

    #[test]
    fn each_timeline_mode_keeps_its_own_cache() {
        let mut state = loaded_state_with_home(vec![post("10", "home")]);

        let cmd = state.select_timeline_mode(TimelineMode::Local);
        assert!(matches!(
            cmd,
            Some(AsyncCommand::FetchTimeline {
                mode: TimelineMode::Local,
                since_id: None,
            })
        ));

        // Coming back to home needs no fetch
        assert!(state.select_timeline_mode(TimelineMode::Home).is_none());
        assert_eq!(state.active_timeline().items.len(), 1);
    }

    #[test]
    fn same_range_reselect_is_a_noop() {
        let mut state = AppState::new(Config::default());
        let cmd = state.select_tab(Tab::Metrics);
        assert!(matches!(
            cmd,
            Some(AsyncCommand::FetchMetrics { range_days: 7, .. })
        ));

        state.apply_result(AsyncResult::Metrics { series: Vec::new() });
        assert!(state.select_metrics_range(7).is_none());
        assert!(matches!(
            state.select_metrics_range(30),
            Some(AsyncCommand::FetchMetrics { range_days: 30, .. })
        ));
    }

    #[test]
    fn range_switch_is_ignored_while_scanning() {
        let mut state = AppState::new(Config::default());
        state.select_tab(Tab::Metrics);
        assert_eq!(state.metrics.status, LoadStatus::Loading);
        assert!(state.select_metrics_range(30).is_none());
        assert_eq!(state.metrics.range_days, 7);
    }

    #[test]
    fn progress_stream_closure_ends_progress_display() {
        let mut state = AppState::new(Config::default());
        let cmd = state.select_tab(Tab::Metrics);

        let Some(AsyncCommand::FetchMetrics { progress, .. }) = cmd else {
            panic!("expected a metrics command");
        };
        progress.try_send(40).unwrap();

        state.poll_metrics_progress();
        assert_eq!(state.metrics.scanned, 40);

        drop(progress);
        state.poll_metrics_progress();
        assert!(state.metrics.progress_rx.is_none());
    }

    #[test]
    fn search_filters_the_home_feed() {
        let mut state = loaded_state_with_home(vec![
            post("3", "rust is nice"),
            post("2", "completely unrelated"),
            post("1", "more Rust talk"),
        ]);
        state.select_tab(Tab::Search);
        state.search.query = "rust".to_string();

        let results = state.search_results();
        assert_eq!(
            results.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(),
            ["3", "1"]
        );
    }
}
