//! # Roost 🪺
//!
//! A terminal Mastodon client with an engagement metrics report.
//!
//! ## Overview
//!
//! Roost lets you read your Mastodon timelines, search them, browse your
//! notifications, and chart how your follows, likes and boosts developed
//! over the last week or month, all from your terminal.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          App                                │
//! │  Per-view state machines and the main event loop            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!          ┌───────────────────┼───────────────────┐
//!          ▼                   ▼                   ▼
//! ┌─────────────────┐ ┌─────────────────┐ ┌─────────────────┐
//! │     Config      │ │       API       │ │     Metrics     │
//! │                 │ │                 │ │                 │
//! │ • Load/Save     │ │ • Timelines     │ │ • Day buckets   │
//! │ • OAuth login   │ │ • Notifications │ │ • Bounded scan  │
//! │ • Theme         │ │ • OAuth flow    │ │ • Progress      │
//! └─────────────────┘ └─────────────────┘ └─────────────────┘
//!          │                   │                   │
//!          └───────────────────┴───────────────────┘
//!                              │
//!                              ▼
//!                    ┌─────────────────┐
//!                    │     Models      │
//!                    │                 │
//!                    │ • Post          │
//!                    │ • Account       │
//!                    │ • Notification  │
//!                    └─────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`api`] — Mastodon API client and OAuth flow
//! - [`app`] — TUI application state and event loop
//! - [`config`] — Configuration management
//! - [`metrics`] — Day-bucketed engagement aggregation
//! - [`models`] — Data models (Post, Account, `GroupedNotification`)
//! - [`output`] — Plain-text reports for the one-shot subcommands
//! - [`theme`] — Theme support via ratatui-themes
//!
//! ## Example
//!
//! ```no_run
//! use roost::app;
//!
//! fn main() -> anyhow::Result<()> {
//!     app::run()
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/roost/0.1.0")]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::unused_async)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::single_match_else)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::use_self)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]

pub mod api;
pub mod app;
pub mod config;
pub mod metrics;
pub mod models;
pub mod output;
pub mod theme;

// Re-export main types for convenience
pub use api::{ApiError, MastodonClient};
pub use app::AppState;
pub use config::Config;
pub use models::{Account, GroupedNotification, Post};
pub use theme::{Theme, ThemeColors};

// Re-export theme types from ratatui-themes crate
pub use ratatui_themes::{ThemeName, ThemePalette};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Repository URL
pub const REPO_URL: &str = "https://github.com/roost-tui/roost";
