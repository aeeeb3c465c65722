//! Post/status model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Account;

/// A timeline post, flattened for display (boosts resolve to the boosted post)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Server-side status id; doubles as the pagination cursor for feeds
    pub id: String,
    /// Author of the displayed content
    pub account: Account,
    /// Content with HTML stripped
    pub content: String,
    /// When the post was created
    pub created_at: DateTime<Utc>,
    /// URL to the post on the web
    pub url: Option<String>,
    /// Handle of the booster, when this entry arrived as a boost
    pub boosted_by: Option<String>,
    /// Number of favourites
    pub like_count: u32,
    /// Number of boosts
    pub boost_count: u32,
    /// Number of replies
    pub reply_count: u32,
}

impl Post {
    /// Author line for lists: `Name (@handle) · boosted by @x` when applicable.
    pub fn author_line(&self) -> String {
        match &self.boosted_by {
            Some(booster) => format!("{} · boosted by @{}", self.account.label(), booster),
            None => self.account.label(),
        }
    }

    /// Relative age string (e.g. "5m", "2h", "3d")
    pub fn relative_time(&self) -> String {
        let duration = Utc::now().signed_duration_since(self.created_at);

        if duration.num_seconds() < 60 {
            format!("{}s", duration.num_seconds().max(0))
        } else if duration.num_minutes() < 60 {
            format!("{}m", duration.num_minutes())
        } else if duration.num_hours() < 24 {
            format!("{}h", duration.num_hours())
        } else if duration.num_days() < 7 {
            format!("{}d", duration.num_days())
        } else {
            self.created_at.format("%b %-d").to_string()
        }
    }
}
