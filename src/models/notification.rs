//! Grouped notification model

use serde::{Deserialize, Serialize};

use super::{Account, Post};

/// One aggregated burst of same-type events (e.g. "5 favourites"), as returned
/// by the grouped notifications API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupedNotification {
    /// Event type (`follow`, `favourite`, `reblog`, `mention`, ...)
    pub kind: String,
    /// Number of underlying events folded into this record
    pub count: u32,
    /// Timestamp of the most recent event, kept as the raw server string;
    /// the metrics scan parses it and silently drops records it cannot read
    pub latest_at: String,
    /// Id of the most recent underlying notification; continuation cursor for
    /// the next older page
    pub most_recent_id: String,
    /// Sample of the accounts involved, most recent first
    pub accounts: Vec<Account>,
    /// The post the events relate to, when there is one
    pub status: Option<Post>,
}

impl GroupedNotification {
    /// Human-readable label for the event type.
    pub fn kind_label(&self) -> &str {
        match self.kind.as_str() {
            "mention" => "Mention",
            "status" => "Status",
            "reblog" => "Boost",
            "favourite" => "Favorite",
            "follow" => "Follow",
            "follow_request" => "Follow request",
            "poll" => "Poll",
            "update" => "Update",
            "admin.sign_up" => "Sign up",
            "admin.report" => "Report",
            other => other,
        }
    }

    /// Actor label for lists: first account plus a `+N` overflow marker.
    pub fn actors_label(&self) -> String {
        match self.accounts.as_slice() {
            [] => "Unknown".to_string(),
            [first] => first.label(),
            [first, rest @ ..] => format!("{} +{}", first.label(), rest.len()),
        }
    }
}
