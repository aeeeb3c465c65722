//! Typed Mastodon REST operations
//!
//! Thin wrapper over reqwest. Every operation returns data already mapped to
//! the crate's models; pagination cursors stay opaque strings.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::models::{Account, GroupedNotification, Post};
use crate::output::strip_html;

use super::ApiError;

/// Page size used by the interactive feeds and the metrics scan
pub const PAGE_LIMIT: u32 = 40;

/// Mastodon API client bound to one instance and one access token
#[derive(Debug, Clone)]
pub struct MastodonClient {
    client: Client,
    instance: String,
    access_token: String,
}

impl MastodonClient {
    /// Create a client for `instance` (domain or full URL).
    pub fn new(instance: &str, access_token: &str) -> Self {
        let instance = instance.trim_end_matches('/');
        let instance = if instance.starts_with("http") {
            instance.to_string()
        } else {
            format!("https://{instance}")
        };
        Self {
            client: Client::new(),
            instance,
            access_token: access_token.to_string(),
        }
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/api{}", self.instance, endpoint)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ApiError::Auth { status });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Api { status, body });
        }

        Ok(response.json().await?)
    }

    /// Fetch a page of the home timeline, newest first. A `since_id` cursor
    /// requests only items newer than that id.
    pub async fn home_timeline_page(
        &self,
        limit: u32,
        since_id: Option<&str>,
    ) -> Result<Vec<Post>, ApiError> {
        let mut query = vec![("limit", limit.to_string())];
        if let Some(id) = since_id {
            query.push(("since_id", id.to_string()));
        }
        let statuses: Vec<MastodonStatus> =
            self.get_json(&self.api_url("/v1/timelines/home"), &query).await?;
        Ok(statuses.into_iter().map(MastodonStatus::into_post).collect())
    }

    /// Fetch a page of the public timeline, newest first. `local` restricts to
    /// the instance, `only_media` to posts with attachments.
    pub async fn public_timeline_page(
        &self,
        limit: u32,
        local: bool,
        only_media: bool,
        since_id: Option<&str>,
        max_id: Option<&str>,
    ) -> Result<Vec<Post>, ApiError> {
        let mut query = vec![("limit", limit.to_string())];
        if local {
            query.push(("local", "true".to_string()));
        }
        if only_media {
            query.push(("only_media", "true".to_string()));
        }
        if let Some(id) = since_id {
            query.push(("since_id", id.to_string()));
        }
        if let Some(id) = max_id {
            query.push(("max_id", id.to_string()));
        }
        let statuses: Vec<MastodonStatus> =
            self.get_json(&self.api_url("/v1/timelines/public"), &query).await?;
        Ok(statuses.into_iter().map(MastodonStatus::into_post).collect())
    }

    /// Fetch the posts currently trending on the instance.
    pub async fn trending_posts(&self, limit: u32) -> Result<Vec<Post>, ApiError> {
        let query = vec![("limit", limit.to_string())];
        let statuses: Vec<MastodonStatus> =
            self.get_json(&self.api_url("/v1/trends/statuses"), &query).await?;
        Ok(statuses.into_iter().map(MastodonStatus::into_post).collect())
    }

    /// Fetch a page of an account's posts, newest first. A `max_id` cursor
    /// requests items older than that id.
    pub async fn account_posts(
        &self,
        account_id: &str,
        limit: u32,
        include_boosts: bool,
        include_replies: bool,
        max_id: Option<&str>,
    ) -> Result<Vec<Post>, ApiError> {
        let mut query = vec![("limit", limit.to_string())];
        if !include_boosts {
            query.push(("exclude_reblogs", "true".to_string()));
        }
        if !include_replies {
            query.push(("exclude_replies", "true".to_string()));
        }
        if let Some(id) = max_id {
            query.push(("max_id", id.to_string()));
        }
        let url = self.api_url(&format!("/v1/accounts/{account_id}/statuses"));
        let statuses: Vec<MastodonStatus> = self.get_json(&url, &query).await?;
        Ok(statuses.into_iter().map(MastodonStatus::into_post).collect())
    }

    /// Verify the access token and return the owning account.
    pub async fn verify_credentials(&self) -> Result<Account, ApiError> {
        let account: MastodonAccount = self
            .get_json(&self.api_url("/v1/accounts/verify_credentials"), &[])
            .await?;
        Ok(account.into_account())
    }

    /// Fetch the newest page of grouped notifications.
    pub async fn grouped_notifications(
        &self,
        limit: u32,
    ) -> Result<Vec<GroupedNotification>, ApiError> {
        self.grouped_notifications_page(limit, None).await
    }

    /// Fetch a page of grouped notifications older than `max_id`.
    pub async fn grouped_notifications_page(
        &self,
        limit: u32,
        max_id: Option<&str>,
    ) -> Result<Vec<GroupedNotification>, ApiError> {
        let mut query = vec![("limit", limit.to_string())];
        if let Some(id) = max_id {
            query.push(("max_id", id.to_string()));
        }
        let response: GroupedNotificationsResponse =
            self.get_json(&self.api_url("/v2/notifications"), &query).await?;
        Ok(response.into_groups())
    }
}

// ==================== API types ====================

#[derive(Debug, Deserialize)]
struct MastodonStatus {
    id: String,
    created_at: String,
    content: String,
    url: Option<String>,
    account: MastodonAccount,
    reblog: Option<Box<Self>>,
    #[serde(default)]
    favourites_count: u32,
    #[serde(default)]
    reblogs_count: u32,
    #[serde(default)]
    replies_count: u32,
}

#[derive(Debug, Deserialize)]
struct MastodonAccount {
    id: String,
    username: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    acct: String,
    #[serde(default)]
    avatar: String,
}

impl MastodonStatus {
    fn into_post(self) -> Post {
        // A boost resolves to the boosted post, keeping the booster's handle
        if let Some(reblog) = self.reblog {
            let mut post = reblog.into_post();
            post.boosted_by = Some(if self.account.acct.is_empty() {
                self.account.username
            } else {
                self.account.acct
            });
            return post;
        }

        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

        Post {
            id: self.id,
            account: self.account.into_account(),
            content: strip_html(&self.content),
            created_at,
            url: self.url,
            boosted_by: None,
            like_count: self.favourites_count,
            boost_count: self.reblogs_count,
            reply_count: self.replies_count,
        }
    }
}

impl MastodonAccount {
    fn into_account(self) -> Account {
        Account {
            id: self.id,
            handle: if self.acct.is_empty() {
                self.username
            } else {
                self.acct
            },
            display_name: strip_html(&self.display_name),
            avatar_url: if self.avatar.is_empty() {
                None
            } else {
                Some(self.avatar)
            },
        }
    }
}

/// `GET /api/v2/notifications` payload: groups reference accounts and statuses
/// by id; the join happens here so callers only see [`GroupedNotification`].
#[derive(Debug, Deserialize)]
struct GroupedNotificationsResponse {
    #[serde(default)]
    accounts: Vec<MastodonAccount>,
    #[serde(default)]
    statuses: Vec<MastodonStatus>,
    #[serde(default)]
    notification_groups: Vec<NotificationGroup>,
}

#[derive(Debug, Deserialize)]
struct NotificationGroup {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    notifications_count: u32,
    most_recent_notification_id: String,
    #[serde(default)]
    latest_page_notification_at: Option<String>,
    #[serde(default)]
    sample_account_ids: Vec<String>,
    #[serde(default)]
    status_id: Option<String>,
}

impl GroupedNotificationsResponse {
    fn into_groups(self) -> Vec<GroupedNotification> {
        let accounts: HashMap<String, Account> = self
            .accounts
            .into_iter()
            .map(|a| (a.id.clone(), a.into_account()))
            .collect();
        let statuses: HashMap<String, Post> = self
            .statuses
            .into_iter()
            .map(|s| {
                let id = s.id.clone();
                (id, s.into_post())
            })
            .collect();

        self.notification_groups
            .into_iter()
            .map(|group| GroupedNotification {
                kind: group.kind,
                count: group.notifications_count.max(1),
                latest_at: group.latest_page_notification_at.unwrap_or_default(),
                most_recent_id: group.most_recent_notification_id,
                accounts: group
                    .sample_account_ids
                    .iter()
                    .filter_map(|id| accounts.get(id).cloned())
                    .collect(),
                status: group
                    .status_id
                    .as_deref()
                    .and_then(|id| statuses.get(id).cloned()),
            })
            .collect()
    }
}

/// OAuth authentication flow
pub mod oauth {
    use serde::Deserialize;

    use super::ApiError;

    /// Registered OAuth application credentials
    #[derive(Debug, Deserialize)]
    pub struct OAuthApp {
        /// OAuth client ID
        pub client_id: String,
        /// OAuth client secret
        pub client_secret: String,
    }

    /// OAuth access token response
    #[derive(Debug, Deserialize)]
    pub struct OAuthToken {
        /// Access token for API requests
        pub access_token: String,
        /// Token type (usually "Bearer")
        pub token_type: String,
    }

    fn base_url(instance: &str) -> String {
        let instance = instance.trim_end_matches('/');
        if instance.starts_with("http") {
            instance.to_string()
        } else {
            format!("https://{instance}")
        }
    }

    async fn post_form<T: serde::de::DeserializeOwned>(
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let response = reqwest::Client::new().post(url).form(params).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Api { status, body });
        }
        Ok(response.json().await?)
    }

    /// Register an OAuth application with an instance.
    pub async fn register_app(instance: &str, redirect_uri: &str) -> Result<OAuthApp, ApiError> {
        let url = format!("{}/api/v1/apps", base_url(instance));
        let params = [
            ("client_name", "Roost"),
            ("redirect_uris", redirect_uri),
            ("scopes", "read"),
            ("website", "https://github.com/roost-tui/roost"),
        ];
        post_form(&url, &params).await
    }

    /// Build the authorization URL for the user to visit.
    pub fn authorize_url(instance: &str, client_id: &str, redirect_uri: &str) -> String {
        format!(
            "{}/oauth/authorize?client_id={}&redirect_uri={}&response_type=code&scope=read",
            base_url(instance),
            client_id,
            urlencoding::encode(redirect_uri)
        )
    }

    /// Exchange an authorization code for an access token.
    pub async fn get_token(
        instance: &str,
        client_id: &str,
        client_secret: &str,
        redirect_uri: &str,
        code: &str,
    ) -> Result<OAuthToken, ApiError> {
        let url = format!("{}/oauth/token", base_url(instance));
        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("redirect_uri", redirect_uri),
            ("code", code),
            ("scope", "read"),
        ];
        post_form(&url, &params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boost_flattens_to_inner_post() {
        let json = r#"{
            "id": "200",
            "created_at": "2025-01-10T08:00:00.000Z",
            "content": "",
            "url": null,
            "account": {"id": "2", "username": "booster", "acct": "booster@b.example", "display_name": "B", "avatar": ""},
            "reblog": {
                "id": "100",
                "created_at": "2025-01-09T10:00:00.000Z",
                "content": "<p>hello &amp; welcome</p>",
                "url": "https://a.example/@orig/100",
                "account": {"id": "1", "username": "orig", "acct": "orig", "display_name": "Original", "avatar": ""},
                "reblog": null,
                "favourites_count": 3,
                "reblogs_count": 1,
                "replies_count": 0
            },
            "favourites_count": 0,
            "reblogs_count": 0,
            "replies_count": 0
        }"#;

        let status: MastodonStatus = serde_json::from_str(json).unwrap();
        let post = status.into_post();

        assert_eq!(post.id, "100");
        assert_eq!(post.boosted_by.as_deref(), Some("booster@b.example"));
        assert_eq!(post.content, "hello & welcome");
        assert_eq!(post.like_count, 3);
    }

    #[test]
    fn grouped_response_joins_accounts_and_statuses() {
        let json = r#"{
            "accounts": [
                {"id": "1", "username": "fan", "acct": "fan", "display_name": "Fan", "avatar": ""},
                {"id": "2", "username": "pal", "acct": "pal", "display_name": "", "avatar": ""}
            ],
            "statuses": [
                {"id": "100", "created_at": "2025-01-09T10:00:00Z", "content": "<p>post</p>", "url": null,
                 "account": {"id": "9", "username": "me", "acct": "me", "display_name": "", "avatar": ""},
                 "reblog": null, "favourites_count": 0, "reblogs_count": 0, "replies_count": 0}
            ],
            "notification_groups": [
                {"type": "favourite", "notifications_count": 2,
                 "most_recent_notification_id": "555",
                 "latest_page_notification_at": "2025-01-10T08:00:00Z",
                 "sample_account_ids": ["1", "2"],
                 "status_id": "100"}
            ]
        }"#;

        let response: GroupedNotificationsResponse = serde_json::from_str(json).unwrap();
        let groups = response.into_groups();

        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.kind, "favourite");
        assert_eq!(group.count, 2);
        assert_eq!(group.most_recent_id, "555");
        assert_eq!(group.accounts.len(), 2);
        assert_eq!(group.accounts[0].handle, "fan");
        assert_eq!(group.status.as_ref().map(|s| s.id.as_str()), Some("100"));
    }

    #[test]
    fn group_count_is_at_least_one() {
        let json = r#"{
            "notification_groups": [
                {"type": "follow", "notifications_count": 0,
                 "most_recent_notification_id": "7",
                 "sample_account_ids": []}
            ]
        }"#;

        let response: GroupedNotificationsResponse = serde_json::from_str(json).unwrap();
        let groups = response.into_groups();
        assert_eq!(groups[0].count, 1);
        assert!(groups[0].latest_at.is_empty());
    }
}
