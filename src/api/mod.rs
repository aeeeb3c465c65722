//! Mastodon API client

pub mod mastodon;

pub use mastodon::MastodonClient;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors produced by remote operations.
///
/// Auth failures are split out from transport problems so the UI can tell the
/// user to re-login instead of retrying.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure or unreadable response
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Token rejected by the server
    #[error("authentication rejected (HTTP {status}); run `roost login` to refresh the token")]
    Auth {
        /// HTTP status the server answered with (401 or 403)
        status: StatusCode,
    },

    /// Any other non-success response
    #[error("server returned HTTP {status}: {body}")]
    Api {
        /// HTTP status code
        status: StatusCode,
        /// Response body, as far as it could be read
        body: String,
    },
}
