//! Data models

mod account;
mod notification;
mod post;

pub use account::Account;
pub use notification::GroupedNotification;
pub use post::Post;
