//! Account model

use serde::{Deserialize, Serialize};

/// A Mastodon account as seen by the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Server-side account id
    pub id: String,
    /// Handle, including the domain for remote accounts (e.g. `user@example.social`)
    pub handle: String,
    /// Display name (may be empty)
    pub display_name: String,
    /// Avatar URL
    pub avatar_url: Option<String>,
}

impl Account {
    /// Short label for lists and detail panes: `Name (@handle)` or `@handle`.
    pub fn label(&self) -> String {
        let name = self.display_name.trim();
        if name.is_empty() || name == self.handle {
            format!("@{}", self.handle)
        } else {
            format!("{} (@{})", name, self.handle)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_falls_back_to_handle() {
        let account = Account {
            id: "1".to_string(),
            handle: "ferris@example.social".to_string(),
            display_name: String::new(),
            avatar_url: None,
        };
        assert_eq!(account.label(), "@ferris@example.social");
    }

    #[test]
    fn label_combines_name_and_handle() {
        let account = Account {
            id: "1".to_string(),
            handle: "ferris".to_string(),
            display_name: "Ferris".to_string(),
            avatar_url: None,
        };
        assert_eq!(account.label(), "Ferris (@ferris)");
    }
}
