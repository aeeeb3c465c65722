//! Configuration module for Roost

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::theme::Theme;

/// Fallback redirect URI for the out-of-band OAuth flow
pub const OOB_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

/// Application configuration, including the saved login
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Mastodon instance domain (e.g. `mastodon.social`)
    #[serde(default)]
    pub instance: String,

    /// OAuth client id from app registration
    #[serde(default)]
    pub client_id: String,

    /// OAuth client secret from app registration
    #[serde(default)]
    pub client_secret: String,

    /// OAuth access token obtained by `roost login`
    #[serde(default)]
    pub access_token: String,

    /// OAuth redirect URI (defaults to the out-of-band flow)
    #[serde(default)]
    pub redirect_uri: String,

    /// Selected theme
    #[serde(default)]
    pub theme: Theme,
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("roost");
        Ok(config_dir.join("config.toml"))
    }

    /// Load config from the default path or create default
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        Self::load_from(&path)
    }

    /// Load config from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path()?;
        self.save_to(&path)
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Whether a usable login is present. Checked before any network call so
    /// missing credentials fail once, up front.
    pub fn has_credentials(&self) -> bool {
        !self.instance.is_empty() && !self.access_token.is_empty()
    }

    /// Redirect URI to use, falling back to the out-of-band flow.
    pub fn redirect_uri_or_default(&self) -> &str {
        if self.redirect_uri.is_empty() {
            OOB_REDIRECT_URI
        } else {
            &self.redirect_uri
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = Config::load_from(&path).unwrap();
        assert!(!config.has_credentials());
        assert_eq!(config.redirect_uri_or_default(), OOB_REDIRECT_URI);
    }

    #[test]
    fn round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config {
            instance: "mastodon.social".to_string(),
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            access_token: "token".to_string(),
            redirect_uri: String::new(),
            theme: Theme::default(),
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.instance, "mastodon.social");
        assert_eq!(loaded.access_token, "token");
        assert!(loaded.has_credentials());
    }
}
