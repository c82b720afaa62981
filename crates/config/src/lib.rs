#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for storeship
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/storeship/config.toml)
//! - Environment variables
//! - CLI flags (applied by the binary, highest precedence)
//!
//! Configuration is read-only: nothing is ever persisted back.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use storeship_errors::{ConfigError, Error};
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub playstore: PlayStoreConfig,

    #[serde(default)]
    pub appstore: AppStoreConfig,

    #[serde(default)]
    pub events: EventsConfig,
}

/// Remote release-management API endpoints and defaults
#[derive(Debug, Clone, Deserialize)]
pub struct PlayStoreConfig {
    /// Base URL for the edit transaction endpoints.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Base URL for the media upload endpoint (a distinct host path on the
    /// remote system).
    #[serde(default = "default_upload_base_url")]
    pub upload_base_url: String,
    /// Release track used when a request does not name one.
    #[serde(default = "default_track")]
    pub default_track: String,
}

impl Default for PlayStoreConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            upload_base_url: default_upload_base_url(),
            default_track: default_track(),
        }
    }
}

/// Local upload tool settings
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppStoreConfig {
    /// Override for the credential staging directory. When unset, the
    /// tool's conventional home-relative location is used.
    #[serde(default)]
    pub key_dir: Option<PathBuf>,
}

/// Event hub settings
#[derive(Debug, Clone, Deserialize)]
pub struct EventsConfig {
    /// Broadcast buffer capacity; slow subscribers beyond this lag.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://androidpublisher.googleapis.com/androidpublisher/v3".to_string()
}

fn default_upload_base_url() -> String {
    "https://androidpublisher.googleapis.com/upload/androidpublisher/v3".to_string()
}

fn default_track() -> String {
    "internal".to_string()
}

fn default_channel_capacity() -> usize {
    256
}

impl Config {
    /// Default configuration file location.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("storeship").join("config.toml"))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` when the file cannot be read or
    /// does not parse as valid configuration.
    pub async fn load(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path).await.map_err(|e| {
            Error::Config(ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        })?;

        toml::from_str(&content).map_err(|e| {
            Error::Config(ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        })
    }

    /// Load from an explicit path, from the default location when present,
    /// or fall back to built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error only when an existing file fails to parse; a
    /// missing default file is not an error.
    pub async fn load_or_default(explicit: Option<&Path>) -> Result<Self, Error> {
        if let Some(path) = explicit {
            return Self::load(path).await;
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path).await,
            _ => Ok(Self::default()),
        }
    }

    /// Merge environment variable overrides on top of the loaded values.
    pub fn merge_env(&mut self) {
        if let Ok(track) = std::env::var("STORESHIP_DEFAULT_TRACK") {
            if !track.is_empty() {
                self.playstore.default_track = track;
            }
        }
        if let Ok(dir) = std::env::var("STORESHIP_KEY_DIR") {
            if !dir.is_empty() {
                self.appstore.key_dir = Some(PathBuf::from(dir));
            }
        }
        if let Ok(api) = std::env::var("STORESHIP_API_BASE_URL") {
            if !api.is_empty() {
                self.playstore.api_base_url = api;
            }
        }
    }
}
