//
//  gerrit-client
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! This module provides configuration management for the `gerrit` command.
//! It handles loading, saving, and accessing configuration settings from TOML
//! files stored in platform-specific directories.
//!
//! ## Overview
//!
//! - **Core Configuration**: request timeout, default output format and
//!   default host
//! - **Host Configuration**: per-host base URL, username and auth scheme
//!
//! Secrets are never written to the file; see [`crate::auth::KeyringStore`].
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/gerrit/config.toml`
//! - **macOS**: `~/Library/Application Support/gerrit/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\gerrit\config\config.toml`
//!
//! ## Example Configuration File
//!
//! ```toml
//! [core]
//! timeout_secs = 30
//! output = "table"
//! default_host = "review.example.com"
//!
//! [hosts."review.example.com"]
//! url = "https://review.example.com/"
//! username = "jdoe"
//! auth = "digest"
//! ```
//!
//! ## Submodules
//!
//! - [`file`]: Low-level configuration file I/O operations
//! - [`hosts`]: Host entries, auth schemes and client construction

mod file;
mod hosts;

pub use file::*;
pub use hosts::*;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Keys accepted by [`Config::get`] and [`Config::set`].
pub const CONFIG_KEYS: &[&str] = &["timeout_secs", "output", "default_host"];

/// Global configuration container.
///
/// # Examples
///
/// ```rust
/// use gerrit_client::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.core.timeout_secs, 30);
/// assert!(config.hosts.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub core: CoreConfig,

    /// Host entries keyed by [`normalize_host`] output.
    #[serde(default)]
    pub hosts: HashMap<String, HostConfig>,
}

/// Core configuration options.
///
/// | Field | Default |
/// |-------|---------|
/// | `timeout_secs` | `30` (`0` disables the timeout) |
/// | `output` | `"table"` |
/// | `default_host` | `None` |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Default output format: `"table"` or `"json"`.
    #[serde(default = "default_output")]
    pub output: String,

    /// Host used when neither `--host` nor `--url` is given.
    #[serde(default)]
    pub default_host: Option<String>,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_output() -> String {
    "table".to_string()
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            output: default_output(),
            default_host: None,
        }
    }
}

impl CoreConfig {
    /// The configured timeout, or `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl Config {
    /// Loads configuration from the default location.
    ///
    /// A missing file is not an error; defaults are returned.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be read or is not valid TOML.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads configuration from `path`.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !config_exists(path) {
            return Ok(Self::default());
        }
        let content = read_config_file(path)?;
        toml::from_str(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Saves the configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Saves the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        write_config_file(path, &content)
    }

    /// Returns the path to the configuration file.
    ///
    /// The file may not exist; this only returns where it would be.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", crate::APP_NAME)
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Returns the entry for `host`, normalizing the lookup key.
    pub fn host_config(&self, host: &str) -> Option<&HostConfig> {
        self.hosts.get(&normalize_host(host))
    }

    /// Inserts or replaces the entry for `host`.
    pub fn set_host(&mut self, host: &str, config: HostConfig) {
        self.hosts.insert(normalize_host(host), config);
    }

    /// Removes the entry for `host`, returning it if present.
    pub fn remove_host(&mut self, host: &str) -> Option<HostConfig> {
        let key = normalize_host(host);
        if self.core.default_host.as_deref() == Some(key.as_str()) {
            self.core.default_host = None;
        }
        self.hosts.remove(&key)
    }

    /// Gets a core configuration value by key.
    ///
    /// Returns `None` for unknown keys and unset optional values.
    ///
    /// ```rust
    /// use gerrit_client::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.get("output"), Some("table".to_string()));
    /// assert_eq!(config.get("default_host"), None);
    /// assert_eq!(config.get("editor"), None);
    /// ```
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "timeout_secs" => Some(self.core.timeout_secs.to_string()),
            "output" => Some(self.core.output.clone()),
            "default_host" => self.core.default_host.clone(),
            _ => None,
        }
    }

    /// Sets a core configuration value by key.
    ///
    /// Returns `Ok(false)` for unknown keys.
    ///
    /// # Errors
    ///
    /// Fails if the value is not valid for the key.
    pub fn set(&mut self, key: &str, value: &str) -> Result<bool> {
        match key {
            "timeout_secs" => {
                self.core.timeout_secs = value
                    .parse()
                    .with_context(|| format!("timeout_secs must be a whole number, got '{value}'"))?;
            }
            "output" => {
                if !matches!(value, "table" | "json") {
                    anyhow::bail!("output must be 'table' or 'json', got '{value}'");
                }
                self.core.output = value.to_string();
            }
            "default_host" => self.core.default_host = Some(normalize_host(value)),
            _ => return Ok(false),
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.core.output, "table");
        assert_eq!(config.core.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set("timeout_secs", "0").unwrap();
        config.set_host(
            "https://Review.Example.com/",
            HostConfig {
                url: "https://review.example.com/".to_string(),
                username: Some("jdoe".to_string()),
                auth: AuthScheme::Digest,
                cookie_name: None,
            },
        );
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.core.timeout(), None);
        let host = loaded.host_config("review.example.com").unwrap();
        assert_eq!(host.auth, AuthScheme::Digest);
        assert_eq!(host.username.as_deref(), Some("jdoe"));
    }

    #[test]
    fn test_parses_documented_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[core]
output = "json"

[hosts."review.example.com"]
url = "https://review.example.com/"
auth = "cookie"
cookie_name = "GerritAccount"
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.core.output, "json");
        assert_eq!(config.core.timeout_secs, 30);
        let host = config.host_config("review.example.com").unwrap();
        assert_eq!(host.auth, AuthScheme::Cookie);
        assert!(host.username.is_none());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[core\noutput = ").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_set_validates_values() {
        let mut config = Config::default();
        assert!(config.set("timeout_secs", "soon").is_err());
        assert!(config.set("output", "yaml").is_err());
        assert!(!config.set("editor", "vim").unwrap());
        assert!(config.set("default_host", "https://Review.Example.com/").unwrap());
        assert_eq!(config.get("default_host").as_deref(), Some("review.example.com"));
    }

    #[test]
    fn test_remove_default_host_clears_default() {
        let mut config = Config::default();
        config.set_host("review.example.com", HostConfig::new("https://review.example.com/"));
        config.set("default_host", "review.example.com").unwrap();
        assert!(config.remove_host("review.example.com").is_some());
        assert!(config.core.default_host.is_none());
    }
}
