//! Dashboard client configuration.
//!
//! Config file: ~/.config/sira/config.toml or /etc/sira/config.toml.
//! Environment variables override the file, CLI flags override everything.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_refresh_secs() -> u64 {
    30
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_list_limit() -> usize {
    5
}

/// Connection and refresh settings for the dashboard client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Base address of the tracking backend, no trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Auto-refresh period for the dashboard, in seconds.
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,

    /// Per-request timeout, in seconds. Bounds how long a hung backend can
    /// hold up one resource's contribution to a refresh.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// `limit` query parameter for the list endpoints.
    #[serde(default = "default_list_limit")]
    pub list_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            refresh_secs: default_refresh_secs(),
            timeout_secs: default_timeout_secs(),
            list_limit: default_list_limit(),
        }
    }
}

impl DashboardConfig {
    /// User config path: ~/.config/sira/config.toml
    pub fn user_config_path() -> Result<PathBuf> {
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            return Ok(Path::new(&xdg).join("sira").join("config.toml"));
        }
        let home = std::env::var("HOME").context("Cannot determine home directory")?;
        Ok(Path::new(&home).join(".config").join("sira").join("config.toml"))
    }

    /// System config path: /etc/sira/config.toml
    pub fn system_config_path() -> PathBuf {
        PathBuf::from("/etc/sira/config.toml")
    }

    /// Load configuration.
    ///
    /// Priority:
    /// 1. User config (~/.config/sira/config.toml)
    /// 2. System config (/etc/sira/config.toml)
    /// 3. Defaults
    ///
    /// `SIRA_BASE_URL` and `SIRA_REFRESH_SECS` override the loaded values.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        if let Ok(user_path) = Self::user_config_path() {
            if user_path.exists() {
                return Self::from_path(&user_path);
            }
        }

        let system_path = Self::system_config_path();
        if system_path.exists() {
            return Self::from_path(&system_path);
        }

        Ok(Self::default())
    }

    /// Parse a config file at an explicit path.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("SIRA_BASE_URL") {
            if !url.is_empty() {
                self.base_url = url;
            }
        }
        if let Ok(secs) = std::env::var("SIRA_REFRESH_SECS") {
            if let Ok(parsed) = secs.parse() {
                self.refresh_secs = parsed;
            }
        }
    }
}
