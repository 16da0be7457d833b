//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/pinpod/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/pinpod/` (~/.config/pinpod/)
//! - State/Logs: `$XDG_STATE_HOME/pinpod/` (~/.local/state/pinpod/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// What the tracker observes on the page
    #[serde(default)]
    pub tracker: TrackerConfig,

    /// Analytics collection endpoint
    #[serde(default)]
    pub collector: CollectorConfig,

    /// Registration backend (optional)
    #[serde(default)]
    pub backend: BackendConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Page elements the tracker attaches observers to
#[derive(Debug, Deserialize, Clone)]
pub struct TrackerConfig {
    /// Element id of the early-access form
    #[serde(default = "default_form_id")]
    pub form_id: String,

    /// Form tag reported in form events
    #[serde(default = "default_form_name")]
    pub form_name: String,

    /// Section ids observed for visibility and used to locate clicks
    #[serde(default = "default_sections")]
    pub sections: Vec<String>,

    /// Hostnames whose events are mirrored to the log
    #[serde(default = "default_dev_hosts")]
    pub dev_hosts: Vec<String>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            form_id: default_form_id(),
            form_name: default_form_name(),
            sections: default_sections(),
            dev_hosts: default_dev_hosts(),
        }
    }
}

impl TrackerConfig {
    /// Check if a hostname is a local development host
    pub fn is_dev_host(&self, hostname: &str) -> bool {
        self.dev_hosts.iter().any(|h| h == hostname)
    }
}

fn default_form_id() -> String {
    "earlyAccessForm".to_string()
}

fn default_form_name() -> String {
    "early_access".to_string()
}

fn default_sections() -> Vec<String> {
    ["konsep", "fitur", "skenario", "bergabung"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_dev_hosts() -> Vec<String> {
    vec!["localhost".to_string(), "127.0.0.1".to_string()]
}

/// How events leave the process
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Queued delivery drained by a background worker
    #[default]
    Beacon,
    /// One request per event
    Fetch,
}

impl Transport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transport::Beacon => "beacon",
            Transport::Fetch => "fetch",
        }
    }
}

/// Analytics collection endpoint configuration
#[derive(Debug, Deserialize, Clone)]
pub struct CollectorConfig {
    /// Enable/disable event delivery
    #[serde(default)]
    pub enabled: bool,

    /// Origin the endpoint path is appended to (e.g., `https://pinpod.example.com`)
    pub base_url: Option<String>,

    /// Collection endpoint path
    #[serde(default = "default_collector_endpoint")]
    pub endpoint: String,

    /// Preferred transport
    #[serde(default)]
    pub transport: Transport,

    /// HTTP request timeout in seconds
    #[serde(default = "default_collector_timeout")]
    pub timeout_secs: u64,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: None,
            endpoint: default_collector_endpoint(),
            transport: Transport::default(),
            timeout_secs: default_collector_timeout(),
        }
    }
}

impl CollectorConfig {
    /// Check if delivery is enabled and has somewhere to go
    pub fn is_ready(&self) -> bool {
        self.enabled && self.base_url.is_some()
    }

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        if self.base_url.is_none() {
            return Err(Error::Config(
                "collector.base_url is required when collector is enabled".to_string(),
            ));
        }
        if !self.endpoint.starts_with('/') {
            return Err(Error::Config(
                "collector.endpoint must start with '/'".to_string(),
            ));
        }
        Ok(())
    }

    /// Full URL events are posted to
    pub fn endpoint_url(&self) -> Option<String> {
        self.base_url
            .as_deref()
            .map(|base| format!("{}{}", base.trim_end_matches('/'), self.endpoint))
    }
}

fn default_collector_endpoint() -> String {
    "/api/analytics".to_string()
}

fn default_collector_timeout() -> u64 {
    10
}

/// Registration backend configuration
///
/// The backend speaks the PostgREST dialect exposed by Supabase.
#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Project URL (e.g., `https://abcd.supabase.co`)
    pub url: Option<String>,

    /// Public anon key
    pub anon_key: Option<String>,

    #[serde(default = "default_users_table")]
    pub users_table: String,

    #[serde(default = "default_analytics_table")]
    pub analytics_table: String,

    #[serde(default = "default_feedback_table")]
    pub feedback_table: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_backend_timeout")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: None,
            anon_key: None,
            users_table: default_users_table(),
            analytics_table: default_analytics_table(),
            feedback_table: default_feedback_table(),
            timeout_secs: default_backend_timeout(),
        }
    }
}

impl BackendConfig {
    pub fn is_ready(&self) -> bool {
        self.enabled && self.url.is_some() && self.anon_key.is_some()
    }

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        if self.url.is_none() {
            return Err(Error::Config(
                "backend.url is required when backend is enabled".to_string(),
            ));
        }
        if self.anon_key.is_none() {
            return Err(Error::Config(
                "backend.anon_key is required when backend is enabled".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_users_table() -> String {
    "users".to_string()
}

fn default_analytics_table() -> String {
    "analytics".to_string()
}

fn default_feedback_table() -> String {
    "feedback".to_string()
}

fn default_backend_timeout() -> u64 {
    30
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/pinpod/config.toml` (~/.config/pinpod/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("pinpod").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/pinpod/` (~/.local/state/pinpod/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("pinpod")
    }

    /// Returns the log file path
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("pinpod.log")
    }
}
