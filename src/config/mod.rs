//! Configuration module for helmsman
//!
//! Provides layered configuration loading from files, environment variables,
//! and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`HELMSMAN_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! A `.env` file in the working directory is loaded into the process
//! environment before any of this runs (see `main`).

pub mod controller;
pub mod error;
pub mod logging;
pub mod monitor;
pub mod probe;
pub mod selection;

pub use controller::ControllerConfig;
pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use monitor::MonitorConfig;
pub use probe::ProbeConfig;
pub use selection::SelectionConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for helmsman.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HelmsmanConfig {
    /// Controller API connection
    pub controller: ControllerConfig,
    /// Decision thresholds
    pub selection: SelectionConfig,
    /// Endpoint verification
    pub probe: ProbeConfig,
    /// Monitor loop
    pub monitor: MonitorConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl HelmsmanConfig {
    /// Load configuration from a TOML file.
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides.
    ///
    /// Supports HELMSMAN_* environment variables for every setting.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(url) = env_trimmed("HELMSMAN_CONTROLLER_URL") {
            self.controller.url = url;
        }
        if let Some(secret) = env_trimmed("HELMSMAN_CONTROLLER_SECRET") {
            self.controller.secret = secret;
        }
        if let Some(group) = env_trimmed("HELMSMAN_PROXY_GROUP") {
            self.controller.group = group;
        }

        if let Some(test_url) = env_trimmed("HELMSMAN_TEST_URL") {
            self.selection.test_url = test_url;
        }
        if let Some(v) = env_trimmed("HELMSMAN_DELAY_TIMEOUT_MS") {
            if let Ok(n) = v.parse() {
                self.selection.delay_timeout_ms = n;
            }
        }
        if let Some(v) = env_trimmed("HELMSMAN_AUTO_SELECT_DIFF_MS") {
            if let Ok(n) = v.parse() {
                self.selection.auto_select_diff_ms = n;
            }
        }
        if let Some(v) = env_trimmed("HELMSMAN_KEEP_DELAY_THRESHOLD_MS") {
            if let Ok(n) = v.parse() {
                self.selection.keep_delay_threshold_ms = n;
            }
        }
        if let Some(v) = env_trimmed("HELMSMAN_FILTER_REGIONAL") {
            if let Some(b) = parse_bool(&v) {
                self.selection.filter_regional = b;
            }
        }

        if let Some(v) = env_trimmed("HELMSMAN_ENDPOINT_URLS") {
            self.probe.endpoint_urls = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(addr) = env_trimmed("HELMSMAN_PROXY_ADDR") {
            self.probe.proxy_addr = addr;
        }

        if let Some(v) = env_trimmed("HELMSMAN_MONITOR_INTERVAL_S") {
            if let Ok(n) = v.parse() {
                self.monitor.interval_seconds = n;
            }
        }

        if let Some(level) = env_trimmed("HELMSMAN_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(v) = env_trimmed("HELMSMAN_LOG_FORMAT") {
            if let Ok(f) = v.parse() {
                self.logging.format = f;
            }
        }

        self
    }

    /// Validate configuration. Runs at startup, before any decision logic.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.controller.url.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "controller.url".to_string(),
                message: "controller URL is required".to_string(),
            });
        }
        if self.selection.delay_timeout_ms == 0 {
            return Err(ConfigError::Validation {
                field: "selection.delay_timeout_ms".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.monitor.interval_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "monitor.interval_seconds".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if let Some(addr) = self.probe.proxy_addr() {
            let supported = ["http://", "https://", "socks5://", "socks5h://"];
            let lowered = addr.to_ascii_lowercase();
            if !supported.iter().any(|scheme| lowered.starts_with(scheme)) {
                return Err(ConfigError::Validation {
                    field: "probe.proxy_addr".to_string(),
                    message: format!("unsupported tunnel scheme in '{}'", addr),
                });
            }
        }
        Ok(())
    }
}

fn env_trimmed(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Accepts the usual truthy/falsy env spellings.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
