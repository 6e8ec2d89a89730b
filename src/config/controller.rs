//! Controller connection configuration

use serde::{Deserialize, Serialize};

/// Connection settings for the proxy controller API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Base URL of the controller API (required)
    pub url: String,
    /// Bearer credential sent on every request; empty disables auth
    pub secret: String,
    /// Proxy group to monitor and switch
    pub group: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            secret: String::new(),
            group: "GLOBAL".to_string(),
        }
    }
}

impl ControllerConfig {
    /// Base URL with any trailing slash removed.
    pub fn trimmed_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// The bearer credential, or `None` when unset.
    pub fn secret(&self) -> Option<&str> {
        let trimmed = self.secret.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ControllerConfig::default();
        assert!(config.url.is_empty());
        assert_eq!(config.group, "GLOBAL");
        assert!(config.secret().is_none());
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = ControllerConfig {
            url: "http://127.0.0.1:9090/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.trimmed_url(), "http://127.0.0.1:9090");
    }

    #[test]
    fn test_blank_secret_is_none() {
        let config = ControllerConfig {
            secret: "   ".to_string(),
            ..Default::default()
        };
        assert!(config.secret().is_none());
    }
}
