//! Endpoint probe configuration

use serde::{Deserialize, Serialize};

/// Endpoint verification settings. Verification is opt-in: it only runs when
/// both a tunnel address and at least one endpoint URL are configured.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// External endpoints that must stay reachable through the active node
    pub endpoint_urls: Vec<String>,
    /// Tunnel address probes are sent through (http, https, or socks5)
    pub proxy_addr: String,
}

impl ProbeConfig {
    /// The tunnel address, or `None` when unset.
    pub fn proxy_addr(&self) -> Option<&str> {
        let trimmed = self.proxy_addr.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// Whether direct endpoint verification of the active node can run.
    pub fn verification_enabled(&self) -> bool {
        !self.endpoint_urls.is_empty() && self.proxy_addr().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_by_default() {
        let config = ProbeConfig::default();
        assert!(!config.verification_enabled());
        assert!(config.proxy_addr().is_none());
    }

    #[test]
    fn test_urls_without_tunnel_stay_disabled() {
        let config = ProbeConfig {
            endpoint_urls: vec!["https://example.com".to_string()],
            proxy_addr: String::new(),
        };
        assert!(!config.verification_enabled());
    }

    #[test]
    fn test_enabled_with_both() {
        let config = ProbeConfig {
            endpoint_urls: vec!["https://example.com".to_string()],
            proxy_addr: "socks5://127.0.0.1:7890".to_string(),
        };
        assert!(config.verification_enabled());
    }
}
