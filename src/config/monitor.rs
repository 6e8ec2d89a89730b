//! Monitor loop configuration

use serde::{Deserialize, Serialize};

/// Settings for the repeating monitor loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Seconds between decision cycles
    pub interval_seconds: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 300,
        }
    }
}
