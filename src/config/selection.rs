//! Selection thresholds and measurement settings

use serde::{Deserialize, Serialize};

/// Thresholds driving the switch/keep decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// URL the controller measures node delay against
    pub test_url: String,
    /// Controller-side measurement timeout per node
    pub delay_timeout_ms: u64,
    /// Minimum improvement over the current node before switching is worth it
    pub auto_select_diff_ms: u32,
    /// Keep the current node whenever its delay is at or below this
    pub keep_delay_threshold_ms: u32,
    /// Exclude regionally tagged nodes from automatic selection
    pub filter_regional: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            test_url: "https://google.com".to_string(),
            delay_timeout_ms: 3000,
            auto_select_diff_ms: 300,
            keep_delay_threshold_ms: 2000,
            filter_regional: true,
        }
    }
}
