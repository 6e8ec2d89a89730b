//! The decision output consumed by the output formatter.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// What a decision cycle did (or would have done).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionAction {
    /// The current node stays active
    Kept,
    /// The switch was applied
    Switched,
    /// Dry-run: the switch was decided but not applied
    WouldSwitch,
    /// The switch was decided but the controller call failed
    SwitchFailed,
}

/// Reachability of one configured endpoint through the active node.
/// `latency_ms` is `-1` when unreachable or the probe failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointProbeResult {
    pub url: String,
    pub reachable: bool,
    pub latency_ms: i64,
}

/// One cycle's switch/keep verdict. Immutable once produced.
///
/// For `kept` cycles, `to`/`to_delay_ms` carry the fastest known candidate;
/// for every other action `to` is the switch target and differs from `from`.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionVerdict {
    pub action: SelectionAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_delay_ms: Option<u32>,
    pub to_delay_ms: u32,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub dry_run: bool,
    pub endpoints: Vec<EndpointProbeResult>,
    pub checked_at: DateTime<Utc>,
}
