//! Alternative candidate search.

use super::snapshot::{DelaySnapshot, ProxyMeasurement};
use crate::controller::ControllerClient;

/// Cap on how many candidates are probed before giving up, bounding the cost
/// of the endpoint-verified search.
pub const PROBE_CANDIDATE_LIMIT: usize = 10;

/// First snapshot entry that is not the current node. The snapshot is
/// latency-sorted, so this is the fastest alternative.
pub fn find_alternative<'a>(
    snapshot: &'a DelaySnapshot,
    current: &str,
) -> Option<&'a ProxyMeasurement> {
    snapshot.entries().iter().find(|m| m.name != current)
}

/// Fastest alternative for which every configured endpoint is reachable,
/// verified through the controller's single-node delay probe.
///
/// Degrades to [`find_alternative`] when no endpoints are configured. At most
/// [`PROBE_CANDIDATE_LIMIT`] candidates are examined.
pub async fn find_reachable_alternative<'a>(
    client: &ControllerClient,
    snapshot: &'a DelaySnapshot,
    current: &str,
    endpoint_urls: &[String],
    timeout_ms: u64,
) -> Option<&'a ProxyMeasurement> {
    if endpoint_urls.is_empty() {
        return find_alternative(snapshot, current);
    }

    for candidate in snapshot
        .entries()
        .iter()
        .filter(|m| m.name != current)
        .take(PROBE_CANDIDATE_LIMIT)
    {
        if reachable_for_all(client, &candidate.name, endpoint_urls, timeout_ms).await {
            return Some(candidate);
        }
    }
    None
}

/// A candidate passes only when every endpoint probe succeeds; any probe
/// error or missing delay counts as unreachable.
async fn reachable_for_all(
    client: &ControllerClient,
    name: &str,
    endpoint_urls: &[String],
    timeout_ms: u64,
) -> bool {
    for target in endpoint_urls {
        match client.proxy_delay(name, target, timeout_ms).await {
            Ok(Some(_)) => {}
            Ok(None) | Err(_) => return false,
        }
    }
    true
}
