//! The switch/keep decision core.
//!
//! One [`SelectionEngine`] cycle gathers the current node, a delay snapshot,
//! and endpoint probe results, then walks a strict priority chain of decision
//! rules to produce a single [`SelectionVerdict`] with a human-auditable
//! reason. Collaborator failures are converted into absence of data at the
//! call site, so the chain itself only reasons about what is missing.

mod alternative;
pub mod filter;
pub mod parser;
mod snapshot;
mod verdict;

pub use alternative::{find_alternative, find_reachable_alternative, PROBE_CANDIDATE_LIMIT};
pub use parser::parse_group_delays;
pub use snapshot::{DelaySnapshot, ProxyMeasurement};
pub use verdict::{EndpointProbeResult, SelectionAction, SelectionVerdict};

use crate::config::{ProbeConfig, SelectionConfig};
use crate::controller::ControllerClient;
use crate::probe::EndpointProber;
use chrono::Utc;

/// Drives one decision cycle against the controller.
pub struct SelectionEngine<'a> {
    client: &'a ControllerClient,
    prober: &'a EndpointProber,
    selection: &'a SelectionConfig,
    probe: &'a ProbeConfig,
    group: &'a str,
}

impl<'a> SelectionEngine<'a> {
    pub fn new(
        client: &'a ControllerClient,
        prober: &'a EndpointProber,
        selection: &'a SelectionConfig,
        probe: &'a ProbeConfig,
        group: &'a str,
    ) -> Self {
        Self {
            client,
            prober,
            selection,
            probe,
            group,
        }
    }

    /// Fetch one delay payload and parse it into filtered and unfiltered
    /// snapshots. The payload is fetched once per cycle; the controller
    /// re-measures on every call, so the two variants must come from the
    /// same fetch. Controller errors degrade to empty snapshots.
    pub async fn fetch_snapshots(&self) -> (DelaySnapshot, DelaySnapshot) {
        let payload = match self
            .client
            .group_delays(
                self.group,
                &self.selection.test_url,
                self.selection.delay_timeout_ms,
            )
            .await
        {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, group = self.group, "group delay check failed");
                return (DelaySnapshot::default(), DelaySnapshot::default());
            }
        };

        let unfiltered = parse_group_delays(&payload, |_| false);
        let filtered = if self.selection.filter_regional {
            parse_group_delays(&payload, filter::is_excluded)
        } else {
            unfiltered.clone()
        };
        (filtered, unfiltered)
    }

    /// Run one full decision cycle. Returns `None` when no delay data is
    /// available at all; that is recoverable and retried next cycle.
    pub async fn evaluate(&self, dry_run: bool) -> Option<SelectionVerdict> {
        let current = match self.client.current_proxy(self.group).await {
            Ok(current) => current,
            Err(e) => {
                tracing::warn!(error = %e, group = self.group, "current proxy check failed");
                None
            }
        };

        let (mut candidates, unfiltered) = self.fetch_snapshots().await;
        if candidates.is_empty() && !unfiltered.is_empty() {
            tracing::warn!(
                group = self.group,
                "regional filter removed all candidates; falling back to unfiltered snapshot"
            );
            candidates = unfiltered.clone();
        }
        if candidates.is_empty() {
            tracing::warn!(group = self.group, "no delay data returned");
            return None;
        }

        // Current-node lookup is independent of the candidate filter.
        let current_delay = current
            .as_deref()
            .and_then(|name| unfiltered.delay_of(name));

        let endpoints = if self.probe.verification_enabled() {
            self.prober.verify_all(&self.probe.endpoint_urls).await
        } else {
            Vec::new()
        };

        let (target, reason) = self
            .decide(current.as_deref(), &candidates, current_delay, &endpoints)
            .await;

        let build = |action: SelectionAction, to: &ProxyMeasurement, error: Option<String>| {
            SelectionVerdict {
                action,
                from: current.clone(),
                to: to.name.clone(),
                from_delay_ms: current_delay,
                to_delay_ms: to.delay_ms,
                reason: reason.clone(),
                error,
                dry_run,
                endpoints: endpoints.clone(),
                checked_at: Utc::now(),
            }
        };

        match target {
            Some(alt) => {
                if dry_run {
                    tracing::info!(
                        from = current.as_deref().unwrap_or("unknown"),
                        to = %alt.name,
                        %reason,
                        "dry-run: switch not applied"
                    );
                    return Some(build(SelectionAction::WouldSwitch, alt, None));
                }
                match self.client.switch_proxy(self.group, &alt.name).await {
                    Ok(()) => {
                        tracing::info!(
                            from = current.as_deref().unwrap_or("unknown"),
                            to = %alt.name,
                            %reason,
                            "switched proxy"
                        );
                        Some(build(SelectionAction::Switched, alt, None))
                    }
                    Err(e) => {
                        tracing::error!(to = %alt.name, error = %e, "proxy switch failed");
                        Some(build(SelectionAction::SwitchFailed, alt, Some(e.to_string())))
                    }
                }
            }
            None => {
                let best = candidates.best()?;
                tracing::debug!(
                    current = current.as_deref().unwrap_or("unknown"),
                    %reason,
                    "keeping current proxy"
                );
                Some(build(SelectionAction::Kept, best, None))
            }
        }
    }

    /// The decision chain. First matching rule wins; rules are a strict
    /// priority order, not independent checks. Returns the switch target
    /// (`None` to keep) and the reason.
    async fn decide<'s>(
        &self,
        current: Option<&str>,
        candidates: &'s DelaySnapshot,
        current_delay: Option<u32>,
        endpoints: &[EndpointProbeResult],
    ) -> (Option<&'s ProxyMeasurement>, String) {
        let keep_threshold = self.selection.keep_delay_threshold_ms;
        let min_improvement = i64::from(self.selection.auto_select_diff_ms);

        // Rule 1: nothing to compare against.
        let Some(current) = current else {
            return (None, "current proxy not found".to_string());
        };

        // Rule 2: the active node fails endpoint verification. Prefer an
        // endpoint-verified alternative; failing that, switch to the fastest
        // plain alternative even though its reachability was never confirmed.
        if endpoints.iter().any(|r| !r.reachable) {
            let failed = endpoints
                .iter()
                .filter(|r| !r.reachable)
                .map(|r| r.url.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            if let Some(alt) = find_reachable_alternative(
                self.client,
                candidates,
                current,
                &self.probe.endpoint_urls,
                self.selection.delay_timeout_ms,
            )
            .await
            {
                return (
                    Some(alt),
                    format!("endpoints unreachable: {failed}; switch to endpoint-verified alternative"),
                );
            }
            return match find_alternative(candidates, current) {
                Some(alt) => (
                    Some(alt),
                    format!(
                        "endpoints unreachable: {failed}; fallback to fastest alternative without endpoint verification"
                    ),
                ),
                None => (
                    None,
                    "endpoints unreachable but no alternative proxy available".to_string(),
                ),
            };
        }

        // Rule 3: the current node is known but its delay is not.
        let Some(current_delay) = current_delay else {
            return (None, "current delay unavailable, keeping current".to_string());
        };

        // Rule 4: fast enough, regardless of how much faster others are.
        if current_delay <= keep_threshold {
            return (
                None,
                format!("endpoints ok, delay {current_delay}ms <= {keep_threshold}ms threshold"),
            );
        }

        // Rule 5: nowhere to go.
        let Some(alt) = find_alternative(candidates, current) else {
            return (None, "no alternative proxy available".to_string());
        };

        // Rule 6: the improvement must clear the configured bar.
        let improvement = i64::from(current_delay) - i64::from(alt.delay_ms);
        if improvement <= min_improvement {
            return (
                None,
                format!("delay {current_delay}ms > threshold but no significantly better option"),
            );
        }

        // Rule 7: no endpoints configured, the plain alternative wins.
        if self.probe.endpoint_urls.is_empty() {
            return (
                Some(alt),
                format!(
                    "delay {current_delay}ms > {keep_threshold}ms and best is {improvement}ms faster"
                ),
            );
        }

        // Rule 8: endpoints configured, so the target must also be verified.
        match find_reachable_alternative(
            self.client,
            candidates,
            current,
            &self.probe.endpoint_urls,
            self.selection.delay_timeout_ms,
        )
        .await
        {
            None => (
                None,
                format!("delay {current_delay}ms > threshold but no endpoint-verified alternative"),
            ),
            Some(verified) => {
                let improvement = i64::from(current_delay) - i64::from(verified.delay_ms);
                if improvement <= min_improvement {
                    (
                        None,
                        format!(
                            "delay {current_delay}ms > threshold but no sufficiently faster endpoint-verified alternative"
                        ),
                    )
                } else {
                    (
                        Some(verified),
                        format!(
                            "delay {current_delay}ms > {keep_threshold}ms and endpoint-verified best is {improvement}ms faster"
                        ),
                    )
                }
            }
        }
    }
}
