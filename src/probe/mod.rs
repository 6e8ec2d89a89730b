//! Endpoint reachability probing through the active tunnel.
//!
//! Probes are lightweight HEAD existence checks issued through the configured
//! tunnel address, one concurrent task per URL. Each task owns its output
//! slot; [`futures::future::join_all`] is the only synchronization point and
//! keeps result order aligned with input order.

use crate::config::ProbeConfig;
use crate::engine::EndpointProbeResult;
use futures::future::join_all;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Fixed per-probe timeout; probes are existence checks, not measurements.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors building the probe client at startup.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("invalid tunnel address: {0}")]
    InvalidProxyAddr(String),

    #[error("failed to build probe client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Probes configured endpoints through the tunnel address. Without a tunnel
/// address the prober is inert and reports no results.
pub struct EndpointProber {
    client: Option<reqwest::Client>,
}

impl EndpointProber {
    /// Build the proxied probe client once; it is reused for every probe.
    pub fn new(config: &ProbeConfig) -> Result<Self, ProbeError> {
        let Some(addr) = config.proxy_addr() else {
            return Ok(Self { client: None });
        };
        let proxy =
            reqwest::Proxy::all(addr).map_err(|e| ProbeError::InvalidProxyAddr(e.to_string()))?;
        let client = reqwest::Client::builder()
            .proxy(proxy)
            .timeout(PROBE_TIMEOUT)
            .build()?;
        Ok(Self {
            client: Some(client),
        })
    }

    /// Probe every URL concurrently and wait for all of them. Returns an
    /// empty sequence when verification is not configured.
    pub async fn verify_all(&self, urls: &[String]) -> Vec<EndpointProbeResult> {
        let Some(client) = &self.client else {
            return Vec::new();
        };
        if urls.is_empty() {
            return Vec::new();
        }
        join_all(urls.iter().map(|url| probe_endpoint(client, url))).await
    }
}

/// One probe: reachable means any response with status below 500 arrived
/// within the timeout. Failures of any kind yield `latency_ms = -1` instead
/// of aborting the batch.
async fn probe_endpoint(client: &reqwest::Client, url: &str) -> EndpointProbeResult {
    let start = Instant::now();
    match client.head(url).send().await {
        Ok(response) if response.status().as_u16() < 500 => EndpointProbeResult {
            url: url.to_string(),
            reachable: true,
            latency_ms: start.elapsed().as_millis() as i64,
        },
        Ok(_) | Err(_) => EndpointProbeResult {
            url: url.to_string(),
            reachable: false,
            latency_ms: -1,
        },
    }
}
