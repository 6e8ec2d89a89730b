//! Controller API client.
//!
//! Thin client over the controller's HTTP surface: group delay measurement,
//! current-node lookup, single-node delay probes, and the switch operation.
//! One pooled client is created at startup and shared by reference for the
//! life of the process.

mod error;

pub use error::ControllerError;

use crate::config::ControllerConfig;
use crate::engine::parser::coerce_delay;
use reqwest::{Method, StatusCode, Url};
use serde_json::Value;
use std::time::Duration;

/// Client-wide timeout for controller calls that do not trigger measurements.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Headroom on top of the controller-side measurement timeout; delay queries
/// block server-side until every node has answered or timed out.
const DELAY_CALL_MARGIN: Duration = Duration::from_secs(10);

/// Client for the proxy controller API.
pub struct ControllerClient {
    client: reqwest::Client,
    base_url: Url,
    secret: Option<String>,
}

impl ControllerClient {
    /// Create a new controller client with a pooled HTTP transport.
    ///
    /// Controller traffic never follows proxy environment variables; any
    /// outbound proxying in helmsman is explicit via the probe tunnel.
    pub fn new(config: &ControllerConfig) -> Result<Self, ControllerError> {
        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(DEFAULT_TIMEOUT)
            .build()?;
        Self::with_client(config, client)
    }

    /// Create a controller client with a custom HTTP client (for testing).
    pub fn with_client(
        config: &ControllerConfig,
        client: reqwest::Client,
    ) -> Result<Self, ControllerError> {
        let base_url = Url::parse(config.trimmed_url())
            .map_err(|e| ControllerError::InvalidUrl(e.to_string()))?;
        Ok(Self {
            client,
            base_url,
            secret: config.secret().map(str::to_string),
        })
    }

    /// Fetch the raw group delay payload.
    ///
    /// `GET /group/{group}/delay?url={test_url}&timeout={timeout_ms}`
    pub async fn group_delays(
        &self,
        group: &str,
        test_url: &str,
        timeout_ms: u64,
    ) -> Result<Value, ControllerError> {
        let mut url = self.endpoint(&["group", group, "delay"])?;
        url.query_pairs_mut()
            .append_pair("url", test_url)
            .append_pair("timeout", &timeout_ms.to_string());
        self.request(
            Method::GET,
            url,
            None,
            Some(Duration::from_millis(timeout_ms) + DELAY_CALL_MARGIN),
        )
        .await
    }

    /// Fetch the currently active node of a group.
    ///
    /// `GET /proxies/{group}`, reading the `now` field. Returns `None` when
    /// the field is missing or empty.
    pub async fn current_proxy(&self, group: &str) -> Result<Option<String>, ControllerError> {
        let url = self.endpoint(&["proxies", group])?;
        let payload = self.request(Method::GET, url, None, None).await?;
        Ok(payload
            .get("now")
            .and_then(Value::as_str)
            .filter(|now| !now.is_empty())
            .map(str::to_string))
    }

    /// Measure one node's delay against a target URL.
    ///
    /// `GET /proxies/{name}/delay?url={target}&timeout={timeout_ms}`.
    /// Returns `None` when the response carries no usable delay.
    pub async fn proxy_delay(
        &self,
        name: &str,
        target_url: &str,
        timeout_ms: u64,
    ) -> Result<Option<u32>, ControllerError> {
        let mut url = self.endpoint(&["proxies", name, "delay"])?;
        url.query_pairs_mut()
            .append_pair("url", target_url)
            .append_pair("timeout", &timeout_ms.to_string());
        let payload = self
            .request(
                Method::GET,
                url,
                None,
                Some(Duration::from_millis(timeout_ms) + DELAY_CALL_MARGIN),
            )
            .await?;
        Ok(payload
            .get("delay")
            .and_then(coerce_delay)
            .and_then(|delay| u32::try_from(delay).ok()))
    }

    /// Switch the group's active node.
    ///
    /// `PUT /proxies/{group}` with body `{"name": name}`.
    pub async fn switch_proxy(&self, group: &str, name: &str) -> Result<(), ControllerError> {
        let url = self.endpoint(&["proxies", group])?;
        self.request(
            Method::PUT,
            url,
            Some(serde_json::json!({ "name": name })),
            None,
        )
        .await?;
        Ok(())
    }

    /// Join percent-encoded path segments onto the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ControllerError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ControllerError::InvalidUrl("URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn request(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
        timeout: Option<Duration>,
    ) -> Result<Value, ControllerError> {
        let mut request = self.client.request(method, url);
        if let Some(secret) = &self.secret {
            request = request.bearer_auth(secret);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(ControllerError::Status(status.as_u16()));
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Object(Default::default()));
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Object(Default::default()));
        }
        serde_json::from_str(&text).map_err(|e| ControllerError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ControllerConfig;

    fn config(url: &str) -> ControllerConfig {
        ControllerConfig {
            url: url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        let result = ControllerClient::new(&config("not a url"));
        assert!(matches!(result, Err(ControllerError::InvalidUrl(_))));
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = ControllerClient::new(&config("http://127.0.0.1:9090")).unwrap();
        let url = client.endpoint(&["proxies", "Fast Node/1"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9090/proxies/Fast%20Node%2F1");
    }

    #[test]
    fn test_endpoint_ignores_trailing_slash() {
        let client = ControllerClient::new(&config("http://127.0.0.1:9090/")).unwrap();
        let url = client.endpoint(&["proxies", "GLOBAL"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9090/proxies/GLOBAL");
    }
}
