//! Error types for controller API calls.

use thiserror::Error;

/// Errors that can occur while talking to the controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// The configured base URL does not parse
    #[error("invalid controller URL: {0}")]
    InvalidUrl(String),

    /// Request timeout
    #[error("request timeout")]
    Timeout,

    /// Connection failed
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The controller answered with an error status
    #[error("request failed: HTTP {0}")]
    Status(u16),

    /// Response body was not the expected JSON
    #[error("invalid response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ControllerError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ControllerError::Timeout
        } else {
            ControllerError::ConnectionFailed(e.to_string())
        }
    }
}
