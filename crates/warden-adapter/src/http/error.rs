/*
[INPUT]:  Error sources (HTTP transport, remote status, JSON, process streams)
[OUTPUT]: Structured error types carrying remote status and partial results
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or changing the remote error mapping
*/

use reqwest::StatusCode;
use thiserror::Error;

use crate::container::ContainerProxy;

/// Main error type for the Warden adapter
#[derive(Error, Debug)]
pub enum WardenError {
    /// Network-level failure talking to the remote host
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Remote host answered with a non-success status
    #[error("Remote error (status {status}): {message}")]
    Remote { status: u16, message: String },

    /// Response body was not the JSON we expected
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Request body or query could not be encoded
    #[error("Failed to encode request: {0}")]
    Encode(serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// WebSocket error on a process stream
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Process stream reported a failure or closed early
    #[error("Process error: {0}")]
    Process(String),

    /// Container was created but applying its network rules failed.
    ///
    /// The proxy is handed back so the caller decides whether to destroy it.
    #[error("Container {} created but setup failed: {source}", .container.handle())]
    PartialCreate {
        container: Box<ContainerProxy>,
        source: Box<WardenError>,
    },
}

impl WardenError {
    /// Create a remote error from status code and message
    pub fn remote_error(status: StatusCode, message: impl Into<String>) -> Self {
        WardenError::Remote {
            status: status.as_u16(),
            message: message.into(),
        }
    }

    /// Remote status code, looking through partial-create wrappers
    pub fn status(&self) -> Option<u16> {
        match self {
            WardenError::Remote { status, .. } => Some(*status),
            WardenError::PartialCreate { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Check if the remote host reported the resource as missing
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND.as_u16())
    }

    /// Take the half-configured container out of a partial-create failure
    pub fn into_partial_container(self) -> Option<ContainerProxy> {
        match self {
            WardenError::PartialCreate { container, .. } => Some(*container),
            _ => None,
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for WardenError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        WardenError::WebSocket(err.to_string())
    }
}

/// Result type alias for Warden operations
pub type Result<T> = std::result::Result<T, WardenError>;
