//! Error types for the social API transport.
//!
//! # Design
//! Every failure of a transport call lands in one `TransportError` so callers
//! have a single channel to surface. The client never classifies status
//! codes; `Http` carries the raw status and body and leaves the distinction
//! between 4xx and 5xx to whoever renders the failure.

/// Errors returned by `ApiClient` build/parse methods and by `TransportClient`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never produced a response (connect, timeout, body read).
    #[error("network error: {0}")]
    Network(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The 2xx response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl TransportError {
    /// HTTP status of the failed call, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Human-readable description without the status prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Http { body, .. } => body,
            Self::Network(msg) | Self::Serialization(msg) | Self::Deserialization(msg) => msg,
        }
    }
}

/// Errors raised while turning a `ClientConfig` into a client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("base URL must not be empty")]
    EmptyBaseUrl,

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// Timeout is zero or not a whole number of seconds.
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),

    /// The underlying HTTP client could not be constructed.
    #[error("failed to create HTTP client: {0}")]
    Client(String),
}
