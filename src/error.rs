//! Error types for the notification layer.

use crate::transport::TransportError;
use crate::types::ListenerId;
use thiserror::Error;

/// Main error type for notification operations.
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Invalid {kind} channel identifier: {reason}")]
    InvalidChannelIdentifier { kind: &'static str, reason: String },

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Listener {listener} failed: {message}")]
    Listener { listener: ListenerId, message: String },

    #[error("Listener buffer is full")]
    ListenerBufferFull,

    #[error("Listener receiver disconnected")]
    ListenerDisconnected,

    #[error("Unknown event category: {0}")]
    UnknownCategory(String),

    #[error("No platform configured")]
    PlatformNotConfigured,

    #[error("No transport factory configured")]
    TransportNotConfigured,

    #[error("Payload error: {0}")]
    Payload(String),
}

impl NotificationError {
    pub(crate) fn invalid_channel(kind: &'static str, reason: impl Into<String>) -> Self {
        NotificationError::InvalidChannelIdentifier {
            kind,
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for NotificationError {
    fn from(e: serde_json::Error) -> Self {
        NotificationError::Payload(e.to_string())
    }
}

/// Result type for notification operations.
pub type Result<T> = std::result::Result<T, NotificationError>;
