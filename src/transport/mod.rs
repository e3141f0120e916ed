//! Boundary to the publish/subscribe transport.
//!
//! The notification layer never touches sockets or wire framing. A transport
//! implementation owns the connection, delivers callbacks from its own worker,
//! and is created per connection by a [`TransportFactory`].

mod memory;

pub use memory::{ControlMessage, InMemoryTransport};

use crate::config::ConnectionParams;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Connection state reported by a transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    Connecting,
    Connected,
    Disconnecting,
    Disconnected,
    /// Wildcard for callback filtering. Never a real state.
    All,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Disconnecting => "disconnecting",
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::All => "all",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque error reported by a transport. Forwarded, never interpreted.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// `(old, new)` connection state.
pub type StateChangeHandler = Arc<dyn Fn(ConnectionState, ConnectionState) + Send + Sync>;

pub type TransportErrorHandler = Arc<dyn Fn(&TransportError) + Send + Sync>;

/// Called with the topic once the transport confirms membership.
pub type SubscribedHandler = Arc<dyn Fn(&str) + Send + Sync>;

/// `(wire_key, channel_topic, payload)` for every event on a bound key.
pub type InboundEventHandler = Arc<dyn Fn(&str, &str, &str) + Send + Sync>;

/// Callbacks installed on a transport when a connection starts.
#[derive(Clone)]
pub struct TransportHandlers {
    pub on_state_change: StateChangeHandler,
    pub on_error: TransportErrorHandler,
    pub on_subscribed: SubscribedHandler,
}

/// A managed publish/subscribe client.
///
/// Every method is a fire-and-forget request; outcomes arrive through the
/// installed [`TransportHandlers`]. Implementations must not hold internal
/// locks while invoking a handler, since handlers may call back into the
/// transport.
pub trait Transport: Send + Sync {
    /// Replace the installed callbacks.
    fn install(&self, handlers: TransportHandlers);

    fn connect(&self);

    fn disconnect(&self);

    fn state(&self) -> ConnectionState;

    /// Send a subscribe control message for `topic`.
    fn subscribe(&self, topic: &str);

    /// Send an unsubscribe control message for `topic`.
    fn unsubscribe(&self, topic: &str);

    /// Route events named `wire_key` to `handler`.
    fn bind(&self, wire_key: &str, handler: InboundEventHandler);
}

/// Creates a transport for one connection.
pub trait TransportFactory: Send + Sync {
    fn open(&self, params: &ConnectionParams) -> Arc<dyn Transport>;
}

impl<F> TransportFactory for F
where
    F: Fn(&ConnectionParams) -> Arc<dyn Transport> + Send + Sync,
{
    fn open(&self, params: &ConnectionParams) -> Arc<dyn Transport> {
        self(params)
    }
}
