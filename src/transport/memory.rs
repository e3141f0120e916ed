//! In-process transport.
//!
//! Records every control message and binding, and lets the caller drive the
//! connection: state changes, subscription acknowledgments, errors and
//! inbound events. In auto mode connects, disconnects and subscriptions
//! complete immediately.

use super::{
    ConnectionState, InboundEventHandler, Transport, TransportError, TransportFactory,
    TransportHandlers,
};
use crate::config::ConnectionParams;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// A control message sent to the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlMessage {
    Subscribe(String),
    Unsubscribe(String),
}

struct Inner {
    state: ConnectionState,
    handlers: Option<TransportHandlers>,
    bindings: HashMap<String, Vec<InboundEventHandler>>,
    /// Topics with an outstanding or confirmed subscribe.
    requested: HashSet<String>,
    sent: Vec<ControlMessage>,
    opened_with: Vec<ConnectionParams>,
    connect_calls: usize,
    disconnect_calls: usize,
}

pub struct InMemoryTransport {
    inner: Mutex<Inner>,
    auto: bool,
}

impl InMemoryTransport {
    /// Transport that only progresses when driven.
    pub fn new() -> Self {
        Self::with_mode(false)
    }

    /// Transport that completes every request immediately.
    pub fn auto() -> Self {
        Self::with_mode(true)
    }

    fn with_mode(auto: bool) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: ConnectionState::Disconnected,
                handlers: None,
                bindings: HashMap::new(),
                requested: HashSet::new(),
                sent: Vec::new(),
                opened_with: Vec::new(),
                connect_calls: 0,
                disconnect_calls: 0,
            }),
            auto,
        }
    }

    /// Factory that hands out this same transport and records the
    /// parameters it was opened with.
    pub fn factory(transport: &Arc<Self>) -> Arc<dyn TransportFactory> {
        let transport = Arc::clone(transport);
        Arc::new(move |params: &ConnectionParams| -> Arc<dyn Transport> {
            transport.inner.lock().opened_with.push(params.clone());
            Arc::clone(&transport) as Arc<dyn Transport>
        })
    }

    // --- Driving ---

    /// Move to `state`, notifying the state-change handler.
    pub fn set_state(&self, state: ConnectionState) {
        let (old, handlers) = {
            let mut inner = self.inner.lock();
            let old = inner.state;
            inner.state = state;
            (old, inner.handlers.clone())
        };

        if let Some(handlers) = handlers {
            (handlers.on_state_change)(old, state);
        }
    }

    /// Confirm membership of a requested topic. Returns false if the topic
    /// was never requested.
    pub fn acknowledge(&self, topic: &str) -> bool {
        let handlers = {
            let inner = self.inner.lock();
            if !inner.requested.contains(topic) {
                return false;
            }
            inner.handlers.clone()
        };

        if let Some(handlers) = handlers {
            (handlers.on_subscribed)(topic);
        }
        true
    }

    /// Report a transport error.
    pub fn fail(&self, error: TransportError) {
        let handlers = self.inner.lock().handlers.clone();
        if let Some(handlers) = handlers {
            (handlers.on_error)(&error);
        }
    }

    /// Deliver an inbound event to every handler bound to `wire_key`.
    /// Returns the number of handlers invoked.
    pub fn emit(&self, wire_key: &str, topic: &str, payload: &str) -> usize {
        let bound = self
            .inner
            .lock()
            .bindings
            .get(wire_key)
            .cloned()
            .unwrap_or_default();

        for handler in &bound {
            handler(wire_key, topic, payload);
        }
        bound.len()
    }

    // --- Inspection ---

    /// Control messages in the order they were sent.
    pub fn sent(&self) -> Vec<ControlMessage> {
        self.inner.lock().sent.clone()
    }

    pub fn subscribe_count(&self, topic: &str) -> usize {
        self.inner
            .lock()
            .sent
            .iter()
            .filter(|m| matches!(m, ControlMessage::Subscribe(t) if t == topic))
            .count()
    }

    pub fn is_bound(&self, wire_key: &str) -> bool {
        self.inner.lock().bindings.contains_key(wire_key)
    }

    pub fn binding_count(&self, wire_key: &str) -> usize {
        self.inner
            .lock()
            .bindings
            .get(wire_key)
            .map_or(0, Vec::len)
    }

    pub fn opened_with(&self) -> Vec<ConnectionParams> {
        self.inner.lock().opened_with.clone()
    }

    pub fn connect_calls(&self) -> usize {
        self.inner.lock().connect_calls
    }

    pub fn disconnect_calls(&self) -> usize {
        self.inner.lock().disconnect_calls
    }
}

impl Default for InMemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for InMemoryTransport {
    fn install(&self, handlers: TransportHandlers) {
        let mut inner = self.inner.lock();
        inner.handlers = Some(handlers);
        // A fresh connection starts with no bindings or memberships.
        inner.bindings.clear();
        inner.requested.clear();
    }

    fn connect(&self) {
        self.inner.lock().connect_calls += 1;
        self.set_state(ConnectionState::Connecting);
        if self.auto {
            self.set_state(ConnectionState::Connected);
        }
    }

    fn disconnect(&self) {
        self.inner.lock().disconnect_calls += 1;
        self.set_state(ConnectionState::Disconnecting);
        if self.auto {
            self.set_state(ConnectionState::Disconnected);
        }
    }

    fn state(&self) -> ConnectionState {
        self.inner.lock().state
    }

    fn subscribe(&self, topic: &str) {
        {
            let mut inner = self.inner.lock();
            inner.sent.push(ControlMessage::Subscribe(topic.to_string()));
            inner.requested.insert(topic.to_string());
        }
        if self.auto {
            self.acknowledge(topic);
        }
    }

    fn unsubscribe(&self, topic: &str) {
        let mut inner = self.inner.lock();
        inner.sent.push(ControlMessage::Unsubscribe(topic.to_string()));
        inner.requested.remove(topic);
    }

    fn bind(&self, wire_key: &str, handler: InboundEventHandler) {
        self.inner
            .lock()
            .bindings
            .entry(wire_key.to_string())
            .or_default()
            .push(handler);
    }
}
