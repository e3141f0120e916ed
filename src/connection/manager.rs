//! Connection manager implementation.

use super::SubscriptionState;
use crate::channels::Channel;
use crate::config::{ConnectionParams, PlatformConfig};
use crate::error::NotificationError;
use crate::events;
use crate::handlers::HandlerSlots;
use crate::transport::{
    ConnectionState, InboundEventHandler, Transport, TransportError, TransportFactory,
    TransportHandlers,
};
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Subscription bookkeeping for the current transport.
#[derive(Default)]
struct SubscriptionBook {
    /// Topic to state. Absent means `Unsubscribed`.
    states: HashMap<String, SubscriptionState>,
    /// Wire keys already bound on the current transport.
    bound_keys: HashSet<String>,
    /// Bumped on every start. Callbacks from an older transport carry a
    /// stale value and are ignored.
    generation: u64,
}

/// Owns the transport and the channel subscription map.
///
/// No lock is held while calling into the transport, so transport callbacks
/// may arrive synchronously from inside any of these operations.
pub struct ConnectionManager {
    factory: Arc<dyn TransportFactory>,
    transport: RwLock<Option<Arc<dyn Transport>>>,
    book: Arc<Mutex<SubscriptionBook>>,
    handlers: Arc<HandlerSlots>,
    /// Bound to every event key relevant to a subscribed channel.
    inbound: InboundEventHandler,
}

impl ConnectionManager {
    /// Create a manager that opens transports through `factory`.
    pub fn new(
        factory: Arc<dyn TransportFactory>,
        handlers: Arc<HandlerSlots>,
        inbound: InboundEventHandler,
    ) -> Self {
        Self {
            factory,
            transport: RwLock::new(None),
            book: Arc::new(Mutex::new(SubscriptionBook::default())),
            handlers,
            inbound,
        }
    }

    // --- Lifecycle ---

    /// Tear down any previous connection and connect for `platform`.
    ///
    /// A platform without a complete notification block is not an error:
    /// there is simply nothing to start.
    pub fn start(&self, platform: &PlatformConfig) {
        self.shutdown();

        let Some(params) = ConnectionParams::from_platform(platform) else {
            debug!(network = %platform.network, "Notifications not configured for platform");
            return;
        };

        let transport = self.factory.open(&params);

        // A fresh transport has no memberships and no bindings.
        let generation = {
            let mut book = self.book.lock();
            let generation = book.generation + 1;
            *book = SubscriptionBook {
                generation,
                ..SubscriptionBook::default()
            };
            generation
        };

        transport.install(self.transport_handlers(generation));
        *self.transport.write() = Some(Arc::clone(&transport));

        info!(
            network = %platform.network,
            cluster = %params.cluster,
            encrypted = params.encrypted,
            "Starting notification client"
        );
        transport.connect();
    }

    /// Disconnect the current transport, if any.
    pub fn shutdown(&self) {
        if let Some(transport) = self.transport() {
            debug!("Shutting down notification client");
            transport.disconnect();
        }
    }

    /// Whether the current transport reports `Connected`.
    pub fn is_connected(&self) -> bool {
        self.transport()
            .is_some_and(|t| t.state() == ConnectionState::Connected)
    }

    /// Current transport handle (None before the first successful start).
    pub fn transport(&self) -> Option<Arc<dyn Transport>> {
        self.transport.read().clone()
    }

    fn transport_handlers(&self, generation: u64) -> TransportHandlers {
        let handlers = Arc::clone(&self.handlers);
        let on_state_change = Arc::new(move |old: ConnectionState, new: ConnectionState| {
            if new != ConnectionState::All {
                info!(from = %old, to = %new, "Notification client {}", new);
            }

            match new {
                ConnectionState::Connected => handlers.fire_connected(),
                ConnectionState::Disconnected => handlers.fire_disconnected(),
                _ => {}
            }
        });

        let handlers = Arc::clone(&self.handlers);
        let on_error = Arc::new(move |e: &TransportError| {
            error!(error = %e, "Error on notification client");
            handlers.fire_error(&NotificationError::Transport(e.clone()));
        });

        let book = Arc::clone(&self.book);
        let on_subscribed = Arc::new(move |topic: &str| {
            let mut book = book.lock();
            if book.generation != generation {
                debug!(channel = topic, "Ignoring acknowledgment from a replaced transport");
                return;
            }
            if let Some(state) = book.states.get_mut(topic) {
                if *state == SubscriptionState::Pending {
                    *state = SubscriptionState::Subscribed;
                    debug!(channel = topic, "Subscription confirmed");
                }
            }
        });

        TransportHandlers {
            on_state_change,
            on_error,
            on_subscribed,
        }
    }

    // --- Subscriptions ---

    /// Subscribe to `channel` and bind its family's event keys.
    ///
    /// Does nothing without a transport or when the channel is already
    /// pending or subscribed. Keys are bound right away rather than on
    /// acknowledgment, each key at most once per transport.
    pub fn subscribe(&self, channel: &Channel) {
        let Some(transport) = self.transport() else {
            debug!(channel = %channel, "Subscribe ignored, notification client not started");
            return;
        };

        let keys: Vec<String> = {
            let mut book = self.book.lock();
            let state = book.states.entry(channel.topic().to_string()).or_default();
            if state.is_subscribed_or_pending() {
                return;
            }
            *state = SubscriptionState::Pending;

            let mut keys = Vec::new();
            for def in events::filter_by_channel_families([channel.family()]) {
                if book.bound_keys.insert(def.wire_key.clone()) {
                    keys.push(def.wire_key.clone());
                }
            }
            keys
        };

        debug!(channel = %channel, new_bindings = keys.len(), "Subscribing");
        transport.subscribe(channel.topic());
        for key in &keys {
            transport.bind(key, Arc::clone(&self.inbound));
        }
    }

    /// Unsubscribe from `channel`. Only acts on subscribed channels.
    pub fn unsubscribe(&self, channel: &Channel) {
        let Some(transport) = self.transport() else {
            return;
        };

        {
            let mut book = self.book.lock();
            if book.states.get(channel.topic()) != Some(&SubscriptionState::Subscribed) {
                return;
            }
            book.states.remove(channel.topic());
        }

        debug!(channel = %channel, "Unsubscribing");
        transport.unsubscribe(channel.topic());
    }

    /// State of `topic`; untracked topics are `Unsubscribed`.
    pub fn state_of(&self, topic: &str) -> SubscriptionState {
        self.book
            .lock()
            .states
            .get(topic)
            .copied()
            .unwrap_or_default()
    }

    /// Whether the transport has confirmed `channel`.
    pub fn is_subscribed(&self, channel: &Channel) -> bool {
        self.state_of(channel.topic()) == SubscriptionState::Subscribed
    }

    /// Whether a subscribe for `channel` was sent and not undone.
    pub fn is_subscribed_or_pending(&self, channel: &Channel) -> bool {
        self.state_of(channel.topic()).is_subscribed_or_pending()
    }

    /// Snapshot of every tracked topic and its state.
    pub fn subscriptions(&self) -> HashMap<String, SubscriptionState> {
        self.book.lock().states.clone()
    }
}
