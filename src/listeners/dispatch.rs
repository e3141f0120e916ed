//! Inbound event dispatch.

use super::registry::ListenerRegistry;
use crate::error::NotificationError;
use crate::events;
use crate::handlers::HandlerSlots;
use crate::transport::InboundEventHandler;
use crate::types::NotificationEvent;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Turns raw transport events into notifications and delivers them.
pub struct Dispatcher {
    listeners: Arc<ListenerRegistry>,
    handlers: Arc<HandlerSlots>,
}

impl Dispatcher {
    pub fn new(listeners: Arc<ListenerRegistry>, handlers: Arc<HandlerSlots>) -> Self {
        Self {
            listeners,
            handlers,
        }
    }

    /// Wrap as a transport inbound-event callback.
    pub fn into_handler(self: Arc<Self>) -> InboundEventHandler {
        Arc::new(move |key: &str, channel: &str, payload: &str| {
            self.dispatch(key, channel, payload);
        })
    }

    /// Deliver one wire event. Returns how many listeners received it.
    ///
    /// Unknown keys are dropped. Listeners are called in registration order
    /// from a snapshot, with no lock held; a failing or panicking listener is
    /// reported to the error handler and delivery continues.
    pub fn dispatch(&self, wire_key: &str, channel: &str, payload: &str) -> usize {
        debug!(event = wire_key, channel, payload, "Received event");

        if self.listeners.is_empty() {
            debug!(event = wire_key, "No registered listener when event was received");
            return 0;
        }

        let def = events::lookup_by_key(wire_key);
        if def.category.is_unknown() {
            warn!(event = wire_key, channel, "Unknown event type");
            return 0;
        }

        let event = NotificationEvent::new(def.category, channel, payload);
        let mut delivered = 0;

        for registration in self.listeners.snapshot() {
            if !registration.matches(event.category()) {
                continue;
            }

            let outcome = catch_unwind(AssertUnwindSafe(|| {
                registration.listener().notification_received(&event)
            }));

            let message = match outcome {
                Ok(Ok(())) => {
                    delivered += 1;
                    continue;
                }
                Ok(Err(e)) => e.to_string(),
                Err(panic) => panic_message(panic.as_ref()),
            };

            error!(
                listener = %registration.id(),
                category = %event.category(),
                error = %message,
                "Listener failed"
            );
            self.handlers.fire_error(&NotificationError::Listener {
                listener: registration.id().clone(),
                message,
            });
        }

        delivered
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked".to_string()
    }
}
