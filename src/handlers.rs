//! Application-level observability callbacks.

use crate::error::NotificationError;
use parking_lot::RwLock;
use std::sync::Arc;

pub type ConnectedHandler = Arc<dyn Fn() + Send + Sync>;
pub type DisconnectedHandler = Arc<dyn Fn() + Send + Sync>;
pub type ErrorHandler = Arc<dyn Fn(&NotificationError) + Send + Sync>;

#[derive(Default)]
struct Slots {
    connected: Option<ConnectedHandler>,
    disconnected: Option<DisconnectedHandler>,
    error: Option<ErrorHandler>,
}

/// Optional connected/disconnected/error callbacks.
///
/// Handlers are cloned out of the lock before being called, so a handler may
/// replace itself or any other slot.
#[derive(Default)]
pub struct HandlerSlots {
    slots: RwLock<Slots>,
}

impl HandlerSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_connected(&self, handler: impl Fn() + Send + Sync + 'static) {
        self.slots.write().connected = Some(Arc::new(handler));
    }

    pub fn set_disconnected(&self, handler: impl Fn() + Send + Sync + 'static) {
        self.slots.write().disconnected = Some(Arc::new(handler));
    }

    pub fn set_error(&self, handler: impl Fn(&NotificationError) + Send + Sync + 'static) {
        self.slots.write().error = Some(Arc::new(handler));
    }

    pub(crate) fn fire_connected(&self) {
        let handler = self.slots.read().connected.clone();
        if let Some(handler) = handler {
            handler();
        }
    }

    pub(crate) fn fire_disconnected(&self) {
        let handler = self.slots.read().disconnected.clone();
        if let Some(handler) = handler {
            handler();
        }
    }

    pub(crate) fn fire_error(&self, error: &NotificationError) {
        let handler = self.slots.read().error.clone();
        if let Some(handler) = handler {
            handler(error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_unset_slots_are_noops() {
        let slots = HandlerSlots::new();
        slots.fire_connected();
        slots.fire_disconnected();
        slots.fire_error(&NotificationError::ListenerBufferFull);
    }

    #[test]
    fn test_handler_may_replace_itself() {
        let slots = Arc::new(HandlerSlots::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let inner_slots = Arc::clone(&slots);
        let c = Arc::clone(&calls);
        slots.set_connected(move || {
            c.fetch_add(1, Ordering::SeqCst);
            inner_slots.set_connected(|| {});
        });

        slots.fire_connected();
        slots.fire_connected();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
