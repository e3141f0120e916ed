//! Registry of active listeners.

use super::types::{EventListener, ListenerFilter, ListenerRegistration};
use crate::types::{EventCategory, ListenerId};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// Insertion-ordered listener registrations, at most one per [`ListenerId`].
pub struct ListenerRegistry {
    registrations: RwLock<Vec<Arc<ListenerRegistration>>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self {
            registrations: RwLock::new(Vec::new()),
        }
    }

    /// Register a listener.
    ///
    /// If `id` is already registered the existing registration is returned
    /// and `listener` and `filter` are ignored.
    pub fn register(
        &self,
        id: impl Into<ListenerId>,
        listener: Arc<dyn EventListener>,
        filter: ListenerFilter,
    ) -> Arc<ListenerRegistration> {
        let id = id.into();
        let mut registrations = self.registrations.write();

        if let Some(existing) = registrations.iter().find(|r| *r.id() == id) {
            debug!(listener = %id, "Listener already registered");
            return Arc::clone(existing);
        }

        debug!(listener = %id, filter = ?filter, "Registering listener");
        let registration = Arc::new(ListenerRegistration::new(id, listener, filter));
        registrations.push(Arc::clone(&registration));
        registration
    }

    /// Register a listener with a custom matcher.
    pub fn register_with_predicate(
        &self,
        id: impl Into<ListenerId>,
        listener: Arc<dyn EventListener>,
        matcher: impl Fn(EventCategory) -> bool + Send + Sync + 'static,
    ) -> Arc<ListenerRegistration> {
        self.register(id, listener, ListenerFilter::predicate(matcher))
    }

    /// Register a listener receiving only `categories`.
    pub fn register_including(
        &self,
        id: impl Into<ListenerId>,
        listener: Arc<dyn EventListener>,
        categories: impl IntoIterator<Item = EventCategory>,
    ) -> Arc<ListenerRegistration> {
        self.register(id, listener, ListenerFilter::allow(categories))
    }

    /// Register a listener receiving everything except `categories`.
    pub fn register_excluding(
        &self,
        id: impl Into<ListenerId>,
        listener: Arc<dyn EventListener>,
        categories: impl IntoIterator<Item = EventCategory>,
    ) -> Arc<ListenerRegistration> {
        self.register(id, listener, ListenerFilter::deny(categories))
    }

    /// Remove a registration. Returns false if `id` was not registered.
    pub fn unregister(&self, id: &ListenerId) -> bool {
        let mut registrations = self.registrations.write();
        match registrations.iter().position(|r| r.id() == id) {
            Some(pos) => {
                registrations.remove(pos);
                debug!(listener = %id, "Unregistered listener");
                true
            }
            None => false,
        }
    }

    pub fn is_registered(&self, id: &ListenerId) -> bool {
        self.registrations.read().iter().any(|r| r.id() == id)
    }

    pub fn len(&self) -> usize {
        self.registrations.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.read().is_empty()
    }

    /// Remove every registration.
    pub fn clear(&self) {
        self.registrations.write().clear();
    }

    /// Current registrations in registration order.
    pub fn snapshot(&self) -> Vec<Arc<ListenerRegistration>> {
        self.registrations.read().clone()
    }
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listeners::types::ListenerResult;
    use crate::types::NotificationEvent;

    fn noop() -> Arc<dyn EventListener> {
        Arc::new(|_: &NotificationEvent| -> ListenerResult { Ok(()) })
    }

    #[test]
    fn test_register_unregister() {
        let registry = ListenerRegistry::new();
        let id = ListenerId::new("a");

        registry.register(id.clone(), noop(), ListenerFilter::Always);
        assert!(registry.is_registered(&id));
        assert_eq!(registry.len(), 1);

        assert!(registry.unregister(&id));
        assert!(!registry.is_registered(&id));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_first_registration_wins() {
        let registry = ListenerRegistry::new();

        let first = registry.register_including("a", noop(), [EventCategory::AssetMinted]);
        let second = registry.register_excluding("a", noop(), [EventCategory::AssetMinted]);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
        assert!(matches!(second.filter(), ListenerFilter::AllowList(_)));
    }

    #[test]
    fn test_generated_id_does_not_collide_with_named() {
        let registry = ListenerRegistry::new();
        for i in 1..=50 {
            registry.register(format!("#{}", i), noop(), ListenerFilter::Always);
        }

        let id = ListenerId::unique();
        let registration = registry.register(id.clone(), noop(), ListenerFilter::Always);

        assert_eq!(registry.len(), 51);
        assert_eq!(*registration.id(), id);
    }

    #[test]
    fn test_unregister_absent_is_noop() {
        let registry = ListenerRegistry::new();
        registry.register("a", noop(), ListenerFilter::Always);
        assert!(!registry.unregister(&ListenerId::new("b")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_snapshot_keeps_order() {
        let registry = ListenerRegistry::new();
        for name in ["c", "a", "b"] {
            registry.register(name, noop(), ListenerFilter::Always);
        }
        let ids: Vec<String> = registry
            .snapshot()
            .iter()
            .map(|r| r.id().to_string())
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }
}
