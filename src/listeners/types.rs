//! Listener types.

use crate::types::{EventCategory, ListenerId, NotificationEvent};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Outcome of delivering one notification to a listener.
pub type ListenerResult = std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Receives notifications.
///
/// Called synchronously on the transport's worker; long-running work should
/// be handed off. Returning an error is reported through the service error
/// handler and does not stop delivery to other listeners.
///
/// The service owns its listeners. A listener that needs to call back into
/// the service must hold a [`Weak`](std::sync::Weak) reference: a strong
/// `Arc<NotificationService>` forms a cycle, so the service is never dropped
/// and its connection is never shut down.
pub trait EventListener: Send + Sync {
    fn notification_received(&self, event: &NotificationEvent) -> ListenerResult;
}

impl<F> EventListener for F
where
    F: Fn(&NotificationEvent) -> ListenerResult + Send + Sync,
{
    fn notification_received(&self, event: &NotificationEvent) -> ListenerResult {
        self(event)
    }
}

/// Which categories a listener receives.
#[derive(Clone, Default)]
pub enum ListenerFilter {
    /// Every category except `Unknown`.
    #[default]
    Always,
    AllowList(HashSet<EventCategory>),
    DenyList(HashSet<EventCategory>),
    Predicate(Arc<dyn Fn(EventCategory) -> bool + Send + Sync>),
}

impl ListenerFilter {
    pub fn allow(categories: impl IntoIterator<Item = EventCategory>) -> Self {
        ListenerFilter::AllowList(categories.into_iter().collect())
    }

    pub fn deny(categories: impl IntoIterator<Item = EventCategory>) -> Self {
        ListenerFilter::DenyList(categories.into_iter().collect())
    }

    pub fn predicate(matcher: impl Fn(EventCategory) -> bool + Send + Sync + 'static) -> Self {
        ListenerFilter::Predicate(Arc::new(matcher))
    }

    pub fn matches(&self, category: EventCategory) -> bool {
        match self {
            ListenerFilter::Always => !category.is_unknown(),
            ListenerFilter::AllowList(allowed) => allowed.contains(&category),
            ListenerFilter::DenyList(denied) => !denied.contains(&category),
            ListenerFilter::Predicate(matcher) => matcher(category),
        }
    }
}

impl fmt::Debug for ListenerFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListenerFilter::Always => f.write_str("Always"),
            ListenerFilter::AllowList(s) => f.debug_tuple("AllowList").field(s).finish(),
            ListenerFilter::DenyList(s) => f.debug_tuple("DenyList").field(s).finish(),
            ListenerFilter::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// An active listener and its filter.
pub struct ListenerRegistration {
    id: ListenerId,
    filter: ListenerFilter,
    listener: Arc<dyn EventListener>,
}

impl ListenerRegistration {
    pub(crate) fn new(id: ListenerId, listener: Arc<dyn EventListener>, filter: ListenerFilter) -> Self {
        Self {
            id,
            filter,
            listener,
        }
    }

    pub fn id(&self) -> &ListenerId {
        &self.id
    }

    pub fn filter(&self) -> &ListenerFilter {
        &self.filter
    }

    pub fn listener(&self) -> &Arc<dyn EventListener> {
        &self.listener
    }

    pub fn matches(&self, category: EventCategory) -> bool {
        self.filter.matches(category)
    }
}

impl fmt::Debug for ListenerRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistration")
            .field("id", &self.id)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}
