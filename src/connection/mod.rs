//! Connection lifecycle and channel subscription bookkeeping.
//!
//! The [`ConnectionManager`] owns the transport handle and the only map of
//! channel topic to [`SubscriptionState`]. A channel moves through:
//!
//! - `Unsubscribed -> Pending` when the subscribe request is sent
//! - `Pending -> Subscribed` when the transport acknowledges membership
//! - `Subscribed -> Unsubscribed` when the unsubscribe request is sent
//!
//! Unsubscribing a pending channel does nothing.

mod manager;

pub use manager::ConnectionManager;

use std::fmt;

/// Per-channel subscription state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SubscriptionState {
    #[default]
    Unsubscribed,
    Pending,
    Subscribed,
}

impl SubscriptionState {
    pub fn is_subscribed_or_pending(&self) -> bool {
        matches!(self, SubscriptionState::Pending | SubscriptionState::Subscribed)
    }
}

impl fmt::Display for SubscriptionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SubscriptionState::Unsubscribed => "unsubscribed",
            SubscriptionState::Pending => "pending",
            SubscriptionState::Subscribed => "subscribed",
        };
        f.write_str(s)
    }
}
