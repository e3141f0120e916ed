//! Listener registration and event dispatch.
//!
//! Listeners register under a [`ListenerId`](crate::ListenerId) with a filter
//! deciding which event categories they receive:
//! - `Always`: every known category
//! - `AllowList`: only the listed categories
//! - `DenyList`: everything except the listed categories
//! - `Predicate`: a caller-supplied matcher
//!
//! Registering an id that is already registered returns the existing
//! registration untouched.
//!
//! # Example
//!
//! ```
//! use platform_notifications::listeners::{channel_listener, Dispatcher, ListenerRegistry};
//! use platform_notifications::{EventCategory, HandlerSlots};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(ListenerRegistry::new());
//! let (listener, receiver) = channel_listener(16);
//! registry.register_including("minted", listener, [EventCategory::AssetMinted]);
//!
//! let dispatcher = Dispatcher::new(Arc::clone(&registry), Arc::new(HandlerSlots::new()));
//! dispatcher.dispatch("Platform\\Events\\AssetMinted", "asset.mainnet.0xABC", "{}");
//!
//! let event = receiver.try_recv().unwrap();
//! assert_eq!(event.category(), EventCategory::AssetMinted);
//! ```

mod channel;
mod dispatch;
mod registry;
mod types;

pub use channel::{channel_listener, ChannelListener, NotificationReceiver};
pub use dispatch::Dispatcher;
pub use registry::ListenerRegistry;
pub use types::{EventListener, ListenerFilter, ListenerRegistration, ListenerResult};
