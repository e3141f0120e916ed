//! # Platform Notifications
//!
//! Real-time notifications for a remote platform over a managed
//! publish/subscribe connection.
//!
//! ## Core Concepts
//!
//! - **Events**: A static catalog mapping wire event keys to typed categories
//! - **Channels**: Deterministic topics for projects, players, assets and wallets
//! - **Listeners**: Filtered callbacks, at most one per listener id
//! - **Connection**: Transport lifecycle and per-channel subscription state
//!
//! ## Example
//!
//! ```
//! use platform_notifications::listeners::channel_listener;
//! use platform_notifications::transport::InMemoryTransport;
//! use platform_notifications::{EventCategory, NotificationService, PlatformConfig};
//! use std::sync::Arc;
//!
//! let transport = Arc::new(InMemoryTransport::auto());
//! let service = NotificationService::builder()
//!     .platform(PlatformConfig::new("mainnet").with_pusher("app-key", "eu", true))
//!     .transport_factory(InMemoryTransport::factory(&transport))
//!     .build()?;
//!
//! service.start();
//! service.subscribe_to_asset("0xABC")?;
//!
//! // Listen for mints only
//! let (listener, receiver) = channel_listener(64);
//! service.register_listener_including_categories("mints", listener, [EventCategory::AssetMinted]);
//!
//! transport.emit("Platform\\Events\\AssetMinted", "asset.mainnet.0xABC", "{}");
//! assert_eq!(receiver.try_recv().unwrap().category(), EventCategory::AssetMinted);
//! # Ok::<(), platform_notifications::NotificationError>(())
//! ```

pub mod channels;
pub mod config;
pub mod connection;
pub mod error;
pub mod events;
pub mod handlers;
pub mod listeners;
pub mod service;
pub mod transport;
pub mod types;

// Re-exports
pub use channels::Channel;
pub use config::{ConnectionParams, NotificationsConfig, PlatformConfig, PusherConfig, PusherOptions};
pub use connection::{ConnectionManager, SubscriptionState};
pub use error::{NotificationError, Result};
pub use events::EventTypeDefinition;
pub use handlers::HandlerSlots;
pub use listeners::{
    channel_listener, ChannelListener, Dispatcher, EventListener, ListenerFilter,
    ListenerRegistration, ListenerRegistry, ListenerResult, NotificationReceiver,
};
pub use service::{NotificationService, NotificationServiceBuilder};
pub use transport::{
    ConnectionState, InMemoryTransport, Transport, TransportError, TransportFactory,
    TransportHandlers,
};
pub use types::*;
