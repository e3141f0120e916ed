//! Main NotificationService struct tying all components together.

use crate::channels::Channel;
use crate::config::PlatformConfig;
use crate::connection::ConnectionManager;
use crate::error::{NotificationError, Result};
use crate::handlers::HandlerSlots;
use crate::listeners::{
    Dispatcher, EventListener, ListenerFilter, ListenerRegistration, ListenerRegistry,
};
use crate::transport::TransportFactory;
use crate::types::{EventCategory, ListenerId};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// The notification service.
///
/// Provides a unified interface for:
/// - Starting and stopping the platform connection
/// - Subscribing to project, player, asset and wallet channels
/// - Registering listeners for typed notifications
/// - Observing connection state and errors
pub struct NotificationService {
    /// Platform the service connects for.
    platform: RwLock<Option<PlatformConfig>>,

    /// Transport and subscription bookkeeping.
    connection: ConnectionManager,

    /// Active listeners (shared with the dispatcher).
    listeners: Arc<ListenerRegistry>,

    /// Application callbacks (shared with the dispatcher and transport).
    handlers: Arc<HandlerSlots>,
}

impl NotificationService {
    /// Start building a service.
    pub fn builder() -> NotificationServiceBuilder {
        NotificationServiceBuilder::default()
    }

    /// Create a service that opens transports through `factory`.
    pub fn new(factory: Arc<dyn TransportFactory>, platform: Option<PlatformConfig>) -> Self {
        let listeners = Arc::new(ListenerRegistry::new());
        let handlers = Arc::new(HandlerSlots::new());
        let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&listeners), Arc::clone(&handlers)));
        let connection =
            ConnectionManager::new(factory, Arc::clone(&handlers), dispatcher.into_handler());

        Self {
            platform: RwLock::new(platform),
            connection,
            listeners,
            handlers,
        }
    }

    // --- Lifecycle ---

    /// Connect for the configured platform.
    ///
    /// Does nothing if no platform is set or the platform has notifications
    /// disabled.
    pub fn start(&self) {
        let platform = self.platform.read().clone();
        match platform {
            Some(platform) => self.connection.start(&platform),
            None => debug!("No platform configured, notification service not started"),
        }
    }

    /// Replace the platform and connect for it.
    pub fn start_with(&self, platform: PlatformConfig) {
        *self.platform.write() = Some(platform);
        self.start();
    }

    /// Disconnect the current transport, if any.
    pub fn shutdown(&self) {
        self.connection.shutdown();
    }

    /// Whether the transport reports `Connected`.
    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    /// The platform the service connects for.
    pub fn platform(&self) -> Option<PlatformConfig> {
        self.platform.read().clone()
    }

    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    pub fn listeners(&self) -> &Arc<ListenerRegistry> {
        &self.listeners
    }

    // --- Handlers ---

    /// Called when the transport reports `Connected`.
    pub fn set_connected_handler(&self, handler: impl Fn() + Send + Sync + 'static) {
        self.handlers.set_connected(handler);
    }

    /// Called when the transport reports `Disconnected`.
    pub fn set_disconnected_handler(&self, handler: impl Fn() + Send + Sync + 'static) {
        self.handlers.set_disconnected(handler);
    }

    /// Receives transport errors and listener failures.
    pub fn set_error_handler(
        &self,
        handler: impl Fn(&NotificationError) + Send + Sync + 'static,
    ) {
        self.handlers.set_error(handler);
    }

    // --- Listeners ---

    /// Register a listener receiving every known category.
    pub fn register_listener(
        &self,
        id: impl Into<ListenerId>,
        listener: Arc<dyn EventListener>,
    ) -> Arc<ListenerRegistration> {
        self.listeners.register(id, listener, ListenerFilter::Always)
    }

    /// Register a listener receiving the categories `matcher` accepts.
    pub fn register_listener_with_matcher(
        &self,
        id: impl Into<ListenerId>,
        listener: Arc<dyn EventListener>,
        matcher: impl Fn(EventCategory) -> bool + Send + Sync + 'static,
    ) -> Arc<ListenerRegistration> {
        self.listeners.register_with_predicate(id, listener, matcher)
    }

    /// Register a listener receiving only `categories`.
    pub fn register_listener_including_categories(
        &self,
        id: impl Into<ListenerId>,
        listener: Arc<dyn EventListener>,
        categories: impl IntoIterator<Item = EventCategory>,
    ) -> Arc<ListenerRegistration> {
        self.listeners.register_including(id, listener, categories)
    }

    /// Register a listener receiving everything except `categories`.
    pub fn register_listener_excluding_categories(
        &self,
        id: impl Into<ListenerId>,
        listener: Arc<dyn EventListener>,
        categories: impl IntoIterator<Item = EventCategory>,
    ) -> Arc<ListenerRegistration> {
        self.listeners.register_excluding(id, listener, categories)
    }

    /// Remove a listener. Unknown ids are ignored.
    pub fn unregister_listener(&self, id: &ListenerId) {
        self.listeners.unregister(id);
    }

    /// Whether `id` is currently registered.
    pub fn is_listener_registered(&self, id: &ListenerId) -> bool {
        self.listeners.is_registered(id)
    }

    // --- Channels ---

    fn network(&self) -> Result<String> {
        self.platform
            .read()
            .as_ref()
            .map(|p| p.network.clone())
            .ok_or(NotificationError::PlatformNotConfigured)
    }

    /// Project channel on the configured platform.
    pub fn project_channel(&self, project_id: i64) -> Result<Channel> {
        Channel::project(&self.network()?, project_id)
    }

    pub fn player_channel(&self, project_id: i64, player_id: &str) -> Result<Channel> {
        Channel::player(&self.network()?, project_id, player_id)
    }

    pub fn asset_channel(&self, asset_id: &str) -> Result<Channel> {
        Channel::asset(&self.network()?, asset_id)
    }

    pub fn wallet_channel(&self, address: &str) -> Result<Channel> {
        Channel::wallet(&self.network()?, address)
    }

    /// Subscribe to a project's channel.
    pub fn subscribe_to_project(&self, project_id: i64) -> Result<()> {
        self.connection.subscribe(&self.project_channel(project_id)?);
        Ok(())
    }

    /// Unsubscribe from a project's channel.
    pub fn unsubscribe_from_project(&self, project_id: i64) -> Result<()> {
        self.connection.unsubscribe(&self.project_channel(project_id)?);
        Ok(())
    }

    /// Whether the project channel is confirmed subscribed.
    pub fn is_subscribed_to_project(&self, project_id: i64) -> Result<bool> {
        Ok(self.connection.is_subscribed(&self.project_channel(project_id)?))
    }

    /// Subscribe to a player's channel within a project.
    pub fn subscribe_to_player(&self, project_id: i64, player_id: &str) -> Result<()> {
        self.connection
            .subscribe(&self.player_channel(project_id, player_id)?);
        Ok(())
    }

    /// Unsubscribe from a player's channel.
    pub fn unsubscribe_from_player(&self, project_id: i64, player_id: &str) -> Result<()> {
        self.connection
            .unsubscribe(&self.player_channel(project_id, player_id)?);
        Ok(())
    }

    /// Whether the player channel is confirmed subscribed.
    pub fn is_subscribed_to_player(&self, project_id: i64, player_id: &str) -> Result<bool> {
        Ok(self
            .connection
            .is_subscribed(&self.player_channel(project_id, player_id)?))
    }

    /// Subscribe to an asset's channel.
    pub fn subscribe_to_asset(&self, asset_id: &str) -> Result<()> {
        self.connection.subscribe(&self.asset_channel(asset_id)?);
        Ok(())
    }

    /// Unsubscribe from an asset's channel.
    pub fn unsubscribe_from_asset(&self, asset_id: &str) -> Result<()> {
        self.connection.unsubscribe(&self.asset_channel(asset_id)?);
        Ok(())
    }

    /// Whether the asset channel is confirmed subscribed.
    pub fn is_subscribed_to_asset(&self, asset_id: &str) -> Result<bool> {
        Ok(self.connection.is_subscribed(&self.asset_channel(asset_id)?))
    }

    /// Subscribe to a wallet's channel.
    pub fn subscribe_to_wallet(&self, address: &str) -> Result<()> {
        self.connection.subscribe(&self.wallet_channel(address)?);
        Ok(())
    }

    /// Unsubscribe from a wallet's channel.
    pub fn unsubscribe_from_wallet(&self, address: &str) -> Result<()> {
        self.connection.unsubscribe(&self.wallet_channel(address)?);
        Ok(())
    }

    /// Whether the wallet channel is confirmed subscribed.
    pub fn is_subscribed_to_wallet(&self, address: &str) -> Result<bool> {
        Ok(self.connection.is_subscribed(&self.wallet_channel(address)?))
    }
}

impl Drop for NotificationService {
    fn drop(&mut self) {
        self.connection.shutdown();
        self.listeners.clear();
    }
}

/// Builder for [`NotificationService`].
#[derive(Default)]
pub struct NotificationServiceBuilder {
    platform: Option<PlatformConfig>,
    factory: Option<Arc<dyn TransportFactory>>,
}

impl NotificationServiceBuilder {
    pub fn platform(mut self, platform: PlatformConfig) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn transport_factory(mut self, factory: Arc<dyn TransportFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Fails with `TransportNotConfigured` when no factory was given.
    pub fn build(self) -> Result<NotificationService> {
        let factory = self.factory.ok_or(NotificationError::TransportNotConfigured)?;
        Ok(NotificationService::new(factory, self.platform))
    }
}
