//! Integration tests for the notification service.

use parking_lot::Mutex;
use platform_notifications::transport::ControlMessage;
use platform_notifications::{
    channel_listener, ConnectionParams, EventCategory, EventListener, InMemoryTransport,
    ListenerId, ListenerResult, NotificationEvent, NotificationService, PlatformConfig,
    SubscriptionState, Transport, TransportFactory,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const MINTED: &str = "Platform\\Events\\AssetMinted";
const ASSET_TOPIC: &str = "asset.mainnet.0xABC";

fn platform() -> PlatformConfig {
    PlatformConfig::new("mainnet").with_pusher("app-key", "eu", true)
}

fn test_service(transport: &Arc<InMemoryTransport>) -> NotificationService {
    NotificationService::builder()
        .platform(platform())
        .transport_factory(InMemoryTransport::factory(transport))
        .build()
        .unwrap()
}

fn recorder() -> (Arc<dyn EventListener>, Arc<Mutex<Vec<NotificationEvent>>>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    let listener: Arc<dyn EventListener> = Arc::new(move |e: &NotificationEvent| -> ListenerResult {
        sink.lock().push(e.clone());
        Ok(())
    });
    (listener, log)
}

// --- Connection Lifecycle ---

#[test]
fn test_connection_lifecycle() {
    let transport = Arc::new(InMemoryTransport::auto());
    let service = test_service(&transport);

    let connected = Arc::new(AtomicUsize::new(0));
    let disconnected = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&connected);
    let d = Arc::clone(&disconnected);
    service.set_connected_handler(move || {
        c.fetch_add(1, Ordering::SeqCst);
    });
    service.set_disconnected_handler(move || {
        d.fetch_add(1, Ordering::SeqCst);
    });

    assert!(!service.is_connected());

    service.start();
    assert!(service.is_connected());
    assert_eq!(connected.load(Ordering::SeqCst), 1);

    service.shutdown();
    assert!(!service.is_connected());
    assert_eq!(disconnected.load(Ordering::SeqCst), 1);

    // Shutdown is idempotent from the caller's point of view.
    service.shutdown();
    assert!(!service.is_connected());
}

#[test]
fn test_connected_reported_on_transport_confirmation() {
    let transport = Arc::new(InMemoryTransport::new());
    let service = test_service(&transport);

    let connected = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&connected);
    service.set_connected_handler(move || {
        c.fetch_add(1, Ordering::SeqCst);
    });

    service.start();
    assert!(!service.is_connected());
    assert_eq!(connected.load(Ordering::SeqCst), 0);

    transport.set_state(platform_notifications::ConnectionState::Connected);
    assert!(service.is_connected());
    assert_eq!(connected.load(Ordering::SeqCst), 1);
}

#[test]
fn test_restart_tears_down_previous_connection() {
    let transport = Arc::new(InMemoryTransport::auto());
    let service = test_service(&transport);

    service.start();
    service.start();

    assert_eq!(transport.connect_calls(), 2);
    assert_eq!(transport.disconnect_calls(), 1);
    assert!(service.is_connected());
}

// --- Subscriptions ---

#[test]
fn test_restart_ignores_acknowledgment_from_old_transport() {
    let opened = Arc::new(Mutex::new(Vec::<Arc<InMemoryTransport>>::new()));
    let sink = Arc::clone(&opened);
    let factory: Arc<dyn TransportFactory> =
        Arc::new(move |_: &ConnectionParams| -> Arc<dyn Transport> {
            let transport = Arc::new(InMemoryTransport::new());
            sink.lock().push(Arc::clone(&transport));
            transport
        });
    let service = NotificationService::builder()
        .platform(platform())
        .transport_factory(factory)
        .build()
        .unwrap();

    service.start();
    service.subscribe_to_asset("0xABC").unwrap();
    service.start();
    service.subscribe_to_asset("0xABC").unwrap();

    let (old, new) = {
        let opened = opened.lock();
        (Arc::clone(&opened[0]), Arc::clone(&opened[1]))
    };
    old.acknowledge(ASSET_TOPIC);
    assert!(!service.is_subscribed_to_asset("0xABC").unwrap());
    assert_eq!(
        new.sent(),
        vec![ControlMessage::Subscribe(ASSET_TOPIC.to_string())]
    );

    new.acknowledge(ASSET_TOPIC);
    assert!(service.is_subscribed_to_asset("0xABC").unwrap());
}

#[test]
fn test_subscription_workflow() {
    let transport = Arc::new(InMemoryTransport::new());
    let service = test_service(&transport);
    service.start();

    service.subscribe_to_project(5).unwrap();
    service.subscribe_to_project(5).unwrap();
    assert_eq!(transport.subscribe_count("project.mainnet.5"), 1);
    assert!(!service.is_subscribed_to_project(5).unwrap());
    assert_eq!(
        service.connection().state_of("project.mainnet.5"),
        SubscriptionState::Pending
    );

    transport.acknowledge("project.mainnet.5");
    assert!(service.is_subscribed_to_project(5).unwrap());

    service.unsubscribe_from_project(5).unwrap();
    assert!(!service.is_subscribed_to_project(5).unwrap());
    assert_eq!(
        transport.sent(),
        vec![
            ControlMessage::Subscribe("project.mainnet.5".to_string()),
            ControlMessage::Unsubscribe("project.mainnet.5".to_string()),
        ]
    );
}

#[test]
fn test_all_channel_shapes() {
    let transport = Arc::new(InMemoryTransport::auto());
    let service = test_service(&transport);
    service.start();

    service.subscribe_to_project(1).unwrap();
    service.subscribe_to_player(1, "alice").unwrap();
    service.subscribe_to_asset("0xABC").unwrap();
    service.subscribe_to_wallet("0xWALLET").unwrap();

    assert!(service.is_subscribed_to_project(1).unwrap());
    assert!(service.is_subscribed_to_player(1, "alice").unwrap());
    assert!(service.is_subscribed_to_asset("0xABC").unwrap());
    assert!(service.is_subscribed_to_wallet("0xWALLET").unwrap());

    let topics: Vec<String> = transport
        .sent()
        .into_iter()
        .map(|m| match m {
            ControlMessage::Subscribe(t) | ControlMessage::Unsubscribe(t) => t,
        })
        .collect();
    assert_eq!(
        topics,
        vec![
            "project.mainnet.1",
            "player.mainnet.1.alice",
            "asset.mainnet.0xABC",
            "wallet.mainnet.0xWALLET",
        ]
    );

    service.unsubscribe_from_player(1, "alice").unwrap();
    service.unsubscribe_from_asset("0xABC").unwrap();
    service.unsubscribe_from_wallet("0xWALLET").unwrap();
    assert!(!service.is_subscribed_to_player(1, "alice").unwrap());
    assert!(!service.is_subscribed_to_asset("0xABC").unwrap());
    assert!(!service.is_subscribed_to_wallet("0xWALLET").unwrap());
    assert!(service.is_subscribed_to_project(1).unwrap());
}

#[test]
fn test_unsubscribe_never_subscribed_sends_nothing() {
    let transport = Arc::new(InMemoryTransport::auto());
    let service = test_service(&transport);
    service.start();

    service.unsubscribe_from_wallet("0x1").unwrap();
    assert!(transport.sent().is_empty());
    assert_eq!(
        service.connection().state_of("wallet.mainnet.0x1"),
        SubscriptionState::Unsubscribed
    );
}

#[test]
fn test_events_routed_before_acknowledgment() {
    // Keys are bound when the subscribe is sent, not when it is confirmed.
    let transport = Arc::new(InMemoryTransport::new());
    let service = test_service(&transport);
    service.start();

    let (listener, log) = recorder();
    service.register_listener("all", listener);

    service.subscribe_to_asset("0xABC").unwrap();
    assert!(!service.is_subscribed_to_asset("0xABC").unwrap());

    transport.emit(MINTED, ASSET_TOPIC, "{}");
    assert_eq!(log.lock().len(), 1);
}

// --- Dispatch ---

#[test]
fn test_asset_minted_dispatch() {
    let transport = Arc::new(InMemoryTransport::auto());
    let service = test_service(&transport);
    service.start();
    service.subscribe_to_asset("0xABC").unwrap();

    let (all, all_log) = recorder();
    let (minted, minted_log) = recorder();
    let (denied, denied_log) = recorder();
    let (matcher, matcher_log) = recorder();

    service.register_listener("all", all);
    service.register_listener_including_categories("minted", minted, [EventCategory::AssetMinted]);
    service.register_listener_excluding_categories("denied", denied, [EventCategory::AssetMinted]);
    service.register_listener_with_matcher("matcher", matcher, |c| {
        c == EventCategory::AssetMinted
    });

    transport.emit(MINTED, ASSET_TOPIC, "{...}");

    let expected = NotificationEvent::new(EventCategory::AssetMinted, ASSET_TOPIC, "{...}");
    assert_eq!(*all_log.lock(), vec![expected.clone()]);
    assert_eq!(*minted_log.lock(), vec![expected.clone()]);
    assert_eq!(*matcher_log.lock(), vec![expected]);
    assert!(denied_log.lock().is_empty());
}

#[test]
fn test_first_registration_wins_on_dispatch() {
    let transport = Arc::new(InMemoryTransport::auto());
    let service = test_service(&transport);
    service.start();
    service.subscribe_to_asset("0xABC").unwrap();

    let (listener, log) = recorder();
    let first = service.register_listener_including_categories(
        "l",
        Arc::clone(&listener),
        [EventCategory::AssetMelted],
    );
    let second = service.register_listener_including_categories(
        "l",
        listener,
        [EventCategory::AssetMinted],
    );
    assert!(Arc::ptr_eq(&first, &second));

    transport.emit(MINTED, ASSET_TOPIC, "{}");
    assert!(log.lock().is_empty());

    transport.emit("Platform\\Events\\AssetMelted", ASSET_TOPIC, "{}");
    assert_eq!(log.lock().len(), 1);
}

#[test]
fn test_unregistered_listener_stops_receiving() {
    let transport = Arc::new(InMemoryTransport::auto());
    let service = test_service(&transport);
    service.start();
    service.subscribe_to_wallet("0xW").unwrap();

    let (listener, log) = recorder();
    let id = ListenerId::new("wallet-watch");
    service.register_listener(id.clone(), listener);
    assert!(service.is_listener_registered(&id));

    transport.emit("Platform\\Events\\TradeCreated", "wallet.mainnet.0xW", "{}");
    service.unregister_listener(&id);
    assert!(!service.is_listener_registered(&id));
    transport.emit("Platform\\Events\\TradeCreated", "wallet.mainnet.0xW", "{}");

    assert_eq!(log.lock().len(), 1);
}

#[test]
fn test_channel_listener_receives_notifications() {
    let transport = Arc::new(InMemoryTransport::auto());
    let service = test_service(&transport);
    service.start();
    service.subscribe_to_player(9, "bob").unwrap();

    let (listener, receiver) = channel_listener(8);
    service.register_listener("queue", listener);

    transport.emit(
        "Platform\\Events\\PlayerLinked",
        "player.mainnet.9.bob",
        r#"{"player": {"id": "bob"}}"#,
    );

    let event = receiver.try_recv().unwrap();
    assert_eq!(event.category(), EventCategory::PlayerLinked);
    assert_eq!(event.channel(), "player.mainnet.9.bob");
    assert_eq!(event.payload_json().unwrap()["player"]["id"], "bob");

    transport.emit("Platform\\Events\\PlayerUpdated", "player.mainnet.9.bob", "{}");
    transport.emit("Platform\\Events\\PlayerUnlinked", "player.mainnet.9.bob", "{}");
    let categories: Vec<EventCategory> = receiver.drain().iter().map(|e| e.category()).collect();
    assert_eq!(
        categories,
        vec![EventCategory::PlayerUpdated, EventCategory::PlayerUnlinked]
    );
    assert!(receiver.is_empty());
}

#[test]
fn test_generated_listener_id_alongside_named_ids() {
    let transport = Arc::new(InMemoryTransport::auto());
    let service = test_service(&transport);
    service.start();
    service.subscribe_to_asset("0xABC").unwrap();

    for i in 1..=20 {
        let (listener, _) = recorder();
        service.register_listener(format!("#{}", i), listener);
    }
    let (listener, log) = recorder();
    let id = ListenerId::unique();
    service.register_listener(id.clone(), listener);

    assert_eq!(service.listeners().len(), 21);
    assert!(service.is_listener_registered(&id));

    transport.emit(MINTED, ASSET_TOPIC, "{}");
    assert_eq!(log.lock().len(), 1);
}

#[test]
fn test_listeners_delivered_in_registration_order() {
    let transport = Arc::new(InMemoryTransport::auto());
    let service = test_service(&transport);
    service.start();
    service.subscribe_to_project(1).unwrap();

    let order = Arc::new(Mutex::new(Vec::new()));
    for name in ["first", "second", "third"] {
        let order = Arc::clone(&order);
        service.register_listener(
            name,
            Arc::new(move |_: &NotificationEvent| -> ListenerResult {
                order.lock().push(name);
                Ok(())
            }),
        );
    }

    transport.emit("Platform\\Events\\ProjectUpdated", "project.mainnet.1", "{}");
    assert_eq!(*order.lock(), vec!["first", "second", "third"]);
}
