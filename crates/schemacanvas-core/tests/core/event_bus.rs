use schemacanvas_core::{
    EventBus, EventBusConfig, EventBusError, EventCategory, EventFilter, ObjectId, SceneEvent,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn test_publish_without_listeners() {
    let bus = EventBus::new();
    assert!(matches!(
        bus.publish(SceneEvent::LayersChanged),
        Err(EventBusError::NoSubscribers)
    ));
}

#[test]
fn test_handlers_receive_matching_events() {
    let bus = EventBus::new();
    let moves = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&moves);
    bus.subscribe(
        EventFilter::Categories(vec![EventCategory::Movement]),
        move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        },
    );

    bus.publish(SceneEvent::ObjectsMoved { settled: false }).unwrap();
    bus.publish(SceneEvent::ObjectModified {
        object: ObjectId(3),
    })
    .unwrap();
    bus.publish(SceneEvent::LayersChanged).unwrap();

    assert_eq!(moves.load(Ordering::SeqCst), 2);
    assert_eq!(bus.subscriber_count(), 1);
}

#[test]
fn test_history_is_bounded() {
    let bus = EventBus::with_config(EventBusConfig {
        enable_history: true,
        max_history_size: 3,
        ..Default::default()
    });
    let _rx = bus.receiver();

    for _ in 0..5 {
        bus.publish(SceneEvent::ActiveLayersChanged).unwrap();
    }
    assert_eq!(bus.history().len(), 3);

    bus.clear_history();
    assert!(bus.history().is_empty());
}

#[test]
fn test_history_keeps_newest_in_order() {
    let bus = EventBus::with_config(EventBusConfig {
        enable_history: true,
        max_history_size: 2,
        ..Default::default()
    });

    // recorded even with nobody listening
    let _ = bus.publish(SceneEvent::LayersChanged);
    let _ = bus.publish(SceneEvent::ObjectsMoved { settled: false });
    let _ = bus.publish(SceneEvent::ObjectsMoved { settled: true });

    assert_eq!(
        bus.history(),
        vec![
            SceneEvent::ObjectsMoved { settled: false },
            SceneEvent::ObjectsMoved { settled: true },
        ]
    );

    let quiet = EventBus::new();
    let _rx = quiet.receiver();
    quiet.publish(SceneEvent::LayersChanged).unwrap();
    assert!(quiet.history().is_empty());
}

#[tokio::test]
async fn test_receiver_gets_published_events() {
    let bus = EventBus::new();
    let mut rx = bus.receiver();

    bus.publish(SceneEvent::ObjectsSelectedInRange).unwrap();
    assert_eq!(rx.recv().await.unwrap(), SceneEvent::ObjectsSelectedInRange);
}
