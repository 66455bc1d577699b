mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use common::{Harness, StaticMetadata};
use futures::stream;
use serde_json::json;
use slack_compose::ComposeError;
use slack_compose::EventRouter;
use slack_compose::bus::{BusStream, EventBus, MemoryBus};
use slack_compose::router::Route;
use tokio::sync::watch;

/// Bus whose first `closing` subscriptions to `channel` end immediately.
struct ClosingBus {
    inner: Arc<MemoryBus>,
    channel: String,
    closing: AtomicUsize,
    subscribes: AtomicUsize,
}

#[async_trait]
impl EventBus for ClosingBus {
    async fn subscribe(&self, channel: &str) -> Result<BusStream, ComposeError> {
        if channel == self.channel {
            self.subscribes.fetch_add(1, Ordering::SeqCst);
            let closed = self
                .closing
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if closed {
                return Ok(Box::pin(stream::empty()));
            }
        }
        self.inner.subscribe(channel).await
    }

    async fn push(&self, list: &str, payload: &str) -> Result<(), ComposeError> {
        self.inner.push(list, payload).await
    }
}

async fn wait_for<F: Fn() -> bool>(condition: F) -> bool {
    for _ in 0..500 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

#[tokio::test]
async fn test_every_route_is_subscribed() {
    let h = Harness::new(StaticMetadata::missing());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let listeners = h.router.clone().start(shutdown_rx).await.unwrap();

    for route in Route::ALL {
        assert_eq!(h.bus.subscriber_count(h.router.channel_for(route)), 1, "{route}");
    }

    shutdown_tx.send(true).unwrap();
    assert!(listeners.wait(Duration::from_secs(5)).await);
}

#[tokio::test]
async fn test_published_events_are_routed() {
    let h = Harness::new(StaticMetadata::missing());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let listeners = h.router.clone().start(shutdown_rx).await.unwrap();

    let slash = json!({ "command": "/slack-compose", "text": "web", "channel_id": "C1" });
    let output = json!({
        "type": "slack-compose",
        "command": "docker compose ps",
        "output": "ok",
        "metadata": { "project": "web" }
    });
    h.bus.publish("slack-commands", &slash.to_string());
    h.bus.publish("poppit:command-output", &output.to_string());

    assert!(wait_for(|| h.bus.pushed(common::POPPIT_LIST).len() == 1).await);
    assert!(wait_for(|| h.bus.pushed(common::SLACKLINER_LIST).len() == 1).await);

    shutdown_tx.send(true).unwrap();
    assert!(listeners.wait(Duration::from_secs(5)).await);
}

#[tokio::test]
async fn test_bad_event_does_not_stop_listener() {
    let h = Harness::new(StaticMetadata::missing());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let listeners = h.router.clone().start(shutdown_rx).await.unwrap();

    h.bus.publish("slack-commands", "garbage");
    h.bus.publish(
        "slack-commands",
        &json!({ "command": "/slack-compose", "text": "web" }).to_string(),
    );

    assert!(wait_for(|| h.bus.pushed(common::POPPIT_LIST).len() == 1).await);

    shutdown_tx.send(true).unwrap();
    assert!(listeners.wait(Duration::from_secs(5)).await);
}

#[tokio::test]
async fn test_shutdown_stops_listeners_and_drops_subscriptions() {
    let h = Harness::new(StaticMetadata::missing());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let listeners = h.router.clone().start(shutdown_rx).await.unwrap();

    shutdown_tx.send(true).unwrap();
    assert!(listeners.wait(Duration::from_secs(5)).await);

    for route in Route::ALL {
        assert_eq!(h.bus.subscriber_count(h.router.channel_for(route)), 0, "{route}");
    }
}

#[tokio::test]
async fn test_dropped_shutdown_sender_stops_listeners() {
    let h = Harness::new(StaticMetadata::missing());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let listeners = h.router.clone().start(shutdown_rx).await.unwrap();

    drop(shutdown_tx);

    assert!(listeners.wait(Duration::from_secs(5)).await);
}

#[tokio::test]
async fn test_closed_subscription_is_resubscribed() {
    let memory = Arc::new(MemoryBus::new());
    let bus = Arc::new(ClosingBus {
        inner: memory.clone(),
        channel: "poppit:command-output".to_string(),
        closing: AtomicUsize::new(2),
        subscribes: AtomicUsize::new(0),
    });
    let router = Arc::new(EventRouter::new(
        Arc::new(common::test_config()),
        Arc::new(common::test_projects()),
        bus.clone(),
        Arc::new(StaticMetadata::missing()),
    ));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let listeners = router.start(shutdown_rx).await.unwrap();

    assert!(wait_for(|| memory.subscriber_count("poppit:command-output") == 1).await);
    assert_eq!(bus.subscribes.load(Ordering::SeqCst), 3);

    let output = json!({
        "type": "slack-compose",
        "command": "docker compose ps",
        "output": "ok",
        "metadata": { "project": "web" }
    });
    memory.publish("poppit:command-output", &output.to_string());
    assert!(wait_for(|| memory.pushed(common::SLACKLINER_LIST).len() == 1).await);

    shutdown_tx.send(true).unwrap();
    assert!(listeners.wait(Duration::from_secs(5)).await);
}

#[tokio::test]
async fn test_shutdown_interrupts_pending_resubscribe() {
    let memory = Arc::new(MemoryBus::new());
    let bus = Arc::new(ClosingBus {
        inner: memory,
        channel: "slack-reactions".to_string(),
        closing: AtomicUsize::new(usize::MAX),
        subscribes: AtomicUsize::new(0),
    });
    let router = Arc::new(EventRouter::new(
        Arc::new(common::test_config()),
        Arc::new(common::test_projects()),
        bus,
        Arc::new(StaticMetadata::missing()),
    ));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let listeners = router.start(shutdown_rx).await.unwrap();

    tokio::time::sleep(Duration::from_millis(50)).await;
    shutdown_tx.send(true).unwrap();

    assert!(listeners.wait(Duration::from_secs(5)).await);
}
