use regdeck_core::events::{ChangeEvent, ChangeEventSink};
use tokio::sync::broadcast;

/// Lightweight broadcast bus that fans change events out to every
/// connected dashboard session.
///
/// Publishing is fire-and-forget: a lagging or disconnected subscriber
/// never blocks delivery to the others, it just misses events and
/// resynchronizes on reconnect.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ChangeEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: ChangeEvent) {
        // send() errors only when nobody is listening.
        let _ = self.sender.send(event);
    }
}

/// Bridges core services to the bus: services emit through the sink trait
/// without knowing the transport.
pub struct BroadcastEventSink {
    bus: EventBus,
}

impl BroadcastEventSink {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }
}

impl ChangeEventSink for BroadcastEventSink {
    fn emit(&self, event: ChangeEvent) {
        self.bus.publish(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_subscriber_sees_the_event() {
        let bus = EventBus::new(16);
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        bus.publish(ChangeEvent::Cleared { category: None });

        assert_eq!(
            first.recv().await.unwrap(),
            ChangeEvent::Cleared { category: None }
        );
        assert_eq!(
            second.recv().await.unwrap(),
            ChangeEvent::Cleared { category: None }
        );
    }

    #[tokio::test]
    async fn publish_without_subscribers_does_not_fail() {
        let bus = EventBus::new(16);
        bus.publish(ChangeEvent::Cleared { category: None });
    }

    #[tokio::test]
    async fn sink_forwards_to_the_bus() {
        let bus = EventBus::new(16);
        let mut receiver = bus.subscribe();
        let sink = BroadcastEventSink::new(bus.clone());
        sink.emit(ChangeEvent::Cleared {
            category: Some("science".into()),
        });
        assert_eq!(
            receiver.recv().await.unwrap().category(),
            Some("science")
        );
    }
}
