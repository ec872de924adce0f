use tokio::sync::broadcast;

use crate::models::Trade;

const EVENT_CAPACITY: usize = 64;

/// Trade lifecycle notifications for views that derive data from trades.
#[derive(Debug, Clone, PartialEq)]
pub enum TradeEvent {
    Created(Trade),
    Closed(Trade),
    Completed(Trade),
    Deleted { id: String },
}

impl TradeEvent {
    pub fn trade_id(&self) -> &str {
        match self {
            TradeEvent::Created(trade) | TradeEvent::Closed(trade) | TradeEvent::Completed(trade) => {
                &trade.id
            }
            TradeEvent::Deleted { id } => id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TradeEvent::Created(_) => "trade-created",
            TradeEvent::Closed(_) => "trade-closed",
            TradeEvent::Completed(_) => "trade-completed",
            TradeEvent::Deleted { .. } => "trade-deleted",
        }
    }
}

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<TradeEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(EVENT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TradeEvent> {
        self.sender.subscribe()
    }

    /// Returns how many subscribers saw the event. Zero is not an error.
    pub fn publish(&self, event: TradeEvent) -> usize {
        let name = event.name();
        match self.sender.send(event) {
            Ok(receivers) => {
                log::debug!("Published {} to {} subscriber(s)", name, receivers);
                receivers
            }
            Err(_) => {
                log::debug!("Published {} with no subscribers", name);
                0
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_subscriber_receives_event() {
        let bus = EventBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        assert_eq!(bus.publish(TradeEvent::Deleted { id: "t9".to_string() }), 2);
        assert_eq!(first.recv().await.unwrap().trade_id(), "t9");
        assert_eq!(second.recv().await.unwrap().name(), "trade-deleted");
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::new();
        assert_eq!(bus.publish(TradeEvent::Deleted { id: "t1".to_string() }), 0);
    }
}
