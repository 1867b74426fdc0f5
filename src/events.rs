//! Change signaling for store consumers.
//!
//! The store broadcasts a typed invalidation event after every mutation.
//! Events carry no payload; interested consumers simply re-read the store
//! when one arrives.

use log::debug;
use tokio::sync::broadcast;

/// What changed. Pure invalidation, no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceEvent {
    /// The saved places collection was mutated
    PlacesChanged,
    /// The category list was mutated
    CategoriesChanged,
}

/// A broadcast channel for [`PlaceEvent`]s. Cloning shares the channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<PlaceEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(32);
        Self { tx }
    }

    /// Subscribe to change events. Each receiver sees every event
    /// published after the subscription.
    pub fn subscribe(&self) -> broadcast::Receiver<PlaceEvent> {
        self.tx.subscribe()
    }

    /// Publish an event to all current subscribers. Publishing with no
    /// subscribers is not an error.
    pub fn publish(&self, event: PlaceEvent) {
        if self.tx.send(event).is_err() {
            debug!("No subscribers for {:?}", event);
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

    #[test]
    fn subscribers_receive_published_events() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.publish(PlaceEvent::PlacesChanged);
        bus.publish(PlaceEvent::CategoriesChanged);

        assert_eq!(rx.try_recv().unwrap(), PlaceEvent::PlacesChanged);
        assert_eq!(rx.try_recv().unwrap(), PlaceEvent::CategoriesChanged);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::new();
        bus.publish(PlaceEvent::PlacesChanged);
    }

    #[test]
    fn clones_share_the_channel() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.clone().publish(PlaceEvent::PlacesChanged);
        assert_eq!(rx.try_recv().unwrap(), PlaceEvent::PlacesChanged);
    }
}
