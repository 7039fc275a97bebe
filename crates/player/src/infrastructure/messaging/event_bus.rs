//! Event Bus for receiving events from the game session.
//!
//! The EventBus provides a push-based subscription model. Subscribers register
//! callbacks that are invoked, in order, when events arrive from the bridge.

use std::sync::Arc;

use armeria_shared::ServerMessage;
use tokio::sync::Mutex;

use super::connection::ConnectionState;

/// Something that happened on the game session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The connection state changed
    StateChanged(ConnectionState),
    /// A decoded frame arrived from the server
    MessageReceived(ServerMessage),
}

/// Event bus for receiving session events.
///
/// The bus holds strong references to subscribers, so they persist until
/// cleared or the bus is dropped.
#[derive(Clone)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<Box<dyn FnMut(SessionEvent) + Send + 'static>>>>,
}

impl EventBus {
    /// Create a new EventBus with no subscribers.
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Subscribe to all events.
    ///
    /// Subscribe before handing the bus to `create_connection` so that no
    /// early event is missed.
    pub async fn subscribe(&self, callback: impl FnMut(SessionEvent) + Send + 'static) {
        self.subscribers.lock().await.push(Box::new(callback));
    }

    /// Dispatch an event to all subscribers.
    ///
    /// Called by the WebSocket bridge. Each subscriber gets a clone of the event.
    pub async fn dispatch(&self, event: SessionEvent) {
        let mut subscribers = self.subscribers.lock().await;
        for subscriber in subscribers.iter_mut() {
            subscriber(event.clone());
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
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_subscribe_and_dispatch() {
        let bus = EventBus::new();
        let count = Arc::new(AtomicU32::new(0));

        let count_clone = Arc::clone(&count);
        bus.subscribe(move |_event| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        })
        .await;

        bus.dispatch(SessionEvent::MessageReceived(ServerMessage::Pong))
            .await;
        bus.dispatch(SessionEvent::StateChanged(ConnectionState::Connected))
            .await;

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_events_arrive_in_dispatch_order() {
        let bus = EventBus::new();
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));

        let seen_clone = Arc::clone(&seen);
        bus.subscribe(move |event| {
            if let SessionEvent::MessageReceived(ServerMessage::SetRoomTitle(title)) = event {
                seen_clone.lock().expect("lock").push(title);
            }
        })
        .await;

        for title in ["A", "B", "C"] {
            bus.dispatch(SessionEvent::MessageReceived(ServerMessage::SetRoomTitle(
                title.to_string(),
            )))
            .await;
        }

        assert_eq!(*seen.lock().expect("lock"), vec!["A", "B", "C"]);
    }
}
