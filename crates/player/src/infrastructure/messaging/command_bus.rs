//! Command Bus for sending messages to the game server.
//!
//! The CommandBus is the production `CommandSink`: it queues messages for the
//! WebSocket bridge, which owns the actual socket.

use armeria_shared::ClientMessage;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::ports::outbound::{CommandSink, SendError};

/// Message types sent through the command bus to the WebSocket bridge.
#[derive(Debug)]
pub enum BusMessage {
    /// Fire-and-forget message for the server
    Send(ClientMessage),
    /// Close the socket
    Close,
}

/// Command bus for sending messages to the game server.
///
/// This is a concrete struct that can be cloned and shared; the store sees it
/// through the `CommandSink` port.
#[derive(Clone)]
pub struct CommandBus {
    tx: mpsc::Sender<BusMessage>,
}

impl CommandBus {
    /// Create a new CommandBus with the given channel sender.
    pub fn new(tx: mpsc::Sender<BusMessage>) -> Self {
        Self { tx }
    }

    fn enqueue(&self, message: BusMessage) -> Result<(), SendError> {
        self.tx.try_send(message).map_err(|e| match e {
            TrySendError::Full(_) => SendError::Full,
            TrySendError::Closed(_) => SendError::Closed,
        })
    }
}

impl CommandSink for CommandBus {
    /// Returns immediately after queueing the message.
    fn send(&self, message: ClientMessage) -> Result<(), SendError> {
        self.enqueue(BusMessage::Send(message))
    }

    fn close(&self) {
        if let Err(e) = self.enqueue(BusMessage::Close) {
            tracing::debug!("Close request not queued: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_queues_message_for_bridge() {
        let (tx, mut rx) = mpsc::channel(4);
        let bus = CommandBus::new(tx);

        bus.send(ClientMessage::command("/look")).expect("queued");

        match rx.recv().await {
            Some(BusMessage::Send(ClientMessage::Command(cmd))) => assert_eq!(cmd, "/look"),
            other => panic!("unexpected bus message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn close_queues_close() {
        let (tx, mut rx) = mpsc::channel(4);
        let bus = CommandBus::new(tx);

        bus.close();

        assert!(matches!(rx.recv().await, Some(BusMessage::Close)));
    }

    #[test]
    fn send_fails_when_bridge_is_gone() {
        let (tx, rx) = mpsc::channel(4);
        drop(rx);
        let bus = CommandBus::new(tx);

        let err = bus.send(ClientMessage::Ping).expect_err("should fail");
        assert!(matches!(err, SendError::Closed));
    }

    #[test]
    fn send_fails_when_queue_is_full() {
        let (tx, _rx) = mpsc::channel(1);
        let bus = CommandBus::new(tx);

        bus.send(ClientMessage::Ping).expect("first fits");
        let err = bus.send(ClientMessage::Ping).expect_err("should fail");
        assert!(matches!(err, SendError::Full));
    }
}
