//! WebSocket Bridge - connects CommandBus/EventBus to the GameClient.
//!
//! `create_connection` sets up:
//! - A CommandBus for sending messages
//! - A background task that forwards client callbacks onto the EventBus, in order
//! - A background task that bridges the CommandBus to the WebSocket transport

use std::sync::atomic::AtomicU8;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use super::client::GameClient;
use crate::infrastructure::messaging::{
    set_connection_state, BusMessage, CommandBus, ConnectionHandle, ConnectionState,
    ConnectionStateObserver, EventBus, SessionEvent,
};

/// Result of creating a connection.
///
/// - `command_bus`: Send messages to the server
/// - `event_bus`: The bus session events are dispatched on
/// - `handle`: Control connection lifecycle
/// - `state_observer`: Observe connection state
pub struct Connection {
    pub command_bus: CommandBus,
    pub event_bus: EventBus,
    pub handle: ConnectionHandle,
    pub state_observer: ConnectionStateObserver,
}

/// Open a connection to `url` in the background.
///
/// Subscribe to `event_bus` before calling this; events are dispatched as soon
/// as the bridge starts.
pub fn create_connection(url: &str, event_bus: EventBus) -> Connection {
    let (cmd_tx, cmd_rx) = mpsc::channel::<BusMessage>(32);
    let (disconnect_tx, disconnect_rx) = oneshot::channel::<()>();

    let state = Arc::new(AtomicU8::new(ConnectionState::Disconnected.to_u8()));

    let command_bus = CommandBus::new(cmd_tx);
    let state_observer = ConnectionStateObserver::new(Arc::clone(&state));

    let client = GameClient::new(url);
    let event_bus_for_bridge = event_bus.clone();
    let state_for_bridge = Arc::clone(&state);

    let bridge = tokio::spawn(async move {
        bridge_task(
            client,
            cmd_rx,
            disconnect_rx,
            event_bus_for_bridge,
            state_for_bridge,
        )
        .await;
    });

    let handle = ConnectionHandle::new(disconnect_tx, bridge);

    Connection {
        command_bus,
        event_bus,
        handle,
        state_observer,
    }
}

async fn bridge_task(
    client: GameClient,
    mut cmd_rx: mpsc::Receiver<BusMessage>,
    mut disconnect_rx: oneshot::Receiver<()>,
    event_bus: EventBus,
    state: Arc<AtomicU8>,
) {
    // Client callbacks are synchronous; a single forwarder keeps arrival order.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<SessionEvent>();
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            event_bus.dispatch(event).await;
        }
    });

    let state_for_callback = Arc::clone(&state);
    let events_for_state = event_tx.clone();
    client
        .set_on_state_change(move |conn_state| {
            set_connection_state(&state_for_callback, conn_state);
            let _ = events_for_state.send(SessionEvent::StateChanged(conn_state));
        })
        .await;

    let events_for_messages = event_tx;
    client
        .set_on_message(move |msg| {
            let _ = events_for_messages.send(SessionEvent::MessageReceived(msg));
        })
        .await;

    if let Err(e) = client.connect().await {
        tracing::error!("Connection to {} failed: {}", client.url(), e);
        return;
    }

    loop {
        tokio::select! {
            _ = &mut disconnect_rx => {
                tracing::info!("Disconnect requested");
                client.disconnect().await;
                break;
            }

            bus_msg = cmd_rx.recv() => {
                match bus_msg {
                    Some(BusMessage::Send(msg)) => {
                        if let Err(e) = client.send(msg).await {
                            tracing::error!("Failed to send message: {}", e);
                        }
                    }
                    Some(BusMessage::Close) => {
                        tracing::info!("Close requested");
                        client.disconnect().await;
                    }
                    None => {
                        tracing::debug!("Command channel closed");
                        client.disconnect().await;
                        break;
                    }
                }
            }
        }
    }
}
