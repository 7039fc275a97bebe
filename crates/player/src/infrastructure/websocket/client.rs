//! Desktop WebSocket client using tokio-tungstenite

use std::sync::Arc;

use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use armeria_shared::{ClientMessage, ServerMessage};

use crate::infrastructure::messaging::ConnectionState;

type MessageCallback = Arc<Mutex<Option<Box<dyn Fn(ServerMessage) + Send + Sync>>>>;
type StateCallback = Arc<Mutex<Option<Box<dyn Fn(ConnectionState) + Send + Sync>>>>;

/// Frames queued for the write task.
enum Outgoing {
    Message(ClientMessage),
    Close,
}

/// WebSocket client for communicating with the game server
#[derive(Clone)]
pub struct GameClient {
    url: String,
    state: Arc<RwLock<ConnectionState>>,
    tx: Arc<Mutex<Option<mpsc::Sender<Outgoing>>>>,
    writer: Arc<Mutex<Option<JoinHandle<()>>>>,
    on_message: MessageCallback,
    on_state_change: StateCallback,
}

impl GameClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            state: Arc::new(RwLock::new(ConnectionState::Disconnected)),
            tx: Arc::new(Mutex::new(None)),
            writer: Arc::new(Mutex::new(None)),
            on_message: Arc::new(Mutex::new(None)),
            on_state_change: Arc::new(Mutex::new(None)),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn set_on_message<F>(&self, callback: F)
    where
        F: Fn(ServerMessage) + Send + Sync + 'static,
    {
        let mut on_message = self.on_message.lock().await;
        *on_message = Some(Box::new(callback));
    }

    /// The callback fires only when the state actually changes.
    pub async fn set_on_state_change<F>(&self, callback: F)
    where
        F: Fn(ConnectionState) + Send + Sync + 'static,
    {
        let mut on_state_change = self.on_state_change.lock().await;
        *on_state_change = Some(Box::new(callback));
    }

    async fn set_state(&self, new_state: ConnectionState) {
        transition(&self.state, &self.on_state_change, new_state).await;
    }

    /// Open the socket and start the read and write tasks.
    ///
    /// Returns once the handshake completes; the tasks keep running until the
    /// socket closes. There is no reconnect.
    pub async fn connect(&self) -> Result<()> {
        self.set_state(ConnectionState::Connecting).await;

        let ws_stream = match connect_async(self.url.as_str()).await {
            Ok((ws_stream, _)) => ws_stream,
            Err(e) => {
                tracing::error!("Failed to connect to {}: {}", self.url, e);
                self.set_state(ConnectionState::Failed).await;
                return Err(e.into());
            }
        };

        tracing::info!("Connected to game server at {}", self.url);

        let (mut write, mut read) = ws_stream.split();
        let (tx, mut rx) = mpsc::channel::<Outgoing>(32);
        {
            let mut tx_lock = self.tx.lock().await;
            *tx_lock = Some(tx);
        }

        self.set_state(ConnectionState::Connected).await;

        let on_message = Arc::clone(&self.on_message);
        let state = Arc::clone(&self.state);
        let on_state_change = Arc::clone(&self.on_state_change);
        let tx_slot = Arc::clone(&self.tx);

        tokio::spawn(async move {
            while let Some(msg) = read.next().await {
                match msg {
                    Ok(Message::Text(text)) => match ServerMessage::parse(&text) {
                        Ok(server_msg) => {
                            let callback = on_message.lock().await;
                            if let Some(ref cb) = *callback {
                                cb(server_msg);
                            }
                        }
                        Err(e) => {
                            tracing::warn!(action = ?e.action(), "Dropping server frame: {}", e);
                        }
                    },
                    Ok(Message::Close(_)) => {
                        tracing::info!("Server closed connection");
                        break;
                    }
                    Err(e) => {
                        tracing::error!("WebSocket error: {}", e);
                        break;
                    }
                    _ => {}
                }
            }

            // Dropping the sender ends the write task.
            tx_slot.lock().await.take();
            transition(&state, &on_state_change, ConnectionState::Disconnected).await;
        });

        let writer = tokio::spawn(async move {
            while let Some(outgoing) = rx.recv().await {
                let msg = match outgoing {
                    Outgoing::Message(msg) => msg,
                    Outgoing::Close => {
                        if let Err(e) = write.send(Message::Close(None)).await {
                            tracing::debug!("Close frame not sent: {}", e);
                        }
                        break;
                    }
                };
                let json = match serde_json::to_string(&msg) {
                    Ok(j) => j,
                    Err(e) => {
                        tracing::error!("Failed to serialize WebSocket message: {}", e);
                        continue;
                    }
                };
                if let Err(e) = write.send(Message::Text(json)).await {
                    tracing::error!("Failed to send message: {}", e);
                    break;
                }
            }
        });
        *self.writer.lock().await = Some(writer);

        Ok(())
    }

    pub async fn send(&self, message: ClientMessage) -> Result<()> {
        // Clone the sender to avoid holding the lock across await
        let tx = {
            let tx_lock = self.tx.lock().await;
            tx_lock.clone()
        };
        match tx {
            Some(tx) => {
                tx.send(Outgoing::Message(message)).await?;
                Ok(())
            }
            None => Err(anyhow::anyhow!("Not connected")),
        }
    }

    /// Send a close frame and mark the client disconnected. Safe to call twice.
    ///
    /// Returns after the write task has flushed the close frame and exited.
    pub async fn disconnect(&self) {
        let tx = self.tx.lock().await.take();
        if let Some(tx) = tx {
            if tx.send(Outgoing::Close).await.is_err() {
                tracing::debug!("Write task already finished");
            }
        }
        let writer = self.writer.lock().await.take();
        if let Some(writer) = writer {
            if let Err(e) = writer.await {
                tracing::error!("Write task failed: {}", e);
            }
        }
        self.set_state(ConnectionState::Disconnected).await;
    }
}

async fn transition(
    state: &RwLock<ConnectionState>,
    on_state_change: &Mutex<Option<Box<dyn Fn(ConnectionState) + Send + Sync>>>,
    new_state: ConnectionState,
) {
    {
        let mut current = state.write().await;
        if *current == new_state {
            return;
        }
        *current = new_state;
    }

    let callback = on_state_change.lock().await;
    if let Some(ref cb) = *callback {
        cb(new_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    #[tokio::test]
    async fn send_before_connect_fails() {
        let client = GameClient::new("ws://127.0.0.1:9/ws");
        let err = client
            .send(ClientMessage::Ping)
            .await
            .expect_err("not connected");
        assert!(err.to_string().contains("Not connected"));
    }

    #[tokio::test]
    async fn failed_connect_reports_connecting_then_failed() {
        let client = GameClient::new("ws://127.0.0.1:9/ws");
        let seen = Arc::new(StdMutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        client
            .set_on_state_change(move |s| seen_clone.lock().expect("lock").push(s))
            .await;

        assert!(client.connect().await.is_err());

        assert_eq!(
            *seen.lock().expect("lock"),
            vec![ConnectionState::Connecting, ConnectionState::Failed]
        );
        assert_eq!(*client.state.read().await, ConnectionState::Failed);
    }

    #[tokio::test]
    async fn repeated_disconnect_notifies_once() {
        let client = GameClient::new("ws://127.0.0.1:9/ws");
        let seen = Arc::new(StdMutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        client
            .set_on_state_change(move |s| seen_clone.lock().expect("lock").push(s))
            .await;

        *client.state.write().await = ConnectionState::Connected;
        client.disconnect().await;
        client.disconnect().await;

        assert_eq!(
            *seen.lock().expect("lock"),
            vec![ConnectionState::Disconnected]
        );
    }
}
