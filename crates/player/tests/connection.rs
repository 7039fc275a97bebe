//! End-to-end tests against a local WebSocket server.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message;

use armeria_player::application::sfx::SoundBoard;
use armeria_player::application::store::{
    Store, CONNECTION_CLOSED_TEXT, CONNECTION_FAILED_TEXT,
};
use armeria_player::infrastructure::messaging::{ConnectionState, EventBus, SessionEvent};
use armeria_player::infrastructure::platform::mock::MockPlatform;
use armeria_player::infrastructure::websocket::{create_connection, Connection};
use armeria_shared::ServerMessage;

const WAIT: Duration = Duration::from_secs(5);

struct Client {
    store: Store,
    events: mpsc::UnboundedReceiver<SessionEvent>,
    connection: Connection,
}

async fn connect(url: &str) -> Client {
    let event_bus = EventBus::new();
    let (tx, events) = mpsc::unbounded_channel();
    event_bus
        .subscribe(move |event| {
            let _ = tx.send(event);
        })
        .await;

    let connection = create_connection(url, event_bus);
    let platform = MockPlatform::default().platform();
    let store = Store::new(
        false,
        platform.clone(),
        Arc::new(connection.command_bus.clone()),
        SoundBoard::silent(platform),
    );

    Client {
        store,
        events,
        connection,
    }
}

impl Client {
    /// Feed events to the store until `done` matches one.
    async fn pump_until(&mut self, done: impl Fn(&SessionEvent) -> bool) {
        loop {
            let event = tokio::time::timeout(WAIT, self.events.recv())
                .await
                .expect("event within timeout")
                .expect("event bus open");
            let matched = done(&event);
            self.store
                .handle_session_event(event)
                .expect("event handled");
            if matched {
                return;
            }
        }
    }
}

async fn local_server() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    (listener, format!("ws://{addr}/ws"))
}

#[tokio::test]
async fn command_round_trip_through_local_server() {
    let (listener, url) = local_server().await;
    let (received_tx, received_rx) = oneshot::channel::<String>();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let ws = tokio_tungstenite::accept_async(stream)
            .await
            .expect("handshake");
        let (mut sink, mut stream) = ws.split();

        sink.send(Message::Text(
            r#"{"action":"setRoomTitle","data":"Town Square"}"#.to_string(),
        ))
        .await
        .expect("send title");

        while let Some(Ok(msg)) = stream.next().await {
            if let Message::Text(text) = msg {
                let _ = received_tx.send(text);
                break;
            }
        }
    });

    let mut client = connect(&url).await;
    client
        .pump_until(|e| *e == SessionEvent::StateChanged(ConnectionState::Connected))
        .await;
    assert!(client.store.connected());
    assert!(client.connection.state_observer.is_connected());

    client
        .pump_until(|e| matches!(e, SessionEvent::MessageReceived(ServerMessage::SetRoomTitle(_))))
        .await;
    assert_eq!(client.store.state().room_title, "Town Square");

    client.store.send_slash_command("/look").expect("queued");

    let sent = tokio::time::timeout(WAIT, received_rx)
        .await
        .expect("frame within timeout")
        .expect("server saw a frame");
    let sent: serde_json::Value = serde_json::from_str(&sent).expect("json frame");
    assert_eq!(
        sent,
        serde_json::json!({ "type": "command", "payload": "/look" })
    );
    assert_eq!(client.store.state().command_history, vec!["/look"]);
}

#[tokio::test]
async fn server_disconnect_closes_session() {
    let (listener, url) = local_server().await;

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let mut ws = tokio_tungstenite::accept_async(stream)
            .await
            .expect("handshake");
        ws.send(Message::Text(r#"{"action":"disconnect"}"#.to_string()))
            .await
            .expect("send disconnect");
        // Drain until the client's close frame arrives.
        while let Some(Ok(msg)) = ws.next().await {
            if msg.is_close() {
                break;
            }
        }
    });

    let mut client = connect(&url).await;
    client
        .pump_until(|e| *e == SessionEvent::StateChanged(ConnectionState::Disconnected))
        .await;

    assert!(!client.store.connected());
    let last = client.store.state().game_text.last().expect("closing notice");
    assert_eq!(last.html, CONNECTION_CLOSED_TEXT);
}

#[tokio::test]
async fn unreachable_server_reports_failure() {
    let (listener, url) = local_server().await;
    drop(listener);

    let mut client = connect(&url).await;
    client
        .pump_until(|e| *e == SessionEvent::StateChanged(ConnectionState::Failed))
        .await;

    assert!(!client.store.connected());
    assert_eq!(client.store.state().game_text.len(), 1);
    assert_eq!(
        client.store.state().game_text[0].html,
        CONNECTION_FAILED_TEXT
    );
}

#[tokio::test]
async fn disconnect_flushes_close_frame_before_returning() {
    let (listener, url) = local_server().await;
    let (closed_tx, closed_rx) = oneshot::channel::<bool>();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let mut ws = tokio_tungstenite::accept_async(stream)
            .await
            .expect("handshake");
        let mut saw_close = false;
        while let Some(Ok(msg)) = ws.next().await {
            if msg.is_close() {
                saw_close = true;
                break;
            }
        }
        let _ = closed_tx.send(saw_close);
    });

    // The client runtime is torn down as soon as disconnect returns, the way
    // the process exits after the session loop.
    let client_thread = std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("client runtime");
        runtime.block_on(async {
            let mut client = connect(&url).await;
            client
                .pump_until(|e| *e == SessionEvent::StateChanged(ConnectionState::Connected))
                .await;
            tokio::time::timeout(WAIT, client.connection.handle.disconnect())
                .await
                .expect("disconnect within timeout");
        });
    });
    tokio::task::spawn_blocking(move || client_thread.join())
        .await
        .expect("join task")
        .expect("client thread");

    let saw_close = tokio::time::timeout(WAIT, closed_rx)
        .await
        .expect("server finished within timeout")
        .expect("server reported");
    assert!(saw_close, "server should receive a close frame");
}
