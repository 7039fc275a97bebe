//! Connection lifecycle management.
//!
//! This module provides types for managing the WebSocket connection lifecycle,
//! including connection state observation and disconnect control.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Connection state for the game session.
///
/// There is no reconnecting state: once the socket closes the session is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not connected to the server
    Disconnected,
    /// Attempting to establish connection
    Connecting,
    /// Successfully connected
    Connected,
    /// The connection could not be established
    Failed,
}

impl ConnectionState {
    /// Convert to u8 for atomic storage.
    pub fn to_u8(self) -> u8 {
        match self {
            ConnectionState::Disconnected => 0,
            ConnectionState::Connecting => 1,
            ConnectionState::Connected => 2,
            ConnectionState::Failed => 3,
        }
    }

    /// Convert from u8 (atomic storage).
    pub fn from_u8(v: u8) -> Self {
        match v {
            1 => ConnectionState::Connecting,
            2 => ConnectionState::Connected,
            3 => ConnectionState::Failed,
            _ => ConnectionState::Disconnected,
        }
    }
}

/// Handle to manage connection lifecycle.
///
/// Owns the bridge task. When this handle is dropped, it does NOT
/// automatically disconnect; call `disconnect()` explicitly.
pub struct ConnectionHandle {
    disconnect_tx: oneshot::Sender<()>,
    bridge: JoinHandle<()>,
}

impl ConnectionHandle {
    /// Called by the bridge when spawning the connection task.
    pub fn new(disconnect_tx: oneshot::Sender<()>, bridge: JoinHandle<()>) -> Self {
        Self {
            disconnect_tx,
            bridge,
        }
    }

    /// Request disconnect and wait for the bridge to finish.
    ///
    /// Resolves once the close frame has been written (or the connection was
    /// already gone). Consumes the handle since a closed connection cannot be
    /// reused.
    pub async fn disconnect(self) {
        if self.disconnect_tx.send(()).is_err() {
            tracing::debug!("Bridge already stopped");
        }
        if let Err(e) = self.bridge.await {
            tracing::error!("Bridge task failed: {}", e);
        }
    }
}

/// Observable connection state.
///
/// Lets callers poll the state without owning the `ConnectionHandle`.
#[derive(Clone)]
pub struct ConnectionStateObserver {
    state: Arc<AtomicU8>,
}

impl ConnectionStateObserver {
    pub fn new(state: Arc<AtomicU8>) -> Self {
        Self { state }
    }

    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::SeqCst))
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }
}

/// Store a new state, returning whether it differs from the previous one.
pub fn set_connection_state(state_ref: &AtomicU8, new_state: ConnectionState) -> bool {
    state_ref.swap(new_state.to_u8(), Ordering::SeqCst) != new_state.to_u8()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_state_roundtrip() {
        let states = [
            ConnectionState::Disconnected,
            ConnectionState::Connecting,
            ConnectionState::Connected,
            ConnectionState::Failed,
        ];

        for state in states {
            assert_eq!(ConnectionState::from_u8(state.to_u8()), state);
        }
    }

    #[test]
    fn test_observer_reads_state() {
        let state = Arc::new(AtomicU8::new(ConnectionState::Disconnected.to_u8()));
        let observer = ConnectionStateObserver::new(Arc::clone(&state));

        assert_eq!(observer.state(), ConnectionState::Disconnected);
        assert!(!observer.is_connected());

        set_connection_state(&state, ConnectionState::Connected);

        assert_eq!(observer.state(), ConnectionState::Connected);
        assert!(observer.is_connected());
    }

    #[test]
    fn test_set_state_reports_changes_only() {
        let state = AtomicU8::new(ConnectionState::Connecting.to_u8());

        assert!(set_connection_state(&state, ConnectionState::Connected));
        assert!(!set_connection_state(&state, ConnectionState::Connected));
        assert!(set_connection_state(&state, ConnectionState::Disconnected));
    }

    #[tokio::test]
    async fn test_disconnect_waits_for_bridge() {
        let (tx, rx) = oneshot::channel::<()>();
        let finished = Arc::new(AtomicU8::new(0));
        let finished_clone = Arc::clone(&finished);
        let bridge = tokio::spawn(async move {
            let _ = rx.await;
            tokio::task::yield_now().await;
            finished_clone.store(1, Ordering::SeqCst);
        });

        ConnectionHandle::new(tx, bridge).disconnect().await;

        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_disconnect_after_bridge_exit() {
        let (tx, _) = oneshot::channel::<()>();
        let bridge = tokio::spawn(async {});

        ConnectionHandle::new(tx, bridge).disconnect().await;
    }
}
