//! Command Sink Port - the store's only route to the game socket
//!
//! The store never touches the transport directly. Everything it writes
//! goes through this trait, which the command bus implements.

use armeria_shared::ClientMessage;
use thiserror::Error;

/// Failure to hand a message to the transport.
#[derive(Debug, Error)]
pub enum SendError {
    /// The connection task is gone
    #[error("connection closed")]
    Closed,

    /// The outbound queue is full
    #[error("outbound queue full")]
    Full,
}

/// Port for writing to the game socket
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait CommandSink: Send + Sync {
    /// Queue a message for the server
    fn send(&self, message: ClientMessage) -> Result<(), SendError>;

    /// Close the socket. Idempotent.
    fn close(&self);
}
