//! Store error types

use armeria_shared::ProtocolError;

use crate::ports::outbound::SendError;

/// Errors surfaced by store actions
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Socket write failed: {0}")]
    Send(#[from] SendError),
}
