//! Protocol decoding errors.

use thiserror::Error;

/// Failure to decode an inbound frame from the game server.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The frame was not a `{ "action", "data" }` object.
    #[error("malformed server envelope: {0}")]
    Envelope(#[source] serde_json::Error),

    /// The envelope was fine but its data did not match the action's record type.
    #[error("invalid data for `{action}`: {source}")]
    Data {
        action: String,
        #[source]
        source: serde_json::Error,
    },

    /// The action carries text but the data was an object or array.
    #[error("expected text data for `{action}`, got {found}")]
    ExpectedText { action: String, found: &'static str },
}

impl ProtocolError {
    /// Name of the action whose data failed to decode, if known.
    pub fn action(&self) -> Option<&str> {
        match self {
            ProtocolError::Envelope(_) => None,
            ProtocolError::Data { action, .. } | ProtocolError::ExpectedText { action, .. } => {
                Some(action)
            }
        }
    }
}
