//! Server frames used across unit tests.

use armeria_shared::ServerEnvelope;
use serde::Serialize;
use serde_json::Value;

/// A frame whose data is sent as-is.
pub fn frame(action: &str, data: impl Into<Value>) -> String {
    to_text(&ServerEnvelope::new(action, data))
}

/// A frame whose data is JSON-encoded into a string, the way the server sends records.
pub fn encoded_frame<T: Serialize>(action: &str, data: &T) -> String {
    let envelope = ServerEnvelope::encoded(action, data).expect("encode fixture data");
    to_text(&envelope)
}

fn to_text(envelope: &ServerEnvelope) -> String {
    serde_json::to_string(envelope).expect("serialize fixture frame")
}
