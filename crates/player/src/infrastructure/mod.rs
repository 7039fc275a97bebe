pub mod messaging;
pub mod platform;
pub mod websocket;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export messaging types
pub use messaging::{CommandBus, ConnectionState, EventBus, SessionEvent};
