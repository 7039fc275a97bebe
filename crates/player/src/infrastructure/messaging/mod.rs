//! Command Bus and Event Bus messaging infrastructure.
//!
//! This module provides the messaging layer between the store and the game server:
//! - `CommandBus`: Send messages to the server (fire-and-forget)
//! - `EventBus`: Receive session events from the server (push-based subscription)
//! - `ConnectionHandle`: Manage connection lifecycle
//!
//! The WebSocket bridge (in the websocket module) connects these buses to the actual transport.

pub mod command_bus;
pub mod connection;
pub mod event_bus;

pub use command_bus::{BusMessage, CommandBus};
pub use connection::{
    set_connection_state, ConnectionHandle, ConnectionState, ConnectionStateObserver,
};
pub use event_bus::{EventBus, SessionEvent};
