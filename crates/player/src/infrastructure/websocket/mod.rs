//! WebSocket transport for the game server connection
//!
//! - `client`: tokio-tungstenite based client
//! - `bridge`: wires the client to the command and event buses

mod bridge;
mod client;

pub use bridge::{create_connection, Connection};
pub use client::GameClient;
