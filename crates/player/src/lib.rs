//! Armeria Player crate.
//!
//! Client for the Armeria text game: the state store, the WebSocket
//! connection it talks through, and a terminal front-end.

pub mod application;
pub mod infrastructure;
pub mod ports;
pub mod presentation;
pub mod runner;
pub mod state;

pub use application::error::ClientError;
pub use application::store::{ClientState, Mutation, Store};
pub use state::Platform;
