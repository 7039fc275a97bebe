//! Outbound ports - Interfaces for external services
//!
//! These ports define the contracts that infrastructure adapters must implement,
//! allowing the store to interact with external systems without depending on
//! concrete implementations.

pub mod command_sink;
pub mod platform;

pub use command_sink::{CommandSink, SendError};
pub use platform::{storage_keys, SoundOutput, StorageProvider, TimeProvider};

#[cfg(any(test, feature = "testing"))]
pub use command_sink::MockCommandSink;
