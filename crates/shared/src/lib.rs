//! Armeria Shared - wire types for Server and Player communication
//!
//! This crate contains the types exchanged over the game WebSocket:
//! - Outbound envelopes (`ClientMessage`), serialized as `{ "type", "payload" }`
//! - Inbound envelopes (`ServerMessage`), received as `{ "action", "data" }`
//! - The records carried inside inbound data (minimap, inventory, tooltips, ...)
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde, serde_json, and thiserror
//! 2. **No client logic** - Pure data types and decoding
//! 3. **Tolerant decoding** - Server data may be a JSON-encoded string or a plain JSON value

pub mod error;
pub mod messages;
pub mod types;

pub use error::ProtocolError;
pub use messages::{ClientMessage, ServerEnvelope, ServerMessage};
pub use types::{
    CommandArgument, CommandEntry, Coords, InventoryItem, ItemTooltip, MinimapData, MinimapRoom,
    ObjectEditorData, ObjectEditorProperty, PlayerInfo, RoomObject, Settings, SoundEffectTrigger,
};
