//! WebSocket message types for Server-Player communication
//!
//! Outbound frames are `ClientMessage`s, serialized as
//! `{ "type": <kind>, "payload": <value> }`.
//!
//! Inbound frames name a client action to run: `{ "action": <name>, "data": <value> }`.
//! The server usually JSON-encodes structured data into a string before putting
//! it in `data`; decoding accepts either that or a plain JSON value.
//!
//! Unknown action names decode to `ServerMessage::Unknown` rather than failing,
//! so a newer server does not break an older client.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProtocolError;
use crate::types::{
    CommandEntry, Coords, InventoryItem, ItemTooltip, MinimapData, ObjectEditorData, PlayerInfo,
    RoomObject, Settings, SoundEffectTrigger,
};

// =============================================================================
// Client Messages (Player → Server)
// =============================================================================

/// Messages from client (Player) to server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum ClientMessage {
    /// A slash command typed by the player, leading `/` included
    Command(String),
    /// Keep-alive ping, answered by a `pong` action
    Ping,
    /// The object editor was opened or closed
    ObjectEditorOpen(bool),
}

impl ClientMessage {
    pub fn command(command: impl Into<String>) -> Self {
        ClientMessage::Command(command.into())
    }
}

// =============================================================================
// Server Messages (Server → Player)
// =============================================================================

/// Raw inbound frame, before the action's data is decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerEnvelope {
    pub action: String,
    #[serde(default)]
    pub data: Value,
}

impl ServerEnvelope {
    pub fn new(action: impl Into<String>, data: impl Into<Value>) -> Self {
        Self {
            action: action.into(),
            data: data.into(),
        }
    }

    /// Envelope whose data is the given record JSON-encoded into a string, the
    /// way the game server sends structured data.
    pub fn encoded<T: Serialize>(
        action: impl Into<String>,
        record: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(action, serde_json::to_string(record)?))
    }
}

/// Decoded inbound message; one variant per client action the server can call.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    /// `showText` - append text to the main window
    ShowText(String),
    /// `setMapData` - minimap for the current area
    SetMapData(MinimapData),
    /// `setCharacterLocation` - character position on the minimap
    SetCharacterLocation(Coords),
    /// `setRoomObjects` - everything visible in the room
    SetRoomObjects(Vec<RoomObject>),
    /// `setRoomTitle`
    SetRoomTitle(String),
    /// `setInventory`
    SetInventory(Vec<InventoryItem>),
    /// `setObjectEditorData` - open the object editor with this payload
    SetObjectEditorData(ObjectEditorData),
    /// `setPermissions` - space-separated permission names
    SetPermissions(String),
    /// `setPlayerInfo`
    SetPlayerInfo(PlayerInfo),
    /// `setItemTooltipHTML` - tooltip content for the item cache
    SetItemTooltipHtml(ItemTooltip),
    /// `setCommandDictionary` - commands available for auto-complete
    SetCommandDictionary(Vec<CommandEntry>),
    /// `setMoney`
    SetMoney(String),
    /// `setSettings`
    SetSettings(Settings),
    /// `playSFX`
    PlaySfx(SoundEffectTrigger),
    /// `toggleAutoLogin` - token to store, or a request to clear the stored one
    ToggleAutoLogin(String),
    /// `disconnect` - server asks the client to close the socket
    Disconnect,
    /// `pong` - keep-alive response
    Pong,
    /// Action this client does not know about
    Unknown { action: String },
}

impl ServerMessage {
    /// Parse a text frame.
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        let envelope: ServerEnvelope =
            serde_json::from_str(text).map_err(ProtocolError::Envelope)?;
        Self::from_envelope(envelope)
    }

    /// Decode the data of an already-parsed envelope.
    pub fn from_envelope(envelope: ServerEnvelope) -> Result<Self, ProtocolError> {
        let ServerEnvelope { action, data } = envelope;

        let msg = match action.as_str() {
            "showText" => ServerMessage::ShowText(text(&action, data)?),
            "setMapData" => ServerMessage::SetMapData(embedded(&action, data)?),
            "setCharacterLocation" => ServerMessage::SetCharacterLocation(embedded(&action, data)?),
            "setRoomObjects" => ServerMessage::SetRoomObjects(embedded_list(&action, data)?),
            "setRoomTitle" => ServerMessage::SetRoomTitle(text(&action, data)?),
            "setInventory" => ServerMessage::SetInventory(embedded_list(&action, data)?),
            "setObjectEditorData" => ServerMessage::SetObjectEditorData(embedded(&action, data)?),
            "setPermissions" => ServerMessage::SetPermissions(text(&action, data)?),
            "setPlayerInfo" => ServerMessage::SetPlayerInfo(embedded(&action, data)?),
            "setItemTooltipHTML" => ServerMessage::SetItemTooltipHtml(embedded(&action, data)?),
            "setCommandDictionary" => {
                ServerMessage::SetCommandDictionary(embedded_list(&action, data)?)
            }
            "setMoney" => ServerMessage::SetMoney(text(&action, data)?),
            "setSettings" => ServerMessage::SetSettings(
                embedded::<Option<Settings>>(&action, data)?.unwrap_or_default(),
            ),
            "playSFX" => ServerMessage::PlaySfx(embedded(&action, data)?),
            "toggleAutoLogin" => ServerMessage::ToggleAutoLogin(text(&action, data)?),
            "disconnect" => ServerMessage::Disconnect,
            "pong" => ServerMessage::Pong,
            _ => ServerMessage::Unknown {
                action: action.clone(),
            },
        };

        Ok(msg)
    }

    /// The wire action name this message was decoded from.
    pub fn action_name(&self) -> &str {
        match self {
            ServerMessage::ShowText(_) => "showText",
            ServerMessage::SetMapData(_) => "setMapData",
            ServerMessage::SetCharacterLocation(_) => "setCharacterLocation",
            ServerMessage::SetRoomObjects(_) => "setRoomObjects",
            ServerMessage::SetRoomTitle(_) => "setRoomTitle",
            ServerMessage::SetInventory(_) => "setInventory",
            ServerMessage::SetObjectEditorData(_) => "setObjectEditorData",
            ServerMessage::SetPermissions(_) => "setPermissions",
            ServerMessage::SetPlayerInfo(_) => "setPlayerInfo",
            ServerMessage::SetItemTooltipHtml(_) => "setItemTooltipHTML",
            ServerMessage::SetCommandDictionary(_) => "setCommandDictionary",
            ServerMessage::SetMoney(_) => "setMoney",
            ServerMessage::SetSettings(_) => "setSettings",
            ServerMessage::PlaySfx(_) => "playSFX",
            ServerMessage::ToggleAutoLogin(_) => "toggleAutoLogin",
            ServerMessage::Disconnect => "disconnect",
            ServerMessage::Pong => "pong",
            ServerMessage::Unknown { action } => action,
        }
    }
}

/// Text data. `null` reads as empty; numbers and booleans are stringified
/// (money is occasionally sent as a number).
fn text(action: &str, data: Value) -> Result<String, ProtocolError> {
    match data {
        Value::String(s) => Ok(s),
        Value::Null => Ok(String::new()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Array(_) => Err(ProtocolError::ExpectedText {
            action: action.to_string(),
            found: "array",
        }),
        Value::Object(_) => Err(ProtocolError::ExpectedText {
            action: action.to_string(),
            found: "object",
        }),
    }
}

/// Structured data, either JSON-encoded in a string or inline.
fn embedded<T: DeserializeOwned>(action: &str, data: Value) -> Result<T, ProtocolError> {
    let decoded = match data {
        Value::String(s) => serde_json::from_str(&s),
        other => serde_json::from_value(other),
    };

    decoded.map_err(|source| ProtocolError::Data {
        action: action.to_string(),
        source,
    })
}

/// A list where `null` means empty.
fn embedded_list<T: DeserializeOwned>(action: &str, data: Value) -> Result<Vec<T>, ProtocolError> {
    Ok(embedded::<Option<Vec<T>>>(action, data)?.unwrap_or_default())
}
