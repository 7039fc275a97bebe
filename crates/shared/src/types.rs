//! Records carried in the `data` field of inbound messages.
//!
//! Field names follow the server's JSON verbatim. Every struct tolerates
//! missing fields so older servers keep working.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Character settings (`brief`, `wrap`, `lines`, ...), keyed by setting name.
pub type Settings = BTreeMap<String, serde_json::Value>;

/// Minimap for the area the character is in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimapData {
    pub name: String,
    /// `null` from the server means an area without rooms.
    #[serde(deserialize_with = "null_as_empty")]
    pub rooms: Vec<MinimapRoom>,
}

/// One room of the minimap.
///
/// Exits hold the `"x,y,z"` location of the connected room, or an empty string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimapRoom {
    pub title: String,
    pub color: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub north: String,
    pub south: String,
    pub east: String,
    pub west: String,
    pub up: String,
    pub down: String,
}

impl MinimapRoom {
    /// Whether this room sits at the given coordinates.
    pub fn is_at(&self, coords: &Coords) -> bool {
        self.x == coords.x && self.y == coords.y && self.z == coords.z
    }
}

/// Position within an area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coords {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl std::fmt::Display for Coords {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}

/// Something present in the current room (character, mob or item).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomObject {
    pub uuid: String,
    pub name: String,
    /// 0 = character, 1 = mob, 2 = item
    #[serde(rename = "type")]
    pub kind: i32,
    /// Higher sorts first
    pub sort: i32,
    pub picture: String,
    /// Rarity color; only set for items
    pub color: String,
    pub title: String,
}

/// An item in the character's inventory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryItem {
    pub uuid: String,
    pub picture: String,
    pub slot: i32,
    pub color: String,
}

/// Cached tooltip content for an item instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemTooltip {
    pub uuid: String,
    pub html: String,
    pub rarity: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub picture: String,
}

/// Identity of the logged-in character.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerInfo {
    pub uuid: String,
    pub name: String,
}

/// Payload for the builder's object editor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ObjectEditorData {
    pub uuid: String,
    pub name: String,
    pub object_type: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub properties: Vec<ObjectEditorProperty>,
    pub access_key: String,
    pub text_coords: String,
    pub is_child: bool,
}

/// One editable property in the object editor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ObjectEditorProperty {
    pub name: String,
    pub value: String,
    pub parent_value: String,
    pub prop_type: String,
}

/// Request to play a client-side sound effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundEffectTrigger {
    pub id: String,
    #[serde(default = "default_volume")]
    pub volume: f32,
}

fn default_volume() -> f32 {
    1.0
}

/// A command the character may use, for auto-completion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommandEntry {
    pub name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub alt_names: Vec<String>,
    pub help: String,
    pub alias: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub args: Vec<CommandArgument>,
    #[serde(deserialize_with = "null_as_empty")]
    pub sub_commands: Vec<CommandEntry>,
}

/// Argument metadata for a command. The server sends these with Go's default
/// (capitalized) field names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct CommandArgument {
    pub name: String,
    pub include_remaining: bool,
    pub optional: bool,
    pub help: String,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimap_room_reads_server_field_names() {
        let json = r##"{"title":"Town Square","color":"#ffffff","type":"track","x":1,"y":-2,"z":0,
            "north":"1,-1,0","south":"","east":"","west":"","up":"","down":""}"##;
        let room: MinimapRoom = serde_json::from_str(json).expect("deserialize");

        assert_eq!(room.kind, "track");
        assert_eq!(room.north, "1,-1,0");
        assert!(room.is_at(&Coords { x: 1, y: -2, z: 0 }));
    }

    #[test]
    fn minimap_with_null_rooms_is_empty() {
        let map: MinimapData =
            serde_json::from_str(r#"{"name":"Outskirts","rooms":null}"#).expect("deserialize");
        assert_eq!(map.name, "Outskirts");
        assert!(map.rooms.is_empty());
    }

    #[test]
    fn object_editor_uses_camel_case() {
        let json = r#"{"uuid":"u1","name":"Sword","objectType":"item","accessKey":"bob/abc",
            "textCoords":"","isChild":true,
            "properties":[{"name":"rarity","value":"1","parentValue":"0","propType":"editable"}]}"#;
        let data: ObjectEditorData = serde_json::from_str(json).expect("deserialize");

        assert_eq!(data.object_type, "item");
        assert!(data.is_child);
        assert_eq!(data.properties[0].parent_value, "0");
        assert_eq!(data.properties[0].prop_type, "editable");
    }

    #[test]
    fn command_entry_reads_nested_commands_and_go_arguments() {
        let json = r#"{"name":"room","altNames":["r"],"help":"Manage rooms.","alias":"",
            "permissions":null,"args":null,
            "subCommands":[{"name":"set","args":[{"Name":"property","Optional":false,
                "IncludeRemaining":false,"NoLog":false,"Help":"Property to set."}]}]}"#;
        let entry: CommandEntry = serde_json::from_str(json).expect("deserialize");

        assert_eq!(entry.alt_names, vec!["r"]);
        assert!(entry.args.is_empty());
        assert_eq!(entry.sub_commands[0].args[0].name, "property");
        assert_eq!(entry.sub_commands[0].args[0].help, "Property to set.");
    }

    #[test]
    fn sound_trigger_defaults_volume() {
        let trigger: SoundEffectTrigger =
            serde_json::from_str(r#"{"id":"PICKUP_ITEM"}"#).expect("deserialize");
        assert_eq!(trigger.volume, 1.0);
    }

    #[test]
    fn coords_display_matches_exit_format() {
        assert_eq!(Coords { x: 3, y: 0, z: -1 }.to_string(), "3,0,-1");
    }
}
