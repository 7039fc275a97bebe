//! Client state and the mutations that change it.
//!
//! `ClientState::apply` is pure field assignment. Anything with a side effect
//! (socket writes, persistence, sound) belongs on `Store`.

use armeria_shared::{
    CommandEntry, Coords, InventoryItem, ItemTooltip, MinimapData, MinimapRoom, ObjectEditorData,
    PlayerInfo, RoomObject, Settings,
};

use crate::presentation::markup::render_markup;

pub const CONNECTION_CLOSED_TEXT: &str = "<br>Connection to the game server has been closed.";
pub const CONNECTION_FAILED_TEXT: &str =
    "A connection to the game server could not be established.";
pub const AUTO_LOGIN_ENABLED_TEXT: &str =
    "<br>You will now be automatically logged in to this character.";
pub const AUTO_LOGIN_DISABLED_TEXT: &str =
    "<br>You will no longer be automatically logged in to this character.";

/// One rendered entry of the game text log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameTextEntry {
    /// Index at insertion
    pub id: usize,
    pub html: String,
}

/// Request to move focus to the command input, optionally pre-filled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForceInputFocus {
    pub forced: bool,
    pub text: String,
}

/// Screen position in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Subject shown in the context menu header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextMenuObject {
    pub name: String,
    pub color: String,
    /// Brackets around the name; `None` means the default (shown)
    pub subject_brackets: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextMenu {
    pub visible: bool,
    pub items: Vec<String>,
    pub object_name: String,
    pub object_color: String,
    pub object_brackets: bool,
    pub position: Point,
}

impl Default for ContextMenu {
    fn default() -> Self {
        Self {
            visible: false,
            items: Vec::new(),
            object_name: String::new(),
            object_color: "#fff".to_string(),
            object_brackets: true,
            position: Point::default(),
        }
    }
}

/// Everything the client knows about the session.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientState {
    pub is_production: bool,
    pub is_connected: bool,
    pub game_text: Vec<GameTextEntry>,
    pub allow_global_hotkeys: bool,
    pub force_input_focus: ForceInputFocus,
    pub minimap_data: MinimapData,
    pub character_location: Coords,
    pub room_objects: Vec<RoomObject>,
    pub room_title: String,
    pub object_target_uuid: String,
    pub object_editor_open: bool,
    pub object_editor_data: Option<ObjectEditorData>,
    pub auto_login_token: String,
    pub inventory: Vec<InventoryItem>,
    pub item_being_dragged: bool,
    pub permissions: Vec<String>,
    pub player_info: PlayerInfo,
    pub command_history: Vec<String>,
    pub item_tooltip_uuid: String,
    pub item_tooltip_visible: bool,
    pub item_tooltip_cache: Vec<ItemTooltip>,
    pub item_tooltip_mouse_coords: Point,
    pub money: String,
    pub command_dictionary: Vec<CommandEntry>,
    pub sent_keep_alive_ms: u64,
    pub ping_time_ms: u64,
    pub settings: Settings,
    pub context_menu: ContextMenu,
}

impl ClientState {
    pub fn new(is_production: bool, auto_login_token: impl Into<String>) -> Self {
        Self {
            is_production,
            is_connected: false,
            game_text: Vec::new(),
            allow_global_hotkeys: true,
            force_input_focus: ForceInputFocus::default(),
            minimap_data: MinimapData::default(),
            character_location: Coords::default(),
            room_objects: Vec::new(),
            room_title: "Unknown".to_string(),
            object_target_uuid: String::new(),
            object_editor_open: false,
            object_editor_data: None,
            auto_login_token: auto_login_token.into(),
            inventory: Vec::new(),
            item_being_dragged: false,
            permissions: Vec::new(),
            player_info: PlayerInfo::default(),
            command_history: Vec::new(),
            item_tooltip_uuid: String::new(),
            item_tooltip_visible: false,
            item_tooltip_cache: Vec::new(),
            item_tooltip_mouse_coords: Point::default(),
            money: "0".to_string(),
            command_dictionary: Vec::new(),
            sent_keep_alive_ms: 0,
            ping_time_ms: 0,
            settings: Settings::new(),
            context_menu: ContextMenu::default(),
        }
    }

    /// Cached tooltip for an item instance.
    pub fn item_tooltip(&self, uuid: &str) -> Option<&ItemTooltip> {
        self.item_tooltip_cache.iter().find(|t| t.uuid == uuid)
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    /// The minimap room the character is standing in.
    pub fn current_room(&self) -> Option<&MinimapRoom> {
        self.minimap_data
            .rooms
            .iter()
            .find(|room| room.is_at(&self.character_location))
    }

    fn push_text(&mut self, html: impl Into<String>) {
        self.game_text.push(GameTextEntry {
            id: self.game_text.len(),
            html: html.into(),
        });
    }

    /// Apply one mutation.
    pub fn apply(&mut self, mutation: Mutation) {
        match mutation {
            Mutation::SocketOpened => self.is_connected = true,
            Mutation::SocketClosed => {
                if self.is_connected {
                    self.is_connected = false;
                    self.push_text(CONNECTION_CLOSED_TEXT);
                } else {
                    self.push_text(CONNECTION_FAILED_TEXT);
                }
            }
            Mutation::SocketError => {}
            Mutation::AddGameText(text) => self.push_text(render_markup(&text)),
            Mutation::SetAllowGlobalHotkeys(allow) => self.allow_global_hotkeys = allow,
            Mutation::SetMinimapData(data) => self.minimap_data = data,
            Mutation::SetCharacterLocation(coords) => self.character_location = coords,
            Mutation::SetRoomObjects(objects) => self.room_objects = objects,
            Mutation::SetRoomTitle(title) => self.room_title = title,
            Mutation::SetObjectTarget(uuid) => self.object_target_uuid = uuid,
            Mutation::SetObjectEditorOpen(open) => self.object_editor_open = open,
            Mutation::SetObjectEditorData(data) => self.object_editor_data = data,
            Mutation::SetForceInputFocus(focus) => self.force_input_focus = focus,
            Mutation::SetAutoLoginToken(token) => {
                self.push_text(if token.is_empty() {
                    AUTO_LOGIN_DISABLED_TEXT
                } else {
                    AUTO_LOGIN_ENABLED_TEXT
                });
                self.auto_login_token = token;
            }
            Mutation::SetInventory(items) => self.inventory = items,
            Mutation::SetItemBeingDragged(dragged) => self.item_being_dragged = dragged,
            Mutation::SetPermissions(permissions) => {
                self.permissions = permissions.split(' ').map(str::to_string).collect();
            }
            Mutation::SetPlayerInfo(info) => self.player_info = info,
            Mutation::AppendCommandHistory(command) => self.command_history.push(command),
            Mutation::SetItemTooltipUuid(uuid) => {
                self.item_tooltip_uuid = uuid;
                self.item_tooltip_visible = true;
            }
            Mutation::HideItemTooltip => {
                self.item_tooltip_visible = false;
                self.item_tooltip_uuid.clear();
            }
            Mutation::SetItemTooltipHtml(tooltip) => {
                match self
                    .item_tooltip_cache
                    .iter_mut()
                    .find(|cached| cached.uuid == tooltip.uuid)
                {
                    Some(cached) => *cached = tooltip,
                    None => self.item_tooltip_cache.push(tooltip),
                }
            }
            Mutation::SetItemTooltipMouseCoords(coords) => {
                self.item_tooltip_mouse_coords = coords
            }
            Mutation::ClearItemTooltipCache => self.item_tooltip_cache.clear(),
            Mutation::SetMoney(money) => self.money = money,
            Mutation::SetCommandDictionary(dictionary) => self.command_dictionary = dictionary,
            Mutation::KeepAliveResponse { now_ms } => {
                self.ping_time_ms = now_ms.saturating_sub(self.sent_keep_alive_ms);
            }
            Mutation::SetSentKeepAlive { now_ms } => self.sent_keep_alive_ms = now_ms,
            Mutation::SetSettings(settings) => self.settings = settings,
            Mutation::SetContextMenuVisible(visible) => self.context_menu.visible = visible,
            Mutation::SetContextMenuItems(items) => self.context_menu.items = items,
            Mutation::SetContextMenuObject(object) => {
                self.context_menu.object_name = object.name;
                self.context_menu.object_color = object.color;
                self.context_menu.object_brackets = object.subject_brackets.unwrap_or(true);
            }
            Mutation::SetContextMenuPosition(position) => self.context_menu.position = position,
        }
    }
}

/// Named state changes.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    SocketOpened,
    SocketClosed,
    SocketError,
    /// Raw server markup; rendered on insert
    AddGameText(String),
    SetAllowGlobalHotkeys(bool),
    SetMinimapData(MinimapData),
    SetCharacterLocation(Coords),
    SetRoomObjects(Vec<RoomObject>),
    SetRoomTitle(String),
    SetObjectTarget(String),
    SetObjectEditorOpen(bool),
    SetObjectEditorData(Option<ObjectEditorData>),
    SetForceInputFocus(ForceInputFocus),
    SetAutoLoginToken(String),
    SetInventory(Vec<InventoryItem>),
    SetItemBeingDragged(bool),
    /// Space-separated permission names
    SetPermissions(String),
    SetPlayerInfo(PlayerInfo),
    AppendCommandHistory(String),
    SetItemTooltipUuid(String),
    HideItemTooltip,
    SetItemTooltipHtml(ItemTooltip),
    SetItemTooltipMouseCoords(Point),
    ClearItemTooltipCache,
    SetMoney(String),
    SetCommandDictionary(Vec<CommandEntry>),
    KeepAliveResponse { now_ms: u64 },
    SetSentKeepAlive { now_ms: u64 },
    SetSettings(Settings),
    SetContextMenuVisible(bool),
    SetContextMenuItems(Vec<String>),
    SetContextMenuObject(ContextMenuObject),
    SetContextMenuPosition(Point),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ClientState {
        ClientState::new(false, "")
    }

    #[test]
    fn defaults() {
        let s = state();
        assert_eq!(s.room_title, "Unknown");
        assert_eq!(s.money, "0");
        assert!(s.allow_global_hotkeys);
        assert_eq!(s.context_menu.object_color, "#fff");
        assert!(s.context_menu.object_brackets);
        assert!(s.object_editor_data.is_none());
    }

    #[test]
    fn socket_closed_after_open_reports_closed() {
        let mut s = state();
        s.apply(Mutation::SocketOpened);
        s.apply(Mutation::SocketClosed);

        assert!(!s.is_connected);
        assert_eq!(s.game_text.len(), 1);
        assert_eq!(s.game_text[0].html, CONNECTION_CLOSED_TEXT);
    }

    #[test]
    fn socket_closed_without_open_reports_failure() {
        let mut s = state();
        s.apply(Mutation::SocketClosed);

        assert_eq!(s.game_text[0].html, CONNECTION_FAILED_TEXT);
    }

    #[test]
    fn game_text_ids_follow_insertion_order() {
        let mut s = state();
        s.apply(Mutation::AddGameText("one".into()));
        s.apply(Mutation::AddGameText("[b]two[/b]".into()));

        assert_eq!(s.game_text[0].id, 0);
        assert_eq!(s.game_text[1].id, 1);
        assert_eq!(
            s.game_text[1].html,
            "<span style='font-weight:600'>two</span>"
        );
    }

    #[test]
    fn permissions_split_on_spaces() {
        let mut s = state();
        s.apply(Mutation::SetPermissions("CAN_BUILD CAN_SYSOP".into()));

        assert!(s.has_permission("CAN_BUILD"));
        assert!(s.has_permission("CAN_SYSOP"));
        assert!(!s.has_permission("CAN_CHAREDIT"));
    }

    #[test]
    fn tooltip_html_replaces_existing_entry() {
        let mut s = state();
        let tooltip = |html: &str| ItemTooltip {
            uuid: "i1".into(),
            html: html.into(),
            rarity: "common".into(),
            picture: String::new(),
        };

        s.apply(Mutation::SetItemTooltipHtml(tooltip("old")));
        s.apply(Mutation::SetItemTooltipHtml(tooltip("new")));

        assert_eq!(s.item_tooltip_cache.len(), 1);
        assert_eq!(s.item_tooltip("i1").map(|t| t.html.as_str()), Some("new"));
        assert!(s.item_tooltip("i2").is_none());
    }

    #[test]
    fn tooltip_visibility() {
        let mut s = state();
        s.apply(Mutation::SetItemTooltipUuid("i1".into()));
        assert!(s.item_tooltip_visible);
        assert_eq!(s.item_tooltip_uuid, "i1");

        s.apply(Mutation::HideItemTooltip);
        assert!(!s.item_tooltip_visible);
        assert!(s.item_tooltip_uuid.is_empty());
    }

    #[test]
    fn keep_alive_response_never_underflows() {
        let mut s = state();
        s.apply(Mutation::SetSentKeepAlive { now_ms: 1_000 });
        s.apply(Mutation::KeepAliveResponse { now_ms: 1_045 });
        assert_eq!(s.ping_time_ms, 45);

        s.apply(Mutation::KeepAliveResponse { now_ms: 10 });
        assert_eq!(s.ping_time_ms, 0);
    }

    #[test]
    fn context_menu_brackets_default_to_shown() {
        let mut s = state();
        s.apply(Mutation::SetContextMenuObject(ContextMenuObject {
            name: "Bob".into(),
            color: "#0f0".into(),
            subject_brackets: Some(false),
        }));
        assert!(!s.context_menu.object_brackets);

        s.apply(Mutation::SetContextMenuObject(ContextMenuObject {
            name: "Sword".into(),
            color: "#ccc".into(),
            subject_brackets: None,
        }));
        assert!(s.context_menu.object_brackets);
        assert_eq!(s.context_menu.object_name, "Sword");
    }

    #[test]
    fn auto_login_messages() {
        let mut s = state();
        s.apply(Mutation::SetAutoLoginToken("bob:abc".into()));
        s.apply(Mutation::SetAutoLoginToken(String::new()));

        assert_eq!(s.game_text[0].html, AUTO_LOGIN_ENABLED_TEXT);
        assert_eq!(s.game_text[1].html, AUTO_LOGIN_DISABLED_TEXT);
        assert!(s.auto_login_token.is_empty());
    }

    #[test]
    fn current_room_follows_character_location() {
        let mut s = state();
        s.apply(Mutation::SetMinimapData(MinimapData {
            name: "Outskirts".into(),
            rooms: vec![
                MinimapRoom {
                    title: "Gate".into(),
                    ..MinimapRoom::default()
                },
                MinimapRoom {
                    title: "Road".into(),
                    x: 1,
                    ..MinimapRoom::default()
                },
            ],
        }));
        assert_eq!(s.current_room().map(|r| r.title.as_str()), Some("Gate"));

        s.apply(Mutation::SetCharacterLocation(Coords { x: 1, y: 0, z: 0 }));
        assert_eq!(s.current_room().map(|r| r.title.as_str()), Some("Road"));

        s.apply(Mutation::SetCharacterLocation(Coords { x: 5, y: 0, z: 0 }));
        assert!(s.current_room().is_none());
    }
}
