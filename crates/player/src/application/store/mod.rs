//! The client store.
//!
//! `Store` owns the `ClientState` and is the only place it changes. Local
//! actions and inbound server messages both end in `commit`; the side effects
//! (socket writes, persisting the auto-login token, sound) happen here and
//! nowhere else.

mod state;

use std::sync::Arc;

use armeria_shared::{ClientMessage, ServerMessage};

pub use state::{
    ClientState, ContextMenuObject, ForceInputFocus, GameTextEntry, Mutation, Point,
    AUTO_LOGIN_DISABLED_TEXT, AUTO_LOGIN_ENABLED_TEXT, CONNECTION_CLOSED_TEXT,
    CONNECTION_FAILED_TEXT,
};

use crate::application::error::ClientError;
use crate::application::sfx::SoundBoard;
use crate::infrastructure::messaging::{ConnectionState, SessionEvent};
use crate::ports::outbound::{storage_keys, CommandSink};
use crate::state::Platform;

pub struct Store {
    state: ClientState,
    platform: Platform,
    socket: Arc<dyn CommandSink>,
    sounds: SoundBoard,
}

impl Store {
    /// Build a store, restoring the auto-login token from storage.
    pub fn new(
        is_production: bool,
        platform: Platform,
        socket: Arc<dyn CommandSink>,
        sounds: SoundBoard,
    ) -> Self {
        let token = platform
            .storage_load(storage_keys::AUTO_LOGIN_TOKEN)
            .unwrap_or_default();

        Self {
            state: ClientState::new(is_production, token),
            platform,
            socket,
            sounds,
        }
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn connected(&self) -> bool {
        self.state.is_connected
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.state.has_permission(permission)
    }

    pub fn item_tooltip(&self, uuid: &str) -> Option<&armeria_shared::ItemTooltip> {
        self.state.item_tooltip(uuid)
    }

    /// Apply a mutation. The auto-login token is also written to storage.
    pub fn commit(&mut self, mutation: Mutation) {
        if let Mutation::SetAutoLoginToken(token) = &mutation {
            if token.is_empty() {
                self.platform.storage_remove(storage_keys::AUTO_LOGIN_TOKEN);
            } else {
                self.platform
                    .storage_save(storage_keys::AUTO_LOGIN_TOKEN, token);
            }
        }
        self.state.apply(mutation);
    }

    /// Every socket write goes through here; nothing is sent while disconnected.
    fn write(&self, message: ClientMessage) -> Result<(), ClientError> {
        if !self.state.is_connected {
            tracing::debug!("Not connected, dropping {:?}", message);
            return Ok(());
        }
        self.socket.send(message)?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Local actions
    // -------------------------------------------------------------------------

    /// Send a command to the server, then echo it into the game text.
    ///
    /// History and the echo are only recorded once the command is queued.
    pub fn send_slash_command(&mut self, command: &str) -> Result<(), ClientError> {
        if !self.state.is_connected {
            return Ok(());
        }

        self.write(ClientMessage::command(command))?;

        self.commit(Mutation::AppendCommandHistory(command.to_string()));
        self.commit(Mutation::AddGameText(format!(
            "<div class=\"inline-loopback\">{}</div>",
            loopback_echo(command)
        )));
        Ok(())
    }

    /// Log in with the stored token, if there is one.
    pub fn auto_login(&mut self) -> Result<(), ClientError> {
        if self.state.auto_login_token.is_empty() {
            return Ok(());
        }
        let command = format!("/logintoken {}", self.state.auto_login_token);
        self.send_slash_command(&command)
    }

    pub fn send_keep_alive(&mut self) -> Result<(), ClientError> {
        if !self.state.is_connected {
            return Ok(());
        }
        self.commit(Mutation::SetSentKeepAlive {
            now_ms: self.platform.now_millis(),
        });
        self.write(ClientMessage::Ping)
    }

    pub fn set_allow_global_hotkeys(&mut self, allow: bool) {
        self.commit(Mutation::SetAllowGlobalHotkeys(allow));
    }

    pub fn set_object_target(&mut self, uuid: impl Into<String>) {
        self.commit(Mutation::SetObjectTarget(uuid.into()));
    }

    /// Closing the editor also drops its data.
    pub fn set_object_editor_open(&mut self, open: bool) -> Result<(), ClientError> {
        self.commit(Mutation::SetObjectEditorOpen(open));
        if !open {
            self.commit(Mutation::SetObjectEditorData(None));
        }
        self.write(ClientMessage::ObjectEditorOpen(open))
    }

    pub fn set_force_input_focus(&mut self, forced: bool, text: impl Into<String>) {
        self.commit(Mutation::SetForceInputFocus(ForceInputFocus {
            forced,
            text: text.into(),
        }));
    }

    pub fn set_item_being_dragged(&mut self, dragged: bool) {
        self.commit(Mutation::SetItemBeingDragged(dragged));
    }

    pub fn show_item_tooltip(&mut self, uuid: impl Into<String>) {
        self.commit(Mutation::SetItemTooltipUuid(uuid.into()));
    }

    pub fn hide_item_tooltip(&mut self) {
        self.commit(Mutation::HideItemTooltip);
    }

    pub fn move_item_tooltip(&mut self, at: Point) {
        self.commit(Mutation::SetItemTooltipMouseCoords(at));
    }

    pub fn clear_item_tooltip_cache(&mut self) {
        self.commit(Mutation::ClearItemTooltipCache);
    }

    pub fn show_context_menu(&mut self, items: Vec<String>, object: ContextMenuObject, at: Point) {
        self.commit(Mutation::SetContextMenuItems(items));
        self.commit(Mutation::SetContextMenuObject(object));
        self.commit(Mutation::SetContextMenuPosition(at));
        self.commit(Mutation::SetContextMenuVisible(true));
    }

    pub fn hide_context_menu(&mut self) {
        self.commit(Mutation::SetContextMenuVisible(false));
    }

    /// Close the socket regardless of state.
    pub fn disconnect(&self) {
        self.socket.close();
    }

    // -------------------------------------------------------------------------
    // Server-triggered actions
    // -------------------------------------------------------------------------

    /// Apply one decoded server message.
    pub fn dispatch(&mut self, message: ServerMessage) {
        tracing::trace!(action = message.action_name(), "Server message");
        match message {
            ServerMessage::ShowText(text) => self.commit(Mutation::AddGameText(text)),
            ServerMessage::SetMapData(data) => self.commit(Mutation::SetMinimapData(data)),
            ServerMessage::SetCharacterLocation(coords) => {
                self.commit(Mutation::SetCharacterLocation(coords))
            }
            ServerMessage::SetRoomObjects(objects) => {
                self.commit(Mutation::SetRoomObjects(objects))
            }
            ServerMessage::SetRoomTitle(title) => self.commit(Mutation::SetRoomTitle(title)),
            ServerMessage::SetInventory(items) => self.commit(Mutation::SetInventory(items)),
            ServerMessage::SetObjectEditorData(data) => {
                self.commit(Mutation::SetObjectEditorData(Some(data)));
                self.commit(Mutation::SetObjectEditorOpen(true));
            }
            ServerMessage::SetPermissions(permissions) => {
                self.commit(Mutation::SetPermissions(permissions))
            }
            ServerMessage::SetPlayerInfo(info) => self.commit(Mutation::SetPlayerInfo(info)),
            ServerMessage::SetItemTooltipHtml(tooltip) => {
                self.commit(Mutation::SetItemTooltipHtml(tooltip))
            }
            ServerMessage::SetCommandDictionary(dictionary) => {
                self.commit(Mutation::SetCommandDictionary(dictionary))
            }
            ServerMessage::SetMoney(money) => self.commit(Mutation::SetMoney(money)),
            ServerMessage::SetSettings(settings) => self.commit(Mutation::SetSettings(settings)),
            ServerMessage::PlaySfx(trigger) => self.sounds.play(&trigger.id, trigger.volume),
            ServerMessage::ToggleAutoLogin(token) => {
                let next = if self.state.auto_login_token.is_empty() {
                    token
                } else {
                    String::new()
                };
                self.commit(Mutation::SetAutoLoginToken(next));
            }
            ServerMessage::Disconnect => self.disconnect(),
            ServerMessage::Pong => self.commit(Mutation::KeepAliveResponse {
                now_ms: self.platform.now_millis(),
            }),
            ServerMessage::Unknown { action } => {
                tracing::warn!(action = %action, "Ignoring unknown server action");
            }
        }
    }

    /// Parse and apply a raw text frame. Malformed frames leave state untouched.
    pub fn dispatch_frame(&mut self, frame: &str) -> Result<(), ClientError> {
        let message = ServerMessage::parse(frame).inspect_err(|e| {
            tracing::warn!(action = ?e.action(), "Dropping malformed server frame: {}", e);
        })?;
        self.dispatch(message);
        Ok(())
    }

    /// React to a connection event from the bridge.
    pub fn handle_session_event(&mut self, event: SessionEvent) -> Result<(), ClientError> {
        match event {
            SessionEvent::StateChanged(ConnectionState::Connected) => {
                self.commit(Mutation::SocketOpened);
                self.auto_login()
            }
            SessionEvent::StateChanged(
                ConnectionState::Disconnected | ConnectionState::Failed,
            ) => {
                self.commit(Mutation::SocketClosed);
                Ok(())
            }
            SessionEvent::StateChanged(ConnectionState::Connecting) => Ok(()),
            SessionEvent::MessageReceived(message) => {
                self.dispatch(message);
                Ok(())
            }
        }
    }
}

/// Command text as echoed into the game log; login tokens are hidden.
fn loopback_echo(command: &str) -> String {
    if command.find("logintoken") == Some(1) {
        let head = command.split(':').next().unwrap_or_default();
        format!("{head}:&lt;redacted&gt;")
    } else {
        command.to_string()
    }
}
