//! Line-oriented view of the store for a terminal.
//!
//! The view remembers how much it has already printed, so calling `render`
//! after every event only writes what is new.

use std::io::{self, Write};

use armeria_shared::MinimapRoom;

use crate::application::store::ClientState;
use crate::presentation::markup::to_plain_text;

#[derive(Debug, Default)]
pub struct TerminalView {
    printed: usize,
    room_title: Option<String>,
    money: Option<String>,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write game text added since the last call, then any room or money change.
    pub fn render(&mut self, state: &ClientState, out: &mut impl Write) -> io::Result<()> {
        for entry in state.game_text.iter().skip(self.printed) {
            let text = to_plain_text(&entry.html);
            let text = text.trim_start_matches('\n');
            if !text.is_empty() {
                writeln!(out, "{text}")?;
            }
        }
        self.printed = state.game_text.len();

        if self.room_title.as_deref() != Some(state.room_title.as_str()) {
            if self.room_title.is_some() {
                writeln!(out, "-- {} ({}) --", state.room_title, state.character_location)?;
                if let Some(room) = state.current_room() {
                    let exits = exits(room);
                    if !exits.is_empty() {
                        writeln!(out, "exits: {}", exits.join(", "))?;
                    }
                }
            }
            self.room_title = Some(state.room_title.clone());
        }

        if self.money.as_deref() != Some(state.money.as_str()) {
            if self.money.is_some() {
                writeln!(out, "[money: {}]", state.money)?;
            }
            self.money = Some(state.money.clone());
        }

        out.flush()
    }
}

fn exits(room: &MinimapRoom) -> Vec<&'static str> {
    [
        ("north", &room.north),
        ("south", &room.south),
        ("east", &room.east),
        ("west", &room.west),
        ("up", &room.up),
        ("down", &room.down),
    ]
    .into_iter()
    .filter(|(_, target)| !target.is_empty())
    .map(|(name, _)| name)
    .collect()
}
