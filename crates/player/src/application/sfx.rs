//! Sound effects
//!
//! Maps the symbolic event names the server sends in `playSFX` to wav clips,
//! preloads them once, and hands them to the platform's audio output.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use crate::state::Platform;

/// Default directory clips are loaded from.
pub const DEFAULT_SFX_DIR: &str = "sfx";

/// A named sound event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEvent {
    InventoryDragStart,
    InventoryDragStop,
    PickupItem,
    SellBuyItem,
    CatMeow,
    Teleport,
}

impl SoundEvent {
    pub const ALL: [SoundEvent; 6] = [
        SoundEvent::InventoryDragStart,
        SoundEvent::InventoryDragStop,
        SoundEvent::PickupItem,
        SoundEvent::SellBuyItem,
        SoundEvent::CatMeow,
        SoundEvent::Teleport,
    ];

    /// Wire name, as sent by the server.
    pub fn name(self) -> &'static str {
        match self {
            SoundEvent::InventoryDragStart => "INVENTORY_DRAG_START",
            SoundEvent::InventoryDragStop => "INVENTORY_DRAG_STOP",
            SoundEvent::PickupItem => "PICKUP_ITEM",
            SoundEvent::SellBuyItem => "SELL_BUY_ITEM",
            SoundEvent::CatMeow => "CAT_MEOW",
            SoundEvent::Teleport => "TELEPORT",
        }
    }

    /// File name of the clip within the sfx directory.
    pub fn clip_file(self) -> &'static str {
        match self {
            SoundEvent::InventoryDragStart => "mouse-click.wav",
            SoundEvent::InventoryDragStop => "mouse-release.wav",
            SoundEvent::PickupItem => "pickup.wav",
            SoundEvent::SellBuyItem => "sell-buy-item.wav",
            SoundEvent::CatMeow => "cat-meow.wav",
            SoundEvent::Teleport => "teleport.wav",
        }
    }
}

impl fmt::Display for SoundEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SoundEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SoundEvent::ALL
            .into_iter()
            .find(|event| event.name() == s)
            .ok_or_else(|| format!("unknown sound event: {s}"))
    }
}

/// Preloaded clips, played by event name.
#[derive(Clone)]
pub struct SoundBoard {
    platform: Platform,
    clips: Arc<HashMap<SoundEvent, Vec<u8>>>,
}

impl SoundBoard {
    /// Load every clip from `dir`. Missing or unreadable files are skipped.
    pub fn load(platform: Platform, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let mut clips = HashMap::new();

        for event in SoundEvent::ALL {
            let path = dir.join(event.clip_file());
            match std::fs::read(&path) {
                Ok(bytes) => {
                    clips.insert(event, bytes);
                }
                Err(e) => {
                    tracing::warn!("Sound clip {} not loaded: {}", path.display(), e);
                }
            }
        }

        tracing::debug!("Loaded {} of {} sound clips", clips.len(), SoundEvent::ALL.len());

        Self::from_clips(platform, clips)
    }

    /// A board with no clips; every play is a no-op.
    pub fn silent(platform: Platform) -> Self {
        Self::from_clips(platform, HashMap::new())
    }

    pub fn from_clips(platform: Platform, clips: HashMap<SoundEvent, Vec<u8>>) -> Self {
        Self {
            platform,
            clips: Arc::new(clips),
        }
    }

    /// Play the clip for `name` at `volume` (0.0 to 1.0).
    pub fn play(&self, name: &str, volume: f32) {
        let Ok(event) = name.parse::<SoundEvent>() else {
            tracing::debug!("Ignoring unknown sound event {}", name);
            return;
        };
        self.play_event(event, volume);
    }

    pub fn play_event(&self, event: SoundEvent, volume: f32) {
        match self.clips.get(&event) {
            Some(bytes) => self
                .platform
                .play_clip(event.clip_file(), bytes, volume.clamp(0.0, 1.0)),
            None => tracing::debug!("Sound clip for {} not loaded", event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::platform::mock::create_mock_platform;

    #[test]
    fn event_names_round_trip() {
        for event in SoundEvent::ALL {
            assert_eq!(event.name().parse::<SoundEvent>(), Ok(event));
        }
        assert!("FOOTSTEP".parse::<SoundEvent>().is_err());
    }

    #[test]
    fn load_skips_missing_clips() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("pickup.wav"), b"RIFF").expect("write clip");
        let (platform, mock) = create_mock_platform();

        let board = SoundBoard::load(platform, dir.path());
        board.play("PICKUP_ITEM", 0.5);
        board.play("TELEPORT", 0.5);

        assert_eq!(mock.sound.played(), vec![("pickup.wav".to_string(), 0.5)]);
    }

    #[test]
    fn play_routes_clip_to_output() {
        let (platform, mock) = create_mock_platform();
        let mut clips = HashMap::new();
        clips.insert(SoundEvent::CatMeow, vec![1, 2, 3]);
        let board = SoundBoard::from_clips(platform, clips);

        board.play("CAT_MEOW", 0.4);
        board.play("TELEPORT", 1.0);
        board.play("NOT_A_SOUND", 1.0);

        assert_eq!(mock.sound.played(), vec![("cat-meow.wav".to_string(), 0.4)]);
    }

    #[test]
    fn volume_is_clamped() {
        let (platform, mock) = create_mock_platform();
        let mut clips = HashMap::new();
        clips.insert(SoundEvent::Teleport, vec![0]);
        let board = SoundBoard::from_clips(platform, clips);

        board.play_event(SoundEvent::Teleport, 3.0);

        assert_eq!(mock.sound.played(), vec![("teleport.wav".to_string(), 1.0)]);
    }
}
