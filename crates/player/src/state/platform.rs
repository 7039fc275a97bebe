//! Platform DI Container
//!
//! This module provides the `Platform` struct - a dependency injection container
//! that aggregates all platform-specific service implementations behind port traits.
//!
//! Usage:
//! - Created by `create_platform()` in `infrastructure/platform/desktop.rs`
//! - Created by `mock::create_mock_platform()` in tests
//! - Handed to the `Store` and the `SoundBoard` by the runner

use std::sync::Arc;

use crate::ports::outbound::{SoundOutput, StorageProvider, TimeProvider};

/// Unified platform services container
#[derive(Clone)]
pub struct Platform {
    time: Arc<dyn TimeProviderDyn>,
    storage: Arc<dyn StorageProviderDyn>,
    sound: Arc<dyn SoundOutputDyn>,
}

// =============================================================================
// Dynamic trait versions for Arc storage
// =============================================================================

trait TimeProviderDyn: Send + Sync {
    fn now_millis(&self) -> u64;
}

trait StorageProviderDyn: Send + Sync {
    fn save(&self, key: &str, value: &str);
    fn load(&self, key: &str) -> Option<String>;
    fn remove(&self, key: &str);
}

trait SoundOutputDyn: Send + Sync {
    fn play(&self, clip_name: &str, bytes: &[u8], volume: f32);
}

// =============================================================================
// Blanket implementations - convert port traits to dyn-safe wrappers
// =============================================================================

impl<T: TimeProvider + Send + Sync> TimeProviderDyn for T {
    fn now_millis(&self) -> u64 {
        TimeProvider::now_millis(self)
    }
}

impl<T: StorageProvider + Send + Sync> StorageProviderDyn for T {
    fn save(&self, key: &str, value: &str) {
        StorageProvider::save(self, key, value)
    }
    fn load(&self, key: &str) -> Option<String> {
        StorageProvider::load(self, key)
    }
    fn remove(&self, key: &str) {
        StorageProvider::remove(self, key)
    }
}

impl<T: SoundOutput + Send + Sync> SoundOutputDyn for T {
    fn play(&self, clip_name: &str, bytes: &[u8], volume: f32) {
        SoundOutput::play(self, clip_name, bytes, volume)
    }
}

// =============================================================================
// Platform implementation
// =============================================================================

impl Platform {
    /// Create a new Platform with the given providers
    pub fn new<Tm, S, A>(time: Tm, storage: S, sound: A) -> Self
    where
        Tm: TimeProvider + Send + Sync,
        S: StorageProvider + Send + Sync,
        A: SoundOutput + Send + Sync,
    {
        Self {
            time: Arc::new(time),
            storage: Arc::new(storage),
            sound: Arc::new(sound),
        }
    }

    // -------------------------------------------------------------------------
    // Time operations
    // -------------------------------------------------------------------------

    /// Get current time in milliseconds since epoch
    pub fn now_millis(&self) -> u64 {
        self.time.now_millis()
    }

    // -------------------------------------------------------------------------
    // Storage operations
    // -------------------------------------------------------------------------

    /// Save a string value with the given key
    pub fn storage_save(&self, key: &str, value: &str) {
        self.storage.save(key, value)
    }

    /// Load a string value by key, returns None if not found
    pub fn storage_load(&self, key: &str) -> Option<String> {
        self.storage.load(key)
    }

    /// Remove a value by key
    pub fn storage_remove(&self, key: &str) {
        self.storage.remove(key)
    }

    // -------------------------------------------------------------------------
    // Audio operations
    // -------------------------------------------------------------------------

    /// Hand a loaded clip to the audio output
    pub fn play_clip(&self, clip_name: &str, bytes: &[u8], volume: f32) {
        self.sound.play(clip_name, bytes, volume)
    }
}
