//! In-memory platform for tests
//!
//! Every provider shares its state through `Arc`, so a test can keep a clone
//! and inspect what the store did.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::ports::outbound::{SoundOutput, StorageProvider, TimeProvider};
use crate::state::Platform;

/// Clock that only moves when told to
#[derive(Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn set(&self, millis: u64) {
        self.now.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: u64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl TimeProvider for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Key/value storage held in memory
#[derive(Clone, Default)]
pub struct MemoryStorage {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn with_value(key: &str, value: &str) -> Self {
        let storage = Self::default();
        storage.save(key, value);
        storage
    }
}

impl StorageProvider for MemoryStorage {
    fn save(&self, key: &str, value: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
    }

    fn load(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn remove(&self, key: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.remove(key);
        }
    }
}

/// Sound output that records every clip it is asked to play
#[derive(Clone, Default)]
pub struct RecordingSoundOutput {
    played: Arc<Mutex<Vec<(String, f32)>>>,
}

impl RecordingSoundOutput {
    /// Clip names and volumes, in play order
    pub fn played(&self) -> Vec<(String, f32)> {
        self.played
            .lock()
            .map(|played| played.clone())
            .unwrap_or_default()
    }
}

impl SoundOutput for RecordingSoundOutput {
    fn play(&self, clip_name: &str, _bytes: &[u8], volume: f32) {
        if let Ok(mut played) = self.played.lock() {
            played.push((clip_name.to_string(), volume));
        }
    }
}

/// Handles onto the providers inside a mock `Platform`
#[derive(Clone, Default)]
pub struct MockPlatform {
    pub clock: ManualClock,
    pub storage: MemoryStorage,
    pub sound: RecordingSoundOutput,
}

impl MockPlatform {
    pub fn with_storage(storage: MemoryStorage) -> Self {
        Self {
            storage,
            ..Self::default()
        }
    }

    pub fn platform(&self) -> Platform {
        Platform::new(self.clock.clone(), self.storage.clone(), self.sound.clone())
    }
}

/// Create a platform backed entirely by memory
pub fn create_mock_platform() -> (Platform, MockPlatform) {
    let mock = MockPlatform::default();
    (mock.platform(), mock)
}
