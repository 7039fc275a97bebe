//! Platform abstraction ports
//!
//! These traits abstract platform-specific operations so that:
//! 1. Store code remains platform-agnostic
//! 2. Platform-specific code is isolated in infrastructure
//! 3. Code becomes easily testable with mock implementations
//!
//! NOTE: The `Platform` struct (DI container) that aggregates these traits
//! lives in `state/platform.rs`. Ports layer contains only trait definitions.

/// Time operations abstraction
pub trait TimeProvider: Clone + 'static {
    /// Get current time in milliseconds since epoch
    fn now_millis(&self) -> u64;
}

/// Persistent storage abstraction (file-based key/value)
pub trait StorageProvider: Clone + 'static {
    /// Save a string value with the given key
    fn save(&self, key: &str, value: &str);

    /// Load a string value by key, returns None if not found
    fn load(&self, key: &str) -> Option<String>;

    /// Remove a value by key
    fn remove(&self, key: &str);
}

/// Audio output abstraction
///
/// Receives already-loaded clip bytes; implementations must not block.
pub trait SoundOutput: Clone + 'static {
    fn play(&self, clip_name: &str, bytes: &[u8], volume: f32);
}

/// Storage key constants
///
/// These are kept in the ports layer as they define the contract for
/// what keys are used across the application.
pub mod storage_keys {
    pub const AUTO_LOGIN_TOKEN: &str = "auto_login_token";
}
