//! Platform-specific implementations
//!
//! This module provides implementations of the platform abstraction traits
//! defined in `ports/outbound/platform.rs`.

mod desktop;

#[cfg(feature = "audio")]
mod audio;

pub mod mock;

pub use desktop::{
    create_platform, DesktopStorageProvider, DesktopTimeProvider, LogSoundOutput,
};

#[cfg(feature = "audio")]
pub use audio::RodioSoundOutput;
