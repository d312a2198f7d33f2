//! Playback abstraction layer for realising a resolved soundscape.
//!
//! The resolution engine only says which sounds should be audible and how loud.
//! This module turns that into actual audio through the [`PlaybackBackend`]
//! trait, and keeps track of what is already playing in [`PlaybackDriver`].
//!
//! ## Supported Backends
//!
//! - **Command Backend**: One looping external player process per sound
//! - **Log Backend**: Dry run that only logs what would be played
//!
//! ## Backend Selection
//!
//! Set `backend = "command"` or `backend = "log"` in the config, or leave the
//! default `"auto"`, which picks the command backend when the configured player
//! program is installed and falls back to the log backend otherwise.

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::config::{Backend, Config};
use crate::logger::Log;
use crate::soundscape::SoundName;

pub mod command;
pub mod driver;
pub mod log;

pub use driver::PlaybackDriver;

/// Trait for backends that can play looping sounds at a given volume.
///
/// Implementations own whatever they start; the driver never starts a sound
/// twice without stopping it or changing its volume in between.
pub trait PlaybackBackend {
    /// Start looping `asset` for `sound` at `volume` (0.0 to 1.0).
    fn start(&mut self, sound: SoundName, asset: &Path, volume: f32) -> Result<()>;

    /// Change the volume of a sound that is already playing.
    fn set_volume(&mut self, sound: SoundName, asset: &Path, volume: f32) -> Result<()>;

    /// Stop a playing sound.
    fn stop(&mut self, sound: SoundName) -> Result<()>;

    /// Sounds whose playback ended on its own since the last call.
    ///
    /// The default implementation reports nothing.
    fn take_finished(&mut self) -> Vec<SoundName> {
        Vec::new()
    }

    /// Get a human-readable name for this backend.
    fn backend_name(&self) -> &'static str;

    /// Perform backend-specific cleanup operations.
    ///
    /// Called during shutdown and when the backend is replaced after a reload.
    ///
    /// # Arguments
    /// * `debug_enabled` - Whether to show detailed cleanup logging
    fn cleanup(self: Box<Self>, debug_enabled: bool) {
        let _ = debug_enabled;
    }
}

/// Enumeration of available backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    Command,
    Log,
}

impl BackendType {
    /// Get the human-readable name for this backend type.
    pub fn name(&self) -> &'static str {
        match self {
            BackendType::Command => "Command",
            BackendType::Log => "Log",
        }
    }
}

/// Decide which backend to use for the given configuration.
///
/// `auto` selects the command backend when the player program can be found
/// and otherwise falls back to the log backend with a warning. An explicit
/// `command` backend with a missing player is an error.
pub fn detect_backend(config: &Config) -> Result<BackendType> {
    let player = config.player_command();

    match config.backend() {
        Backend::Log => Ok(BackendType::Log),
        Backend::Command => {
            if find_program(player).is_none() {
                Log::log_pipe();
                anyhow::bail!(
                    "Configuration specifies backend=\"command\" but the player \"{}\" was not found.\n\
                    \n\
                    To fix this, either:\n\
                    • Install {} or set player_command to an installed player\n\
                    • Switch to automatic detection: set backend=\"auto\" in ambientr.toml",
                    player,
                    player
                );
            }
            Ok(BackendType::Command)
        }
        Backend::Auto => {
            if find_program(player).is_some() {
                Ok(BackendType::Command)
            } else {
                Log::log_warning(&format!(
                    "Player \"{}\" not found, sounds will only be logged",
                    player
                ));
                Ok(BackendType::Log)
            }
        }
    }
}

/// Create a backend instance of the given type.
pub fn create_backend(
    backend_type: BackendType,
    config: &Config,
    debug_enabled: bool,
) -> Box<dyn PlaybackBackend> {
    match backend_type {
        BackendType::Command => Box::new(command::CommandBackend::new(
            config.player_command(),
            config.player_args(),
            debug_enabled,
        )),
        BackendType::Log => Box::new(log::LogBackend::new()),
    }
}

/// Locate an executable either by explicit path or through `PATH`.
pub fn find_program(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|path| path.is_file())
}
