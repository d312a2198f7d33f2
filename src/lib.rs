//! # ambientr
//!
//! An ambient soundscape daemon that follows the sun.
//!
//! The day is split into four intervals by solar events at a fixed location
//! (first light, full morning, evening and night). Each interval maps to a mix
//! of looping nature sounds, and the daemon keeps the running mix in line with
//! the interval the current time falls in.
//!
//! ## Architecture
//!
//! - **args**: Command-line parsing
//! - **commands**: One-shot commands (--status, --reload, --unlock)
//! - **config**: Configuration loading, validation, and default generation
//! - **constants**: Application-wide constants and defaults
//! - **engine**: Time to soundscape resolution
//! - **geo**: Location, sunrise/sunset and timezone lookup
//! - **lock**: Single-instance lock holding the daemon PID
//! - **logger**: Structured logging with visual formatting
//! - **playback**: Playback backends and the driver that reconciles them
//! - **signals**: Signal handling for the daemon loop
//! - **soundscape**: Sound names, mix entries and the interval lookup
//! - **time_state**: Where "now" falls among the day's boundaries
//! - **timeline**: The day's boundary instants
//! - **utils**: Formatting and path helpers

pub mod args;
pub mod commands;
pub mod config;
pub mod constants;
pub mod engine;
pub mod geo;
pub mod lock;
pub mod logger;
pub mod playback;
pub mod signals;
pub mod soundscape;
pub mod time_state;
pub mod timeline;
pub mod utils;

// Re-export important types for easier access
pub use config::Config;
pub use engine::{Resolution, resolve_soundscape, resolve_with_config};
pub use logger::{Log, LogLevel};
pub use soundscape::{SoundItem, SoundMixEntry, SoundName};
pub use time_state::{Bracket, resolve_bracket};
pub use timeline::{TimeBoundary, TimeEventKind};
