//! Application constants and default values for ambientr.
//!
//! This module contains the configuration defaults, validation limits,
//! and operational constants used throughout the application.

use crate::config::Backend;

// ═══ Application Configuration Defaults ═══
// These values are used when config options are not specified by the user

pub const DEFAULT_BACKEND: Backend = Backend::Auto;
pub const DEFAULT_AUTOPLAY: bool = true;
pub const DEFAULT_LATITUDE: f64 = 48.86; // Paris
pub const DEFAULT_LONGITUDE: f64 = 2.34;
pub const DEFAULT_UPDATE_INTERVAL: u64 = 30; // seconds between soundscape re-resolutions
pub const DEFAULT_MORNING_OFFSET: u64 = 60; // minutes after sunrise (morning1)
pub const DEFAULT_EVENING_OFFSET: u64 = 30; // minutes before sunset (evening)
pub const DEFAULT_NIGHT_OFFSET: u64 = 15; // minutes after sunset (night)
pub const DEFAULT_SOUND_DIR_NAME: &str = "sounds";

// ═══ Player Process Defaults ═══
// The command backend runs one looping player process per sound

pub const DEFAULT_PLAYER_COMMAND: &str = "mpv";
pub const DEFAULT_PLAYER_ARGS: &[&str] = &[
    "--no-video",
    "--really-quiet",
    "--loop-file=inf",
    "--volume={volume}",
];
pub const VOLUME_PLACEHOLDER: &str = "{volume}"; // replaced with the volume in percent

// ═══ Timeline Constants ═══

/// Local hour every "now" is normalized to before solar times are queried.
pub const REFERENCE_HOUR: u32 = 2;

// ═══ Validation Limits ═══
// These limits ensure user inputs are within reasonable ranges

pub const MINIMUM_UPDATE_INTERVAL: u64 = 5; // seconds
pub const MAXIMUM_UPDATE_INTERVAL: u64 = 300; // seconds (5 minutes max)

pub const MAXIMUM_MORNING_OFFSET: u64 = 360; // minutes (6 hours)
pub const MAXIMUM_EVENING_OFFSET: u64 = 180; // minutes
pub const MAXIMUM_NIGHT_OFFSET: u64 = 180; // minutes

pub const MINIMUM_VOLUME: f32 = 0.0;
pub const MAXIMUM_VOLUME: f32 = 1.0;

pub const MINIMUM_LATITUDE: f64 = -90.0;
pub const MAXIMUM_LATITUDE: f64 = 90.0;
pub const MINIMUM_LONGITUDE: f64 = -180.0;
pub const MAXIMUM_LONGITUDE: f64 = 180.0;

// ═══ Operational Constants ═══

pub const VOLUME_EPSILON: f32 = 0.001; // volumes closer than this are considered equal
pub const LOCK_FILE_NAME: &str = "ambientr.lock";
pub const SLEEP_DETECTION_THRESHOLD_SECS: u64 = 300; // wall clock jumps beyond this mean a suspend/resume

// ═══ Exit Codes ═══

pub const EXIT_FAILURE: i32 = 1; // General failure
