//! Configuration system for ambientr with validation and geo coordinate overrides.
//!
//! The configuration lives in `$XDG_CONFIG_HOME/ambientr/ambientr.toml` and is
//! created with defaults on first run. All top-level settings are optional;
//! missing ones are filled from [`crate::constants`] while loading.
//!
//! ```toml
//! #[Ambientr configuration]
//! backend = "auto"          # "auto", "command" or "log"
//! autoplay = true           # Start playing without waiting for SIGUSR1
//!
//! #[Location]
//! latitude = 48.86
//! longitude = 2.34
//! timezone = "Europe/Paris" # Optional, detected from the coordinates
//!
//! #[Timeline]
//! update_interval = 30      # Seconds between soundscape updates
//! morning_offset = 60       # Minutes after sunrise
//! evening_offset = 30       # Minutes before sunset
//! night_offset = 15         # Minutes after sunset
//!
//! #[Playback]
//! sound_dir = "~/.local/share/ambientr/sounds"
//! player_command = "mpv"
//! player_args = ["--no-video", "--really-quiet", "--loop-file=inf", "--volume={volume}"]
//!
//! [[soundscape]]
//! prev = "night"
//! next = "morning0"
//! items = [{ sound = "night", volume = 1.0 }, { sound = "river", volume = 0.4 }]
//! ```
//!
//! An optional `geo.toml` next to the main file overrides `latitude` and
//! `longitude`, so the main file can be shared without the location.
//!
//! Without any `[[soundscape]]` table the stock mix table is used. An explicit
//! `soundscape = []` means silence all day.

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::*;
use crate::geo::{Location, resolve_timezone};
use crate::logger::Log;
use crate::soundscape::{SoundMixEntry, default_soundscape, duplicate_brackets, missing_brackets};
use crate::timeline::{DailyOffsets, TimeEventKind};

/// Geographic configuration stored separately in `geo.toml`.
#[derive(Debug, Deserialize, Clone)]
struct GeoConfig {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// Backend selection for audio playback.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Use `command` if the player program is installed, `log` otherwise.
    Auto,
    /// One external player process per sound.
    Command,
    /// Dry run: only log what would be played.
    Log,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Auto => "auto",
            Backend::Command => "command",
            Backend::Log => "log",
        }
    }
}

/// Configuration structure for ambientr settings.
///
/// Loaded from `ambientr.toml`. Every field is optional in the file; after
/// loading through [`Config::load`] or [`Config::load_from_path`] all of them
/// except `timezone` are populated.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    pub backend: Option<Backend>,
    /// Whether playback may start without an explicit unlock.
    pub autoplay: Option<bool>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// IANA timezone name; detected from the coordinates when absent.
    pub timezone: Option<String>,
    pub update_interval: Option<u64>, // seconds
    pub morning_offset: Option<u64>,  // minutes after sunrise
    pub evening_offset: Option<u64>,  // minutes before sunset
    pub night_offset: Option<u64>,    // minutes after sunset
    pub sound_dir: Option<PathBuf>,
    pub player_command: Option<String>,
    pub player_args: Option<Vec<String>>,
    /// Mix table; absent in the file means the stock table.
    pub soundscape: Option<Vec<SoundMixEntry>>,
}

/// Default location of the sound assets.
pub fn default_sound_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("ambientr").join(DEFAULT_SOUND_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SOUND_DIR_NAME))
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("ambientr").join("ambientr.toml"))
    }

    /// Get the path to the geo.toml file (in the same directory as ambientr.toml)
    pub fn get_geo_path() -> Result<PathBuf> {
        let config_path = Self::get_config_path()?;
        Ok(geo_path_for(&config_path))
    }

    /// Create a default configuration file at `path`.
    ///
    /// If a `geo.toml` already sits next to it, the coordinates are left out
    /// of the main file.
    pub fn create_default_config(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let use_geo_file = geo_path_for(path).exists();

        let mut builder = ConfigBuilder::new()
            .add_section("Ambientr configuration")
            .add_setting(
                "backend",
                &format!("\"{}\"", DEFAULT_BACKEND.as_str()),
                "Backend to use: \"auto\", \"command\" or \"log\"",
            )
            .add_setting(
                "autoplay",
                &DEFAULT_AUTOPLAY.to_string(),
                "Start playing immediately (false waits for SIGUSR1)",
            )
            .add_section("Location");

        if use_geo_file {
            builder = builder.add_comment("Coordinates are read from geo.toml");
        } else {
            builder = builder
                .add_setting(
                    "latitude",
                    &format!("{:.6}", DEFAULT_LATITUDE),
                    "Geographic latitude (-90 to 90)",
                )
                .add_setting(
                    "longitude",
                    &format!("{:.6}", DEFAULT_LONGITUDE),
                    "Geographic longitude (-180 to 180)",
                );
        }

        let player_args = DEFAULT_PLAYER_ARGS
            .iter()
            .map(|arg| format!("\"{}\"", arg))
            .collect::<Vec<_>>()
            .join(", ");

        let config_content = builder
            .add_comment("timezone = \"Europe/Paris\" (detected from the coordinates if unset)")
            .add_section("Timeline")
            .add_setting(
                "update_interval",
                &DEFAULT_UPDATE_INTERVAL.to_string(),
                &format!(
                    "Seconds between soundscape updates ({}-{})",
                    MINIMUM_UPDATE_INTERVAL, MAXIMUM_UPDATE_INTERVAL
                ),
            )
            .add_setting(
                "morning_offset",
                &DEFAULT_MORNING_OFFSET.to_string(),
                "Minutes after sunrise when the morning ends",
            )
            .add_setting(
                "evening_offset",
                &DEFAULT_EVENING_OFFSET.to_string(),
                "Minutes before sunset when the evening starts",
            )
            .add_setting(
                "night_offset",
                &DEFAULT_NIGHT_OFFSET.to_string(),
                "Minutes after sunset when the night starts",
            )
            .add_section("Playback")
            .add_setting(
                "sound_dir",
                &format!(
                    "\"{}\"",
                    crate::utils::path_for_display(&default_sound_dir())
                ),
                "Directory holding birds.mp3, night.mp3 and river.mp3",
            )
            .add_setting(
                "player_command",
                &format!("\"{}\"", DEFAULT_PLAYER_COMMAND),
                "Player for the command backend",
            )
            .add_setting(
                "player_args",
                &format!("[{}]", player_args),
                "{volume} is replaced with the volume in percent",
            )
            .build();

        let content = format!(
            "{}\n\n#[Soundscape]\n{}",
            config_content,
            render_soundscape(&default_soundscape())
        );

        fs::write(path, content)
            .with_context(|| format!("Failed to write default config to {}", path.display()))?;

        Log::log_indented(&format!(
            "Created default configuration at {}",
            crate::utils::path_for_display(path)
        ));

        Ok(())
    }

    fn apply_defaults_and_validate_fields(config: &mut Config) -> Result<()> {
        if config.backend.is_none() {
            config.backend = Some(DEFAULT_BACKEND);
        }

        if config.autoplay.is_none() {
            config.autoplay = Some(DEFAULT_AUTOPLAY);
        }

        if let Some(interval) = config.update_interval {
            if !(MINIMUM_UPDATE_INTERVAL..=MAXIMUM_UPDATE_INTERVAL).contains(&interval) {
                anyhow::bail!(
                    "Update interval must be between {} and {} seconds (got {})",
                    MINIMUM_UPDATE_INTERVAL,
                    MAXIMUM_UPDATE_INTERVAL,
                    interval
                );
            }
        } else {
            config.update_interval = Some(DEFAULT_UPDATE_INTERVAL);
        }

        config.morning_offset = Some(validate_offset(
            "Morning offset",
            config.morning_offset,
            DEFAULT_MORNING_OFFSET,
            MAXIMUM_MORNING_OFFSET,
        )?);
        config.evening_offset = Some(validate_offset(
            "Evening offset",
            config.evening_offset,
            DEFAULT_EVENING_OFFSET,
            MAXIMUM_EVENING_OFFSET,
        )?);
        config.night_offset = Some(validate_offset(
            "Night offset",
            config.night_offset,
            DEFAULT_NIGHT_OFFSET,
            MAXIMUM_NIGHT_OFFSET,
        )?);

        if config.latitude.is_none() {
            config.latitude = Some(DEFAULT_LATITUDE);
        }
        if config.longitude.is_none() {
            config.longitude = Some(DEFAULT_LONGITUDE);
        }

        match &config.player_command {
            Some(command) if command.trim().is_empty() => {
                anyhow::bail!("player_command must not be empty");
            }
            Some(_) => {}
            None => config.player_command = Some(DEFAULT_PLAYER_COMMAND.to_string()),
        }

        if config.player_args.is_none() {
            config.player_args = Some(DEFAULT_PLAYER_ARGS.iter().map(|s| s.to_string()).collect());
        }

        config.sound_dir = Some(match config.sound_dir.take() {
            Some(dir) => crate::utils::expand_tilde(&dir),
            None => default_sound_dir(),
        });

        if config.soundscape.is_none() {
            config.soundscape = Some(default_soundscape());
        }

        Ok(())
    }

    /// Load configuration from a specific path.
    ///
    /// Does not create a default config if the path doesn't exist.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Configuration file not found at specified path: {}",
                path.display()
            );
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        Self::apply_defaults_and_validate_fields(&mut config)?;

        // A relative sound directory is relative to the config file
        if let (Some(dir), Some(parent)) = (&config.sound_dir, path.parent()) {
            if dir.is_relative() {
                config.sound_dir = Some(parent.join(dir));
            }
        }

        Self::load_geo_override_from_path(&mut config, path)?;

        validate_config(&config)?;

        Ok(config)
    }

    /// Load geo.toml next to `config_path`, if present.
    ///
    /// A malformed or unreadable geo.toml only produces a warning.
    fn load_geo_override_from_path(config: &mut Config, config_path: &Path) -> Result<()> {
        let geo_path = geo_path_for(config_path);
        if !geo_path.exists() {
            return Ok(());
        }

        match fs::read_to_string(&geo_path) {
            Ok(content) => match toml::from_str::<GeoConfig>(&content) {
                Ok(geo_config) => {
                    if let Some(lat) = geo_config.latitude {
                        config.latitude = Some(lat);
                    }
                    if let Some(lon) = geo_config.longitude {
                        config.longitude = Some(lon);
                    }

                    Log::log_indented(&format!(
                        "Loaded geographic overrides from {}",
                        crate::utils::path_for_display(&geo_path)
                    ));
                }
                Err(e) => {
                    Log::log_warning(&format!(
                        "Failed to parse geo.toml: {}. Using coordinates from main config.",
                        e
                    ));
                }
            },
            Err(e) => {
                Log::log_warning(&format!(
                    "Failed to read geo.toml: {}. Using coordinates from main config.",
                    e
                ));
            }
        }

        Ok(())
    }

    /// Load the configuration from the default location, creating it first if
    /// it does not exist yet.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)
                .context("Failed to create default config during load")?;
        }

        Self::load_from_path(&config_path).with_context(|| {
            format!(
                "Failed to load configuration from {}",
                config_path.display()
            )
        })
    }

    pub fn log_config(&self) {
        let config_path = Self::get_config_path()
            .unwrap_or_else(|_| PathBuf::from("~/.config/ambientr/ambientr.toml"));

        Log::log_block_start(&format!(
            "Loaded configuration from {}",
            crate::utils::path_for_display(&config_path)
        ));

        Log::log_indented(&format!("Backend: {}", self.backend().as_str()));
        Log::log_indented(&format!("Autoplay: {}", self.autoplay()));
        Log::log_indented(&format!("Location: {}", self.location()));
        match &self.timezone {
            Some(tz) => Log::log_indented(&format!("Timezone: {}", tz)),
            None => Log::log_indented("Timezone: detected from location"),
        }
        Log::log_indented(&format!(
            "Update interval: {} seconds",
            self.update_interval.unwrap_or(DEFAULT_UPDATE_INTERVAL)
        ));
        Log::log_indented(&format!(
            "Offsets: morning +{}min, evening -{}min, night +{}min",
            self.morning_offset.unwrap_or(DEFAULT_MORNING_OFFSET),
            self.evening_offset.unwrap_or(DEFAULT_EVENING_OFFSET),
            self.night_offset.unwrap_or(DEFAULT_NIGHT_OFFSET)
        ));
        Log::log_indented(&format!(
            "Sound directory: {}",
            crate::utils::path_for_display(&self.sound_dir())
        ));
        if self.backend() != Backend::Log {
            Log::log_indented(&format!("Player: {}", self.player_command()));
        }
        Log::log_indented(&format!(
            "Soundscape: {} mix entries",
            self.soundscape().len()
        ));
    }

    // ═══ Accessors with defaults ═══

    pub fn backend(&self) -> Backend {
        self.backend.unwrap_or(DEFAULT_BACKEND)
    }

    pub fn autoplay(&self) -> bool {
        self.autoplay.unwrap_or(DEFAULT_AUTOPLAY)
    }

    pub fn location(&self) -> Location {
        Location::new(
            self.latitude.unwrap_or(DEFAULT_LATITUDE),
            self.longitude.unwrap_or(DEFAULT_LONGITUDE),
        )
    }

    pub fn offsets(&self) -> DailyOffsets {
        DailyOffsets::from_minutes(
            self.morning_offset.unwrap_or(DEFAULT_MORNING_OFFSET),
            self.evening_offset.unwrap_or(DEFAULT_EVENING_OFFSET),
            self.night_offset.unwrap_or(DEFAULT_NIGHT_OFFSET),
        )
    }

    /// The mix table. Empty on a config that was never loaded.
    pub fn soundscape(&self) -> &[SoundMixEntry] {
        self.soundscape.as_deref().unwrap_or_default()
    }

    /// The timezone whose calendar day the timeline follows.
    pub fn timezone(&self) -> Result<Tz> {
        resolve_timezone(self.timezone.as_deref(), self.location())
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_interval.unwrap_or(DEFAULT_UPDATE_INTERVAL))
    }

    pub fn sound_dir(&self) -> PathBuf {
        self.sound_dir.clone().unwrap_or_else(default_sound_dir)
    }

    pub fn player_command(&self) -> &str {
        self.player_command
            .as_deref()
            .unwrap_or(DEFAULT_PLAYER_COMMAND)
    }

    pub fn player_args(&self) -> Vec<String> {
        match &self.player_args {
            Some(args) => args.clone(),
            None => DEFAULT_PLAYER_ARGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

fn geo_path_for(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) => parent.join("geo.toml"),
        None => PathBuf::from("geo.toml"),
    }
}

fn validate_offset(name: &str, value: Option<u64>, default: u64, maximum: u64) -> Result<u64> {
    match value {
        Some(minutes) if minutes > maximum => anyhow::bail!(
            "{} must be between 0 and {} minutes (got {})",
            name,
            maximum,
            minutes
        ),
        Some(minutes) => Ok(minutes),
        None => Ok(default),
    }
}

/// Validation of the settings that span several fields.
pub fn validate_config(config: &Config) -> Result<()> {
    let location = config.location();
    if !(MINIMUM_LATITUDE..=MAXIMUM_LATITUDE).contains(&location.latitude) {
        anyhow::bail!(
            "Latitude must be between -90 and 90 degrees (got {})",
            location.latitude
        );
    }
    if !(MINIMUM_LONGITUDE..=MAXIMUM_LONGITUDE).contains(&location.longitude) {
        anyhow::bail!(
            "Longitude must be between -180 and 180 degrees (got {})",
            location.longitude
        );
    }

    if let Some(name) = &config.timezone {
        name.parse::<Tz>()
            .map_err(|e| anyhow::anyhow!(e))
            .with_context(|| format!("Unknown timezone \"{}\" in config", name))?;
    }

    validate_soundscape(config.soundscape())
}

fn validate_soundscape(entries: &[SoundMixEntry]) -> Result<()> {
    for (index, entry) in entries.iter().enumerate() {
        let position = index + 1;

        if entry.prev == TimeEventKind::Now || entry.next == TimeEventKind::Now {
            anyhow::bail!(
                "Soundscape entry {} uses the reserved event \"now\"",
                position
            );
        }

        if !entry.bracket().is_cyclic_adjacent() {
            anyhow::bail!(
                "Soundscape entry {} ({}) does not connect adjacent events; expected next = \"{}\"",
                position,
                entry.bracket(),
                entry
                    .prev
                    .next_in_cycle()
                    .map(|kind| kind.as_str())
                    .unwrap_or("?")
            );
        }

        for (item_index, item) in entry.items.iter().enumerate() {
            if !(MINIMUM_VOLUME..=MAXIMUM_VOLUME).contains(&item.volume) {
                anyhow::bail!(
                    "Soundscape entry {} ({}): volume of {} must be between {} and {} (got {})",
                    position,
                    entry.bracket(),
                    item.sound,
                    MINIMUM_VOLUME,
                    MAXIMUM_VOLUME,
                    item.volume
                );
            }

            if entry.items[..item_index]
                .iter()
                .any(|other| other.sound == item.sound)
            {
                anyhow::bail!(
                    "Soundscape entry {} ({}) lists {} more than once",
                    position,
                    entry.bracket(),
                    item.sound
                );
            }
        }
    }

    for bracket in duplicate_brackets(entries) {
        Log::log_warning(&format!(
            "Soundscape has several entries for {}; only the first one is used",
            bracket
        ));
    }

    for bracket in missing_brackets(entries) {
        Log::log_info(&format!("No sounds configured for {}", bracket));
    }

    Ok(())
}

/// Render mix entries as `[[soundscape]]` tables.
fn render_soundscape(entries: &[SoundMixEntry]) -> String {
    let mut tables = Vec::new();

    for entry in entries {
        let items = entry
            .items
            .iter()
            .map(|item| format!("{{ sound = \"{}\", volume = {:?} }}", item.sound, item.volume))
            .collect::<Vec<_>>()
            .join(", ");

        tables.push(format!(
            "[[soundscape]]\nprev = \"{}\"\nnext = \"{}\"\nitems = [{}]\n",
            entry.prev, entry.next, items
        ));
    }

    tables.join("\n")
}

/// Builder for creating dynamically-aligned configuration files.
///
/// Comments of all settings are aligned on the widest setting line, so the
/// generated file stays tidy when defaults in constants.rs change.
struct ConfigBuilder {
    entries: Vec<ConfigEntry>,
}

enum ConfigEntry {
    Section(String),
    Comment(String),
    Setting { line: String, comment: String },
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn add_section(mut self, title: &str) -> Self {
        self.entries.push(ConfigEntry::Section(format!("#[{}]", title)));
        self
    }

    fn add_comment(mut self, text: &str) -> Self {
        self.entries.push(ConfigEntry::Comment(format!("# {}", text)));
        self
    }

    fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.entries.push(ConfigEntry::Setting {
            line: format!("{} = {}", key, value),
            comment: format!("# {}", comment),
        });
        self
    }

    fn build(self) -> String {
        let max_width = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                ConfigEntry::Setting { line, .. } => Some(line.len()),
                _ => None,
            })
            .max()
            .unwrap_or(0)
            + 1; // one space between setting and comment

        let mut result = Vec::new();
        let mut first_section = true;

        for entry in self.entries {
            match entry {
                ConfigEntry::Section(title) => {
                    if !first_section {
                        result.push(String::new());
                    }
                    result.push(title);
                    first_section = false;
                }
                ConfigEntry::Comment(text) => result.push(text),
                ConfigEntry::Setting { line, comment } => {
                    let padding = " ".repeat(max_width - line.len());
                    result.push(format!("{}{}{}", line, padding, comment));
                }
            }
        }

        result.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soundscape::{SoundItem, SoundName};
    use serial_test::serial;
    use tempfile::tempdir;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let config_path = dir.join("ambientr.toml");
        fs::write(&config_path, content).unwrap();
        config_path
    }

    #[test]
    #[serial]
    fn test_config_load_default_creation() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("ambientr").join("ambientr.toml");

        let original = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe {
            std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());
        }

        let result = Config::load();

        unsafe {
            match original {
                Some(val) => std::env::set_var("XDG_CONFIG_HOME", val),
                None => std::env::remove_var("XDG_CONFIG_HOME"),
            }
        }

        let config = result.unwrap();
        assert!(config_path.exists());
        assert_eq!(config.soundscape(), default_soundscape().as_slice());
    }

    #[test]
    fn test_table_filled_only_by_loading() {
        assert!(Config::default().soundscape().is_empty());

        let temp_dir = tempdir().unwrap();
        let config_path = write_config(temp_dir.path(), "backend = \"log\"\n");
        let config = Config::load_from_path(&config_path).unwrap();
        assert_eq!(config.soundscape(), default_soundscape().as_slice());

        let table = config.soundscape();
        assert_eq!(table[3].prev, TimeEventKind::Night);
        assert_eq!(table[3].items[0].sound, SoundName::Night);
    }

    #[test]
    fn test_default_config_round_trips() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("ambientr.toml");

        Config::create_default_config(&config_path).unwrap();
        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("backend"));
        assert!(content.contains("morning_offset"));
        assert!(content.contains("[[soundscape]]"));

        let config = Config::load_from_path(&config_path).unwrap();
        assert_eq!(config.backend(), Backend::Auto);
        assert!(config.autoplay());
        assert_eq!(config.location(), Location::new(DEFAULT_LATITUDE, DEFAULT_LONGITUDE));
        assert_eq!(config.offsets(), DailyOffsets::default());
        assert_eq!(config.soundscape(), default_soundscape().as_slice());
        assert_eq!(config.player_command(), DEFAULT_PLAYER_COMMAND);
        assert_eq!(config.player_args().len(), DEFAULT_PLAYER_ARGS.len());
    }

    #[test]
    fn test_default_config_comments_are_aligned() {
        let content = ConfigBuilder::new()
            .add_section("Test")
            .add_setting("a", "1", "short key")
            .add_setting("longer_key", "true", "long key")
            .build();

        let columns: Vec<usize> = content
            .lines()
            .filter(|line| line.contains(" = "))
            .map(|line| line.find('#').unwrap())
            .collect();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0], columns[1]);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let config_path = write_config(temp_dir.path(), "");

        let config = Config::load_from_path(&config_path).unwrap();
        assert_eq!(config.update_interval(), Duration::from_secs(DEFAULT_UPDATE_INTERVAL));
        assert_eq!(config.soundscape(), default_soundscape().as_slice());
        assert_eq!(config.sound_dir(), default_sound_dir());
    }

    #[test]
    fn test_explicit_empty_soundscape_is_silence() {
        let temp_dir = tempdir().unwrap();
        let config_path = write_config(temp_dir.path(), "soundscape = []\n");

        let config = Config::load_from_path(&config_path).unwrap();
        assert!(config.soundscape().is_empty());
    }

    #[test]
    fn test_custom_soundscape_parsing() {
        let temp_dir = tempdir().unwrap();
        let config_path = write_config(
            temp_dir.path(),
            r#"
backend = "log"
morning_offset = 240

[[soundscape]]
prev = "morning1"
next = "evening"
items = [{ name = "birds", volume = 0.7 }]

[[soundscape]]
prev = "evening"
next = "night"
"#,
        );

        let config = Config::load_from_path(&config_path).unwrap();
        assert_eq!(config.backend(), Backend::Log);
        assert_eq!(config.offsets().morning, chrono::Duration::minutes(240));

        let table = config.soundscape();
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].items, vec![SoundItem::new(SoundName::Birds, 0.7)]);
        assert!(table[1].items.is_empty());
    }

    #[test]
    fn test_non_adjacent_entry_is_rejected() {
        let temp_dir = tempdir().unwrap();
        let config_path = write_config(
            temp_dir.path(),
            "[[soundscape]]\nprev = \"morning0\"\nnext = \"evening\"\n",
        );

        let err = Config::load_from_path(&config_path).unwrap_err();
        assert!(format!("{:#}", err).contains("adjacent"));
    }

    #[test]
    fn test_reserved_now_is_rejected() {
        let temp_dir = tempdir().unwrap();
        let config_path = write_config(
            temp_dir.path(),
            "[[soundscape]]\nprev = \"now\"\nnext = \"morning0\"\n",
        );

        let err = Config::load_from_path(&config_path).unwrap_err();
        assert!(format!("{:#}", err).contains("reserved"));
    }

    #[test]
    fn test_volume_out_of_range_is_rejected() {
        let temp_dir = tempdir().unwrap();
        let config_path = write_config(
            temp_dir.path(),
            "[[soundscape]]\nprev = \"evening\"\nnext = \"night\"\nitems = [{ sound = \"river\", volume = 1.5 }]\n",
        );

        let err = Config::load_from_path(&config_path).unwrap_err();
        assert!(format!("{:#}", err).contains("volume"));
    }

    #[test]
    fn test_repeated_sound_in_entry_is_rejected() {
        let temp_dir = tempdir().unwrap();
        let config_path = write_config(
            temp_dir.path(),
            r#"
[[soundscape]]
prev = "evening"
next = "night"
items = [{ sound = "river", volume = 0.5 }, { sound = "river", volume = 0.2 }]
"#,
        );

        assert!(Config::load_from_path(&config_path).is_err());
    }

    #[test]
    fn test_duplicate_brackets_are_accepted() {
        let temp_dir = tempdir().unwrap();
        let config_path = write_config(
            temp_dir.path(),
            r#"
[[soundscape]]
prev = "evening"
next = "night"
items = [{ sound = "river", volume = 0.5 }]

[[soundscape]]
prev = "evening"
next = "night"
items = [{ sound = "birds", volume = 0.2 }]
"#,
        );

        let config = Config::load_from_path(&config_path).unwrap();
        assert_eq!(config.soundscape().len(), 2);
    }

    #[test]
    fn test_field_ranges() {
        let temp_dir = tempdir().unwrap();

        for content in [
            "update_interval = 1",
            "update_interval = 301",
            "morning_offset = 361",
            "evening_offset = 181",
            "night_offset = 500",
            "latitude = 91.0",
            "longitude = -181.0",
            "player_command = \"  \"",
            "timezone = \"Nowhere/Special\"",
            "backend = \"pulseaudio\"",
        ] {
            let config_path = write_config(temp_dir.path(), content);
            assert!(
                Config::load_from_path(&config_path).is_err(),
                "{} should be rejected",
                content
            );
        }

        for content in [
            "update_interval = 5",
            "update_interval = 300",
            "morning_offset = 0",
            "night_offset = 180",
            "timezone = \"Europe/Berlin\"",
        ] {
            let config_path = write_config(temp_dir.path(), content);
            assert!(
                Config::load_from_path(&config_path).is_ok(),
                "{} should be accepted",
                content
            );
        }
    }

    #[test]
    fn test_config_malformed_toml() {
        let result: Result<Config, _> = toml::from_str("autoplay = \"sometimes\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let temp_dir = tempdir().unwrap();
        assert!(Config::load_from_path(&temp_dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_relative_sound_dir_follows_config_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = write_config(temp_dir.path(), "sound_dir = \"assets\"\n");

        let config = Config::load_from_path(&config_path).unwrap();
        assert_eq!(config.sound_dir(), temp_dir.path().join("assets"));
    }

    #[test]
    fn test_geo_toml_overrides_main_config() {
        let temp_dir = tempdir().unwrap();
        let config_path = write_config(
            temp_dir.path(),
            "latitude = 40.7128\nlongitude = -74.0060\n",
        );
        fs::write(
            temp_dir.path().join("geo.toml"),
            "latitude = 51.5074\nlongitude = -0.1278\n",
        )
        .unwrap();

        let config = Config::load_from_path(&config_path).unwrap();
        assert_eq!(config.location(), Location::new(51.5074, -0.1278));
    }

    #[test]
    fn test_malformed_geo_toml_fallback() {
        let temp_dir = tempdir().unwrap();
        let config_path = write_config(temp_dir.path(), "latitude = 40.7128\nlongitude = -74.0060\n");
        fs::write(temp_dir.path().join("geo.toml"), "latitude = [oops").unwrap();

        let config = Config::load_from_path(&config_path).unwrap();
        assert_eq!(config.location(), Location::new(40.7128, -74.0060));
    }

    #[test]
    fn test_default_config_with_existing_geo_toml() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("ambientr.toml");
        fs::write(
            temp_dir.path().join("geo.toml"),
            "latitude = 35.6762\nlongitude = 139.6503\n",
        )
        .unwrap();

        Config::create_default_config(&config_path).unwrap();
        let content = fs::read_to_string(&config_path).unwrap();
        assert!(!content.contains("latitude ="));

        let config = Config::load_from_path(&config_path).unwrap();
        assert_eq!(config.location(), Location::new(35.6762, 139.6503));
        assert_eq!(config.timezone().unwrap(), Tz::Asia__Tokyo);
    }
}
