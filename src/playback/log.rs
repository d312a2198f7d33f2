//! Dry-run backend that reports soundscape changes without producing audio.

use anyhow::Result;
use std::path::Path;

use super::PlaybackBackend;
use crate::logger::Log;
use crate::soundscape::SoundName;
use crate::utils::volume_to_percent;

/// Backend that only logs what would be played.
#[derive(Debug, Default)]
pub struct LogBackend;

impl LogBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PlaybackBackend for LogBackend {
    fn start(&mut self, sound: SoundName, asset: &Path, volume: f32) -> Result<()> {
        if !asset.exists() {
            Log::log_warning(&format!(
                "Sound file for {} is missing: {}",
                sound,
                crate::utils::path_for_display(asset)
            ));
        }
        Log::log_decorated(&format!(
            "Playing {} at {}%",
            sound,
            volume_to_percent(volume)
        ));
        Ok(())
    }

    fn set_volume(&mut self, sound: SoundName, _asset: &Path, volume: f32) -> Result<()> {
        Log::log_decorated(&format!(
            "Changing {} volume to {}%",
            sound,
            volume_to_percent(volume)
        ));
        Ok(())
    }

    fn stop(&mut self, sound: SoundName) -> Result<()> {
        Log::log_decorated(&format!("Stopping {}", sound));
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "Log"
    }
}
