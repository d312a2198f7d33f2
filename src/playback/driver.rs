//! Reconciliation of the resolved soundscape against what is playing.
//!
//! The host hands every freshly resolved sound set to [`PlaybackDriver::apply`].
//! The driver compares it with the sounds it started earlier and only issues the
//! difference to the backend: new sounds are started, vanished sounds are
//! stopped and sounds whose volume changed are adjusted. Because the driver is
//! owned by the single host loop, the most recent set always wins.
//!
//! Playback may be gated: a locked driver records the desired set but does not
//! play anything until [`PlaybackDriver::unlock`] is called.

use anyhow::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::PlaybackBackend;
use crate::constants::VOLUME_EPSILON;
use crate::logger::Log;
use crate::soundscape::{ResolvedSoundSet, SoundItem, SoundName};

pub struct PlaybackDriver {
    backend: Box<dyn PlaybackBackend>,
    sound_dir: PathBuf,
    unlocked: bool,
    desired: ResolvedSoundSet,
    playing: BTreeMap<SoundName, f32>,
}

impl PlaybackDriver {
    /// Create a driver around `backend`.
    ///
    /// # Arguments
    /// * `backend` - Backend that produces the audio
    /// * `sound_dir` - Directory holding the sound asset files
    /// * `unlocked` - Whether playback may start right away
    pub fn new(backend: Box<dyn PlaybackBackend>, sound_dir: &Path, unlocked: bool) -> Self {
        Self {
            backend,
            sound_dir: sound_dir.to_path_buf(),
            unlocked,
            desired: Vec::new(),
            playing: BTreeMap::new(),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Sounds currently playing with their volume.
    pub fn playing(&self) -> &BTreeMap<SoundName, f32> {
        &self.playing
    }

    /// Make `sounds` the set that should be audible.
    ///
    /// While locked the set is only remembered. Sounds that fail to start are
    /// not recorded as playing, so the next call retries them.
    ///
    /// # Errors
    /// Returns one error summarizing every sound the backend failed on. The
    /// remaining sounds are still applied.
    pub fn apply(&mut self, sounds: &[SoundItem]) -> Result<()> {
        self.desired = sounds.to_vec();

        if !self.unlocked {
            return Ok(());
        }

        self.reconcile()
    }

    /// Allow playback to start.
    ///
    /// On an already unlocked driver every sound is restarted, which recovers
    /// from players that went silent without exiting.
    pub fn unlock(&mut self) -> Result<()> {
        if self.unlocked {
            Log::log_decorated("Refreshing audio...");
            self.stop_all();
        } else {
            Log::log_decorated("Audio unlocked");
            self.unlocked = true;
        }

        self.reconcile()
    }

    /// Stop everything and release the backend.
    pub fn shutdown(mut self, debug_enabled: bool) {
        self.stop_all();
        self.backend.cleanup(debug_enabled);
    }

    fn asset_path(&self, sound: SoundName) -> PathBuf {
        self.sound_dir.join(sound.file_name())
    }

    fn stop_all(&mut self) {
        let sounds: Vec<SoundName> = self.playing.keys().copied().collect();
        for sound in sounds {
            if let Err(e) = self.backend.stop(sound) {
                Log::log_warning(&format!("Failed to stop {}: {:#}", sound, e));
            }
            self.playing.remove(&sound);
        }
    }

    fn reconcile(&mut self) -> Result<()> {
        let mut failures: Vec<String> = Vec::new();

        for sound in self.backend.take_finished() {
            if self.playing.remove(&sound).is_some() {
                Log::log_warning(&format!("Playback of {} stopped unexpectedly", sound));
            }
        }

        // First occurrence of a sound wins
        let mut wanted: Vec<SoundItem> = Vec::with_capacity(self.desired.len());
        for item in &self.desired {
            if !wanted.iter().any(|w| w.sound == item.sound) {
                wanted.push(*item);
            }
        }

        let to_stop: Vec<SoundName> = self
            .playing
            .keys()
            .filter(|sound| !wanted.iter().any(|item| item.sound == **sound))
            .copied()
            .collect();

        for sound in to_stop {
            match self.backend.stop(sound) {
                Ok(()) => {
                    self.playing.remove(&sound);
                }
                Err(e) => failures.push(format!("{}: {:#}", sound, e)),
            }
        }

        for item in wanted {
            let asset = self.asset_path(item.sound);

            let result = match self.playing.get(&item.sound) {
                Some(current) if (current - item.volume).abs() < VOLUME_EPSILON => continue,
                Some(_) => self.backend.set_volume(item.sound, &asset, item.volume),
                None => self.backend.start(item.sound, &asset, item.volume),
            };

            match result {
                Ok(()) => {
                    self.playing.insert(item.sound, item.volume);
                }
                Err(e) => {
                    self.playing.remove(&item.sound);
                    failures.push(format!("{}: {:#}", item.sound, e));
                }
            }
        }

        if !failures.is_empty() {
            anyhow::bail!("Failed to play {}", failures.join("; "));
        }

        Ok(())
    }
}
