//! External player process management.
//!
//! Each audible sound is one child process of a command line player (mpv by
//! default) looping the sound's asset file. Players cannot change volume from
//! the outside, so a volume change restarts the process with the new value.
//! Processes are killed and reaped when stopped, when the backend is cleaned
//! up, and as a last resort when dropped.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;
use std::process::{Child, Command, Stdio};

use super::PlaybackBackend;
use crate::constants::VOLUME_PLACEHOLDER;
use crate::logger::Log;
use crate::soundscape::SoundName;
use crate::utils::{path_for_display, volume_to_percent};

/// A player process started for one sound.
struct PlayerProcess {
    child: Child,
    sound: SoundName,
}

impl PlayerProcess {
    fn spawn(program: &str, args: &[String], asset: &Path, sound: SoundName) -> Result<Self> {
        let child = Command::new(program)
            .args(args)
            .arg(asset)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to start {} for {}", program, sound))?;

        Ok(Self { child, sound })
    }

    fn pid(&self) -> u32 {
        self.child.id()
    }

    /// Whether the player exited on its own.
    fn has_exited(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(Some(_)))
    }

    /// Terminate the process and reap it.
    fn stop(mut self, debug_enabled: bool) {
        self.terminate(debug_enabled);
    }

    fn terminate(&mut self, debug_enabled: bool) {
        let pid = self.child.id();

        match self.child.try_wait() {
            Ok(Some(status)) => {
                if debug_enabled {
                    Log::log_debug(&format!(
                        "Player for {} (PID: {}) already exited with {}",
                        self.sound, pid, status
                    ));
                }
            }
            Ok(None) => match self.child.kill() {
                Ok(()) => {
                    let _ = self.child.wait(); // reap
                    if debug_enabled {
                        Log::log_debug(&format!(
                            "Player for {} (PID: {}) terminated",
                            self.sound, pid
                        ));
                    }
                }
                Err(e) => {
                    Log::log_error(&format!(
                        "Failed to terminate player for {} (PID: {}): {}",
                        self.sound, pid, e
                    ));
                }
            },
            Err(e) => {
                Log::log_error(&format!(
                    "Error checking player status for {}: {}",
                    self.sound, e
                ));
            }
        }
    }
}

impl Drop for PlayerProcess {
    fn drop(&mut self) {
        self.terminate(false);
    }
}

/// Backend running one external player process per sound.
pub struct CommandBackend {
    program: String,
    args: Vec<String>,
    players: BTreeMap<SoundName, PlayerProcess>,
    debug_enabled: bool,
}

impl CommandBackend {
    pub fn new(program: &str, args: Vec<String>, debug_enabled: bool) -> Self {
        Self {
            program: program.to_string(),
            args,
            players: BTreeMap::new(),
            debug_enabled,
        }
    }

    fn stop_player(&mut self, sound: SoundName) {
        if let Some(player) = self.players.remove(&sound) {
            player.stop(self.debug_enabled);
        }
    }
}

/// Player arguments with the volume placeholder filled in.
///
/// # Arguments
/// * `args` - Configured player arguments, possibly containing `{volume}`
/// * `volume` - Volume from 0.0 to 1.0, substituted as a whole percentage
pub fn build_args(args: &[String], volume: f32) -> Vec<String> {
    let percent = volume_to_percent(volume).to_string();
    args.iter()
        .map(|arg| arg.replace(VOLUME_PLACEHOLDER, &percent))
        .collect()
}

impl PlaybackBackend for CommandBackend {
    fn start(&mut self, sound: SoundName, asset: &Path, volume: f32) -> Result<()> {
        if !asset.is_file() {
            anyhow::bail!("Sound file not found: {}", path_for_display(asset));
        }

        // Never leave two players running for the same sound
        self.stop_player(sound);

        let args = build_args(&self.args, volume);
        let player = PlayerProcess::spawn(&self.program, &args, asset, sound)?;

        if self.debug_enabled {
            Log::log_debug(&format!(
                "Started {} for {} at {}% (PID: {})",
                self.program,
                sound,
                volume_to_percent(volume),
                player.pid()
            ));
        }

        self.players.insert(sound, player);
        Ok(())
    }

    fn set_volume(&mut self, sound: SoundName, asset: &Path, volume: f32) -> Result<()> {
        self.start(sound, asset, volume)
    }

    fn stop(&mut self, sound: SoundName) -> Result<()> {
        self.stop_player(sound);
        Ok(())
    }

    fn take_finished(&mut self) -> Vec<SoundName> {
        let finished: Vec<SoundName> = self
            .players
            .iter_mut()
            .filter_map(|(sound, player)| player.has_exited().then_some(*sound))
            .collect();

        for sound in &finished {
            self.stop_player(*sound);
        }

        finished
    }

    fn backend_name(&self) -> &'static str {
        "Command"
    }

    fn cleanup(mut self: Box<Self>, debug_enabled: bool) {
        if debug_enabled && !self.players.is_empty() {
            Log::log_decorated(&format!(
                "Stopping {} player process(es)...",
                self.players.len()
            ));
        }

        let players = std::mem::take(&mut self.players);
        for player in players.into_values() {
            player.stop(debug_enabled);
        }
    }
}
