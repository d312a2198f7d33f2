//! Implementation of the --unlock command.
//!
//! Sends SIGUSR1 to the running daemon. A daemon started with
//! `autoplay = false` begins playing; one that is already playing restarts
//! every sound.

use anyhow::Result;
use nix::sys::signal::Signal;

use crate::logger::Log;

/// Handle the --unlock command.
pub fn handle_unlock_command(debug_enabled: bool) -> Result<()> {
    Log::log_version();

    Log::log_block_start("Signaling ambientr to unlock audio...");
    let pid = super::signal_daemon(Signal::SIGUSR1)?;
    Log::log_decorated(&format!("Sent unlock signal to ambientr (PID: {})", pid));
    if debug_enabled {
        Log::log_indented("Playback starts, or restarts if it was already running");
    }
    Log::log_end();

    Ok(())
}
