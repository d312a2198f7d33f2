//! Implementation of the --reload command.
//!
//! Validates the configuration on disk, including that its playback backend
//! is usable, and then asks the running daemon to reload it with SIGUSR2.

use anyhow::Result;
use nix::sys::signal::Signal;

use crate::config::Config;
use crate::logger::Log;
use crate::playback;

/// Handle the --reload command.
pub fn handle_reload_command(debug_enabled: bool) -> Result<()> {
    Log::log_version();

    // Fail here with a clear message rather than in the daemon
    let config = Config::load()?;
    if debug_enabled {
        config.log_config();
    }
    playback::detect_backend(&config)?;

    Log::log_block_start("Signaling ambientr to reload...");
    let pid = super::signal_daemon(Signal::SIGUSR2)?;
    Log::log_decorated(&format!("Sent reload signal to ambientr (PID: {})", pid));
    Log::log_indented("The daemon will apply the new configuration on receipt");
    Log::log_end();

    Ok(())
}
