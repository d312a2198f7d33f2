//! Command-line command handlers for ambientr.
//!
//! One-shot commands like --status, --reload and --unlock. The last two talk to
//! the running daemon by signalling the PID recorded in its lock file.

pub mod reload;
pub mod status;
pub mod unlock;

use anyhow::{Context, Result};
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;

use crate::lock::{default_lock_path, read_lock_pid};

/// PID of the running daemon, if its lock file names a live process.
pub fn running_daemon_pid() -> Option<u32> {
    let pid = read_lock_pid(&default_lock_path())?;
    // Signal 0 only checks that the process exists
    kill(Pid::from_raw(pid as i32), None).ok()?;
    Some(pid)
}

/// Send `signal` to the running daemon and return its PID.
pub(crate) fn signal_daemon(signal: Signal) -> Result<u32> {
    let Some(pid) = running_daemon_pid() else {
        anyhow::bail!("No running ambientr daemon found. Start one with `ambientr`.");
    };

    kill(Pid::from_raw(pid as i32), signal)
        .with_context(|| format!("Failed to send {} to ambientr (PID: {})", signal, pid))?;

    Ok(pid)
}
