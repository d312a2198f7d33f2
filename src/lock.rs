//! Single-instance lock for the daemon.
//!
//! The lock file lives in `$XDG_RUNTIME_DIR` (or `/tmp`) and holds the PID of
//! the running daemon, which the `--reload` and `--unlock` commands read to
//! find who to signal. The file is opened without truncation and only rewritten
//! after the exclusive lock is held, so a second instance that fails to lock
//! never wipes the PID of the first one.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::constants::LOCK_FILE_NAME;
use crate::logger::Log;

/// Location of the lock file.
pub fn default_lock_path() -> PathBuf {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(runtime_dir).join(LOCK_FILE_NAME)
}

/// An acquired instance lock. Released by [`InstanceLock::release`].
pub struct InstanceLock {
    file: File,
    path: PathBuf,
}

impl InstanceLock {
    /// Try to become the single running instance.
    ///
    /// # Returns
    /// - `Ok(Some(lock))` if the lock was acquired and our PID recorded
    /// - `Ok(None)` if another instance holds the lock
    /// - `Err` if the lock file cannot be opened or written
    pub fn acquire(path: &Path) -> Result<Option<Self>> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("Failed to open lock file {}", path.display()))?;

        if file.try_lock_exclusive().is_err() {
            return Ok(None);
        }

        file.set_len(0).context("Failed to truncate lock file")?;
        file.seek(SeekFrom::Start(0))
            .context("Failed to rewind lock file")?;
        writeln!(file, "{}", std::process::id()).context("Failed to write PID to lock file")?;
        file.flush().context("Failed to flush lock file")?;

        Ok(Some(Self {
            file,
            path: path.to_path_buf(),
        }))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Unlock and remove the lock file.
    pub fn release(self) {
        let _ = FileExt::unlock(&self.file);
        drop(self.file);

        if let Err(e) = fs::remove_file(&self.path) {
            Log::log_decorated(&format!("Warning: Failed to remove lock file: {}", e));
        } else {
            Log::log_decorated("Lock file removed successfully");
        }
    }
}

/// PID recorded in the lock file, if the file exists and is well formed.
pub fn read_lock_pid(path: &Path) -> Option<u32> {
    let content = fs::read_to_string(path).ok()?;
    content.lines().next()?.trim().parse().ok()
}
