//! Signal handling for the ambientr daemon.
//!
//! A background thread turns POSIX signals into [`SignalMessage`]s on a
//! channel. The main loop waits on that channel between ticks, so any signal
//! wakes it immediately instead of after the current update interval.
//!
//! - SIGINT, SIGTERM, SIGHUP: shut down
//! - SIGUSR1: unlock audio, or restart all sounds when already unlocked
//! - SIGUSR2: reload the configuration

use anyhow::{Context, Result};
use signal_hook::{
    consts::signal::{SIGHUP, SIGINT, SIGTERM, SIGUSR1, SIGUSR2},
    iterator::Signals,
};
use std::{
    sync::Arc,
    sync::atomic::{AtomicBool, Ordering},
    sync::mpsc::{Receiver, RecvTimeoutError},
    thread,
    time::Duration,
};

use crate::config::Config;
use crate::logger::Log;
use crate::playback::{self, PlaybackDriver};

/// Unified signal message type for all signal-based communication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalMessage {
    /// Configuration reload signal (SIGUSR2)
    Reload,
    /// Audio unlock / refresh signal (SIGUSR1)
    Unlock,
    /// Shutdown signal (SIGTERM, SIGINT, SIGHUP)
    Shutdown,
}

/// Signal handling state shared between threads
pub struct SignalState {
    /// Atomic flag indicating if the application should keep running
    pub running: Arc<AtomicBool>,
    /// Channel receiver for unified signal messages
    pub signal_receiver: Receiver<SignalMessage>,
}

impl SignalState {
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Wait up to `timeout` for the next signal message.
    ///
    /// Returns `None` when the timeout elapses. A disconnected channel means
    /// the signal thread is gone, which is treated as a shutdown request.
    pub fn wait(&self, timeout: Duration) -> Option<SignalMessage> {
        match self.signal_receiver.recv_timeout(timeout) {
            Ok(message) => Some(message),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(SignalMessage::Shutdown),
        }
    }
}

/// Whether the playback settings differ enough to need a new driver.
fn playback_settings_changed(old: &Config, new: &Config) -> bool {
    old.backend() != new.backend()
        || old.player_command() != new.player_command()
        || old.player_args() != new.player_args()
        || old.sound_dir() != new.sound_dir()
}

/// Handle a signal message received in the main loop.
///
/// Reload failures keep the previous configuration and only log a warning;
/// a broken config file must not take down a running daemon.
pub fn handle_signal_message(
    signal_msg: SignalMessage,
    driver: &mut PlaybackDriver,
    config: &mut Config,
    signal_state: &SignalState,
    debug_enabled: bool,
) -> Result<()> {
    match signal_msg {
        SignalMessage::Shutdown => {
            signal_state.running.store(false, Ordering::SeqCst);
        }
        SignalMessage::Unlock => {
            if let Err(e) = driver.unlock() {
                Log::log_warning(&format!("{:#}", e));
                Log::log_decorated("Will retry on next update...");
            }
        }
        SignalMessage::Reload => match Config::load() {
            Ok(new_config) => {
                if playback_settings_changed(config, &new_config) {
                    let backend_type = match playback::detect_backend(&new_config) {
                        Ok(backend_type) => backend_type,
                        Err(e) => {
                            Log::log_warning(&format!("Failed to reload config: {:#}", e));
                            Log::log_indented("Keeping the previous configuration");
                            return Ok(());
                        }
                    };
                    let backend = playback::create_backend(backend_type, &new_config, debug_enabled);
                    let unlocked = new_config.autoplay() || driver.is_unlocked();
                    let new_driver = PlaybackDriver::new(backend, &new_config.sound_dir(), unlocked);

                    let old_driver = std::mem::replace(driver, new_driver);
                    old_driver.shutdown(debug_enabled);

                    Log::log_decorated(&format!(
                        "Playback restarted with the {} backend",
                        driver.backend_name()
                    ));
                }

                *config = new_config;
                config.log_config();
            }
            Err(e) => {
                Log::log_warning(&format!("Failed to reload config: {:#}", e));
                Log::log_indented("Keeping the previous configuration");
            }
        },
    }

    Ok(())
}

/// Set up signal handling for the application.
///
/// Returns a SignalState containing the running flag and signal receiver channel.
/// Spawns a background thread that monitors for signals and sends appropriate
/// messages via the channel.
pub fn setup_signal_handler(debug_enabled: bool) -> Result<SignalState> {
    let running = Arc::new(AtomicBool::new(true));
    let (signal_sender, signal_receiver) = std::sync::mpsc::channel::<SignalMessage>();

    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP, SIGUSR1, SIGUSR2])
        .context("failed to register signal handlers")?;

    let running_clone = running.clone();

    thread::spawn(move || {
        for sig in signals.forever() {
            let message = match sig {
                SIGUSR1 => {
                    Log::log_pipe();
                    Log::log_decorated("Received audio unlock signal");
                    SignalMessage::Unlock
                }
                SIGUSR2 => {
                    Log::log_pipe();
                    Log::log_decorated("Received configuration reload signal");
                    SignalMessage::Reload
                }
                _ => {
                    let user_message = match sig {
                        SIGINT => {
                            if debug_enabled {
                                "Received SIGINT (Ctrl+C), initiating graceful shutdown..."
                            } else {
                                "Received interrupt signal, initiating graceful shutdown..."
                            }
                        }
                        SIGTERM => "Received termination request, initiating graceful shutdown...",
                        SIGHUP => "Received hangup signal, initiating graceful shutdown...",
                        _ => "Received shutdown signal, initiating graceful shutdown...",
                    };
                    Log::log_pipe();
                    Log::log_decorated(user_message);

                    running_clone.store(false, Ordering::SeqCst);
                    SignalMessage::Shutdown
                }
            };

            if signal_sender.send(message).is_err() {
                // Main loop is gone
                break;
            }
        }
    });

    Ok(SignalState {
        running,
        signal_receiver,
    })
}
