use anyhow::Result;
use chrono::{DateTime, Utc};
use std::time::Duration;

use ambientr::args::{CliAction, ParsedArgs, display_help, display_version_info};
use ambientr::commands;
use ambientr::config::Config;
use ambientr::constants::*;
use ambientr::engine::{Resolution, resolve_with_config};
use ambientr::geo::SunriseSource;
use ambientr::lock::{InstanceLock, default_lock_path};
use ambientr::logger::Log;
use ambientr::playback::{self, PlaybackDriver};
use ambientr::signals::{SignalState, handle_signal_message, setup_signal_handler};
use ambientr::time_state::{Bracket, time_until_next_boundary};
use ambientr::utils::{format_duration, volume_to_percent};

fn main() -> Result<()> {
    let parsed_args = ParsedArgs::from_env();

    if let CliAction::Run { debug_enabled }
    | CliAction::Status { debug_enabled, .. }
    | CliAction::Reload { debug_enabled }
    | CliAction::Unlock { debug_enabled } = parsed_args.action
    {
        Log::set_debug_enabled(debug_enabled);
    }

    match parsed_args.action {
        CliAction::ShowVersion => {
            display_version_info();
            Ok(())
        }
        CliAction::ShowHelp => {
            display_help();
            Ok(())
        }
        CliAction::ShowHelpDueToError => {
            display_help();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::Status { debug_enabled, at } => {
            commands::status::handle_status_command(at, debug_enabled)
        }
        CliAction::Reload { debug_enabled } => {
            commands::reload::handle_reload_command(debug_enabled)
        }
        CliAction::Unlock { debug_enabled } => {
            commands::unlock::handle_unlock_command(debug_enabled)
        }
        CliAction::Run { debug_enabled } => run_daemon(debug_enabled),
    }
}

/// Run the soundscape daemon until a shutdown signal arrives.
fn run_daemon(debug_enabled: bool) -> Result<()> {
    Log::log_version();

    let lock = match InstanceLock::acquire(&default_lock_path())? {
        Some(lock) => lock,
        None => {
            Log::log_error(
                "Another instance of ambientr is already running.\n\
                • Use `ambientr --reload` to apply config changes to it.\n\
                • Kill ambientr before restarting.",
            );
            std::process::exit(EXIT_FAILURE);
        }
    };
    if debug_enabled {
        Log::log_decorated(&format!("Lock acquired at {}", lock.path().display()));
    }

    let signal_state = setup_signal_handler(debug_enabled)?;

    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            lock.release();
            return Err(e);
        }
    };
    config.log_config();

    let backend_type = match playback::detect_backend(&config) {
        Ok(backend_type) => backend_type,
        Err(e) => {
            lock.release();
            return Err(e);
        }
    };
    let backend = playback::create_backend(backend_type, &config, debug_enabled);
    let mut driver = PlaybackDriver::new(backend, &config.sound_dir(), config.autoplay());

    Log::log_block_start(&format!(
        "Playing through the {} backend",
        driver.backend_name()
    ));
    if !driver.is_unlocked() {
        Log::log_indented("Audio is locked until `ambientr --unlock` (SIGUSR1) is received");
    }

    let result = run_loop(&mut driver, &mut config, &signal_state, debug_enabled);
    if let Err(e) = &result {
        Log::log_critical(&format!("{:#}", e));
    }

    Log::log_block_start("Shutting down ambientr...");
    driver.shutdown(debug_enabled);
    lock.release();
    Log::log_end();

    result
}

/// The main loop: resolve, reconcile, then wait for the next tick or a signal.
fn run_loop(
    driver: &mut PlaybackDriver,
    config: &mut Config,
    signal_state: &SignalState,
    debug_enabled: bool,
) -> Result<()> {
    let mut current_bracket: Option<Bracket> = None;
    let mut last_tick: Option<DateTime<Utc>> = None;

    while signal_state.is_running() {
        let tz = config.timezone()?;
        let now_utc = Utc::now();
        let now = now_utc.with_timezone(&tz);

        if let Some(previous) = last_tick {
            let elapsed = (now_utc - previous).to_std().unwrap_or_default();
            let expected = config.update_interval()
                + Duration::from_secs(SLEEP_DETECTION_THRESHOLD_SECS);
            if elapsed > expected {
                Log::log_pipe();
                Log::log_decorated(&format!(
                    "Large time jump detected ({}). System may have resumed from sleep.",
                    format_duration(elapsed)
                ));
            }
        }
        last_tick = Some(now_utc);

        let resolution = resolve_with_config(&now, config, &SunriseSource)?;

        let bracket_changed = current_bracket != Some(resolution.bracket);
        if bracket_changed {
            log_resolution(&resolution);
            current_bracket = Some(resolution.bracket);
        }

        if let Err(e) = driver.apply(&resolution.sounds) {
            Log::log_warning(&format!("{:#}", e));
            Log::log_decorated("Will retry on next update...");
        }

        let next_change = match time_until_next_boundary(&resolution.boundaries, now_utc) {
            Some(remaining) => format!("Next change in {}", format_duration(remaining)),
            None => format!("Next change at {} tomorrow", resolution.bracket.next),
        };
        if bracket_changed {
            Log::log_decorated(&next_change);
        } else {
            Log::log_debug(&next_change);
        }

        if let Some(message) = signal_state.wait(config.update_interval()) {
            handle_signal_message(message, driver, config, signal_state, debug_enabled)?;
            // A reload may change the mix or the offsets, so resolve again
            current_bracket = None;
        }
    }

    Ok(())
}

/// Announce a newly entered interval and its mix.
fn log_resolution(resolution: &Resolution) {
    Log::log_block_start(&format!("Entering {}", resolution.bracket));
    if resolution.sounds.is_empty() {
        Log::log_indented("Silence");
    }
    for item in &resolution.sounds {
        Log::log_indented(&format!(
            "{} at {}%",
            item.sound,
            volume_to_percent(item.volume)
        ));
    }
}
