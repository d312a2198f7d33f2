//! Implementation of the --status command.
//!
//! Resolves the soundscape once, for the current time or for a given time of
//! day today, and prints the day's time steps, the interval the time falls in
//! and the sounds that would play. Nothing is played.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::config::Config;
use crate::engine::{Resolution, resolve_with_config};
use crate::geo::SunriseSource;
use crate::logger::Log;
use crate::time_state::{next_boundary, time_until_next_boundary};
use crate::utils::{format_duration, volume_to_percent};

/// Handle the --status command.
pub fn handle_status_command(at: Option<NaiveTime>, debug_enabled: bool) -> Result<()> {
    Log::log_version();

    let config = Config::load()?;
    if debug_enabled {
        config.log_config();
    }

    let tz = config.timezone()?;
    let now = status_instant(Utc::now().with_timezone(&tz), at)?;
    let resolution = resolve_with_config(&now, &config, &SunriseSource)?;

    let mut lines = format_report(&now, &resolution).into_iter();
    if let Some(title) = lines.next() {
        Log::log_block_start(&title);
    }
    for line in lines {
        Log::log_indented(&line);
    }
    Log::log_end();

    Ok(())
}

/// The instant to report on: `now`, or today's `at` in the same timezone.
fn status_instant(now: DateTime<Tz>, at: Option<NaiveTime>) -> Result<DateTime<Tz>> {
    let Some(time) = at else {
        return Ok(now);
    };

    let naive = now.date_naive().and_time(time);
    now.timezone()
        .from_local_datetime(&naive)
        .earliest()
        .with_context(|| format!("{} does not exist today in {}", time.format("%H:%M"), now.timezone()))
}

/// Human readable report of one resolution. The first line is the title.
fn format_report(now: &DateTime<Tz>, resolution: &Resolution) -> Vec<String> {
    let tz = now.timezone();
    let now_utc = now.with_timezone(&Utc);
    let mut lines = Vec::new();

    lines.push(format!(
        "Soundscape at {} ({})",
        now.format("%Y-%m-%d %H:%M"),
        tz
    ));
    lines.push(format!(
        "Between {} and {}",
        resolution.bracket.prev, resolution.bracket.next
    ));

    lines.push("Time steps:".to_string());
    for boundary in &resolution.boundaries {
        lines.push(format!(
            "  {:<9}{}",
            boundary.kind.as_str(),
            boundary.instant.with_timezone(&tz).format("%H:%M")
        ));
    }

    match (
        next_boundary(&resolution.boundaries, now_utc),
        time_until_next_boundary(&resolution.boundaries, now_utc),
    ) {
        (Some(boundary), Some(remaining)) => lines.push(format!(
            "Next change: {} at {} (in {})",
            boundary.kind,
            boundary.instant.with_timezone(&tz).format("%H:%M"),
            format_duration(remaining)
        )),
        _ => lines.push(format!(
            "Next change: {} tomorrow",
            resolution.bracket.next
        )),
    }

    if resolution.sounds.is_empty() {
        lines.push("Sounds: silence".to_string());
    } else {
        lines.push("Sounds:".to_string());
        for item in &resolution.sounds {
            lines.push(format!(
                "  {:<9}{}%",
                item.sound.as_str(),
                volume_to_percent(item.volume)
            ));
        }
    }

    lines
}
