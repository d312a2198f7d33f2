//! Daily timeline of named boundaries derived from sunrise and sunset.
//!
//! A day is cut into four intervals by four boundaries, always in the same
//! order: `morning0` (sunrise), `morning1` (a while after sunrise), `evening`
//! (shortly before sunset) and `night` (shortly after sunset). After `night`
//! the cycle wraps to the next day's `morning0`.
//!
//! The timeline is rebuilt from scratch on every resolution. To keep it stable
//! over the whole day, the caller's "now" is first normalized to a fixed local
//! reference hour, so a call at 00:05 and a call at 23:55 ask the solar source
//! about the same calendar date.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    DEFAULT_EVENING_OFFSET, DEFAULT_MORNING_OFFSET, DEFAULT_NIGHT_OFFSET, REFERENCE_HOUR,
};
use crate::geo::{Location, SolarSource};
use crate::logger::Log;

/// Named boundaries of a day.
///
/// `Now` is reserved: the resolution logic never produces nor consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeEventKind {
    Morning0,
    Morning1,
    Evening,
    Night,
    Now,
}

/// The four kinds of the daily ring, in their order within one day.
pub const DAILY_CYCLE: [TimeEventKind; 4] = [
    TimeEventKind::Morning0,
    TimeEventKind::Morning1,
    TimeEventKind::Evening,
    TimeEventKind::Night,
];

impl TimeEventKind {
    /// The kind following this one in the daily ring.
    ///
    /// `Night` is followed by the next day's `Morning0`. `Now` is not part of
    /// the ring and has no successor.
    pub fn next_in_cycle(self) -> Option<Self> {
        match self {
            TimeEventKind::Morning0 => Some(TimeEventKind::Morning1),
            TimeEventKind::Morning1 => Some(TimeEventKind::Evening),
            TimeEventKind::Evening => Some(TimeEventKind::Night),
            TimeEventKind::Night => Some(TimeEventKind::Morning0),
            TimeEventKind::Now => None,
        }
    }

    /// The kind preceding this one in the daily ring.
    pub fn previous_in_cycle(self) -> Option<Self> {
        match self {
            TimeEventKind::Morning0 => Some(TimeEventKind::Night),
            TimeEventKind::Morning1 => Some(TimeEventKind::Morning0),
            TimeEventKind::Evening => Some(TimeEventKind::Morning1),
            TimeEventKind::Night => Some(TimeEventKind::Evening),
            TimeEventKind::Now => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeEventKind::Morning0 => "morning0",
            TimeEventKind::Morning1 => "morning1",
            TimeEventKind::Evening => "evening",
            TimeEventKind::Night => "night",
            TimeEventKind::Now => "now",
        }
    }
}

impl fmt::Display for TimeEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named instant of the daily timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBoundary {
    pub kind: TimeEventKind,
    pub instant: DateTime<Utc>,
}

impl TimeBoundary {
    pub fn new(kind: TimeEventKind, instant: DateTime<Utc>) -> Self {
        Self { kind, instant }
    }
}

/// Offsets of the derived boundaries relative to sunrise and sunset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyOffsets {
    /// `morning1` = sunrise + morning
    pub morning: Duration,
    /// `evening` = sunset - evening
    pub evening: Duration,
    /// `night` = sunset + night
    pub night: Duration,
}

impl DailyOffsets {
    pub fn from_minutes(morning: u64, evening: u64, night: u64) -> Self {
        Self {
            morning: Duration::minutes(morning as i64),
            evening: Duration::minutes(evening as i64),
            night: Duration::minutes(night as i64),
        }
    }
}

impl Default for DailyOffsets {
    fn default() -> Self {
        Self::from_minutes(
            DEFAULT_MORNING_OFFSET,
            DEFAULT_EVENING_OFFSET,
            DEFAULT_NIGHT_OFFSET,
        )
    }
}

/// Normalize `now` to the reference hour of its local calendar day.
///
/// When the reference hour does not exist locally (a DST gap), the naive
/// reference time is read as UTC instead, which keeps the calendar date.
pub fn reference_instant<T: TimeZone>(now: &DateTime<T>) -> Result<DateTime<T>> {
    let tz = now.timezone();
    let naive = now
        .date_naive()
        .and_hms_opt(REFERENCE_HOUR, 0, 0)
        .context("Invalid reference hour")?;

    Ok(tz
        .from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&naive)))
}

/// Build the four boundaries of the calendar day containing `now`.
///
/// # Arguments
/// * `now` - Current instant in the location's timezone
/// * `location` - Where the sun is observed
/// * `offsets` - Offsets of morning1, evening and night
/// * `source` - Astronomical time source
///
/// # Returns
/// Boundaries in daily order: morning0, morning1, evening, night
///
/// # Errors
/// Fails when the solar source fails or returns a sunset that is not after
/// the sunrise.
pub fn build_daily_boundaries<T: TimeZone>(
    now: &DateTime<T>,
    location: Location,
    offsets: &DailyOffsets,
    source: &dyn SolarSource,
) -> Result<[TimeBoundary; 4]> {
    let reference = reference_instant(now)?;
    let date: NaiveDate = reference.date_naive();

    let times = source
        .solar_times(date, location)
        .with_context(|| format!("No solar times for {} at {}", date, location))?;

    if times.sunset <= times.sunrise {
        anyhow::bail!(
            "Solar times for {} at {} are not usable: sunset ({}) is not after sunrise ({})",
            date,
            location,
            times.sunset,
            times.sunrise
        );
    }

    let boundaries = [
        TimeBoundary::new(TimeEventKind::Morning0, times.sunrise),
        TimeBoundary::new(TimeEventKind::Morning1, times.sunrise + offsets.morning),
        TimeBoundary::new(TimeEventKind::Evening, times.sunset - offsets.evening),
        TimeBoundary::new(TimeEventKind::Night, times.sunset + offsets.night),
    ];

    if boundaries.windows(2).any(|pair| pair[0].instant >= pair[1].instant) {
        Log::log_warning(&format!(
            "Timeline for {} is not strictly increasing (day too short for the configured offsets)",
            date
        ));
    }

    Ok(boundaries)
}
