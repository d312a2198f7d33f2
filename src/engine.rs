//! Time-to-soundscape resolution.
//!
//! Composes the timeline, the position resolver and the mix table lookup into
//! one pure evaluation: given "now", return which interval of the day we are in
//! and which sounds belong to it. Nothing is cached between calls, so each
//! evaluation stands on its own and repeating it with the same inputs gives the
//! same answer.

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};

use crate::config::Config;
use crate::geo::{Location, SolarSource};
use crate::soundscape::{ResolvedSoundSet, SoundMixEntry, resolve_sounds};
use crate::time_state::{Bracket, resolve_bracket};
use crate::timeline::{DailyOffsets, TimeBoundary, build_daily_boundaries};

/// Result of one evaluation of the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The day's boundaries, in daily order.
    pub boundaries: [TimeBoundary; 4],
    pub bracket: Bracket,
    pub sounds: ResolvedSoundSet,
}

/// Resolve the soundscape for `now`.
pub fn resolve_soundscape<T: TimeZone>(
    now: &DateTime<T>,
    location: Location,
    offsets: &DailyOffsets,
    entries: &[SoundMixEntry],
    source: &dyn SolarSource,
) -> Result<Resolution> {
    let boundaries = build_daily_boundaries(now, location, offsets, source)?;
    let bracket = resolve_bracket(&boundaries, now.with_timezone(&Utc))?;
    let sounds = resolve_sounds(&bracket, entries);

    Ok(Resolution {
        boundaries,
        bracket,
        sounds,
    })
}

/// Resolve the soundscape for `now` using the location, offsets and mix table
/// of a loaded config.
pub fn resolve_with_config<T: TimeZone>(
    now: &DateTime<T>,
    config: &Config,
    source: &dyn SolarSource,
) -> Result<Resolution> {
    resolve_soundscape(
        now,
        config.location(),
        &config.offsets(),
        config.soundscape(),
        source,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::test_constants::*;
    use crate::geo::solar::{MockSolarSource, SolarTimes};
    use crate::soundscape::{SoundItem, SoundName, default_soundscape};
    use crate::timeline::TimeEventKind;
    use chrono::NaiveDate;

    fn utc(date: NaiveDate, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.from_utc_datetime(&date.and_hms_opt(hour, minute, 0).unwrap())
    }

    fn today_at(hour: u32, minute: u32) -> DateTime<Utc> {
        utc(NaiveDate::from_ymd_opt(2024, 6, 21).unwrap(), hour, minute)
    }

    fn standard_source() -> MockSolarSource {
        let mut source = MockSolarSource::new();
        source.expect_solar_times().returning(|date, _| {
            Ok(SolarTimes {
                sunrise: utc(date, TEST_SUNRISE_HOUR, 0),
                sunset: utc(date, TEST_SUNSET_HOUR, 0),
            })
        });
        source
    }

    fn resolve_at(hour: u32, minute: u32, entries: &[SoundMixEntry]) -> Resolution {
        resolve_soundscape(
            &today_at(hour, minute),
            Location::new(TEST_LATITUDE, TEST_LONGITUDE),
            &DailyOffsets::default(),
            entries,
            &standard_source(),
        )
        .unwrap()
    }

    #[test]
    fn test_standard_day_mixes() {
        use SoundName::*;

        let table = default_soundscape();
        let cases = [
            ((5, 0), vec![SoundItem::new(Night, 1.0), SoundItem::new(River, 0.4)]),
            ((6, 30), vec![SoundItem::new(River, 1.0)]),
            ((12, 0), vec![SoundItem::new(Birds, 0.5), SoundItem::new(River, 0.5)]),
            ((19, 45), vec![SoundItem::new(River, 1.0)]),
            ((21, 0), vec![SoundItem::new(Night, 1.0), SoundItem::new(River, 0.4)]),
        ];

        for ((hour, minute), expected) in cases {
            let resolution = resolve_at(hour, minute, &table);
            assert_eq!(resolution.sounds, expected, "at {:02}:{:02}", hour, minute);
        }
    }

    #[test]
    fn test_resolution_carries_timeline() {
        let resolution = resolve_at(12, 0, &default_soundscape());

        assert_eq!(
            resolution.bracket,
            Bracket {
                prev: TimeEventKind::Morning1,
                next: TimeEventKind::Evening
            }
        );
        assert_eq!(resolution.boundaries[0].instant, today_at(6, 0));
        assert_eq!(resolution.boundaries[3].instant, today_at(20, 15));
    }

    #[test]
    fn test_empty_table_is_silent_all_day() {
        for hour in 0..24 {
            assert!(resolve_at(hour, 0, &[]).sounds.is_empty());
        }
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let table = default_soundscape();
        for hour in [0, 6, 7, 13, 19, 20, 23] {
            assert_eq!(resolve_at(hour, 17, &table), resolve_at(hour, 17, &table));
        }
    }

    #[test]
    fn test_solar_failure_propagates() {
        let mut source = MockSolarSource::new();
        source
            .expect_solar_times()
            .returning(|_, _| Err(anyhow::anyhow!("polar night")));

        let result = resolve_soundscape(
            &today_at(12, 0),
            Location::new(TEST_LATITUDE, TEST_LONGITUDE),
            &DailyOffsets::default(),
            &default_soundscape(),
            &source,
        );

        let err = result.unwrap_err();
        assert!(format!("{:#}", err).contains("polar night"));
    }
}
