use chrono::NaiveDate;
use chrono_tz::Tz;
use proptest::prelude::*;

use ambientr::geo::{
    Location, SolarSource, SunriseSource, determine_timezone_from_coordinates, resolve_timezone,
};

/// Coordinates away from the polar circles, where the sun rises and sets daily.
fn temperate_location_strategy() -> impl Strategy<Value = Location> {
    (-60.0f64..60.0, -150.0f64..150.0).prop_map(|(lat, lon)| Location::new(lat, lon))
}

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 1u32..=365).prop_map(|(year, ordinal)| {
        NaiveDate::from_yo_opt(year, ordinal).unwrap()
    })
}

proptest! {
    /// Sunset follows sunrise by less than a day.
    #[test]
    fn test_sunset_follows_sunrise(
        location in temperate_location_strategy(),
        date in date_strategy()
    ) {
        let times = SunriseSource.solar_times(date, location).unwrap();
        prop_assert!(times.sunset > times.sunrise);
        prop_assert!(times.sunset - times.sunrise < chrono::Duration::hours(24));
    }

    /// Out of range coordinates are rejected rather than computed.
    #[test]
    fn test_invalid_latitude_rejected(
        lat in prop_oneof![-1000.0f64..-90.001, 90.001f64..1000.0],
        date in date_strategy()
    ) {
        prop_assert!(SunriseSource.solar_times(date, Location::new(lat, 0.0)).is_err());
    }

    /// Timezone lookup never panics on valid coordinates.
    #[test]
    fn test_timezone_lookup_total(
        lat in -90.0f64..=90.0,
        lon in -180.0f64..=180.0
    ) {
        let _ = determine_timezone_from_coordinates(lat, lon);
    }
}

#[test]
fn test_major_cities_timezones() {
    let cities = [
        (40.7128, -74.0060, "America/New_York"),
        (51.5074, -0.1278, "Europe/London"),
        (35.6762, 139.6503, "Asia/Tokyo"),
        (-33.8688, 151.2093, "Australia/Sydney"),
        (48.8566, 2.3522, "Europe/Paris"),
    ];

    for (lat, lon, expected) in cities {
        let expected: Tz = expected.parse().unwrap();
        assert_eq!(determine_timezone_from_coordinates(lat, lon), expected);
    }
}

#[test]
fn test_configured_timezone_wins() {
    let paris = Location::new(48.8566, 2.3522);
    assert_eq!(
        resolve_timezone(Some("Asia/Tokyo"), paris).unwrap(),
        Tz::Asia__Tokyo
    );
    assert_eq!(resolve_timezone(None, paris).unwrap(), Tz::Europe__Paris);
    assert!(resolve_timezone(Some("Mars/Olympus_Mons"), paris).is_err());
}
