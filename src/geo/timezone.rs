//! Timezone selection for the local calendar day.
//!
//! The timeline normalizes "now" to a local reference hour, so it needs to know
//! which timezone the configured location lives in. An explicit IANA name from
//! the config wins; otherwise the zone is looked up from the coordinates using
//! the tzf-rs boundary data.

use anyhow::{Context, Result};
use chrono_tz::Tz;
use std::sync::OnceLock;
use tzf_rs::DefaultFinder;

use super::Location;

/// Determine the timezone for given coordinates using timezone boundary data.
///
/// Falls back to the `TZ` environment variable and finally UTC when the
/// coordinates do not resolve to a known zone (open ocean, for instance).
pub fn determine_timezone_from_coordinates(latitude: f64, longitude: f64) -> Tz {
    static FINDER: OnceLock<DefaultFinder> = OnceLock::new();
    let finder = FINDER.get_or_init(DefaultFinder::new);

    // tzf-rs uses (longitude, latitude) order
    let tz_name = finder.get_tz_name(longitude, latitude);

    match tz_name.parse::<Tz>() {
        Ok(tz) => tz,
        Err(_) => match std::env::var("TZ") {
            Ok(tz_str) => tz_str.parse().unwrap_or(Tz::UTC),
            Err(_) => Tz::UTC,
        },
    }
}

/// Pick the timezone for a location, honouring an explicitly configured name.
pub fn resolve_timezone(configured: Option<&str>, location: Location) -> Result<Tz> {
    match configured {
        Some(name) => name
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!(e))
            .with_context(|| format!("Unknown timezone \"{}\"", name)),
        None => Ok(determine_timezone_from_coordinates(
            location.latitude,
            location.longitude,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_cities() {
        let cases = [
            (48.86, 2.34, Tz::Europe__Paris),
            (51.5074, -0.1278, Tz::Europe__London),
            (35.6762, 139.6503, Tz::Asia__Tokyo),
        ];

        for (lat, lon, expected) in cases {
            assert_eq!(determine_timezone_from_coordinates(lat, lon), expected);
        }
    }

    #[test]
    fn test_configured_timezone_wins() {
        let tz = resolve_timezone(Some("America/Chicago"), Location::new(48.86, 2.34)).unwrap();
        assert_eq!(tz, Tz::America__Chicago);
    }

    #[test]
    fn test_unknown_timezone_is_an_error() {
        let result = resolve_timezone(Some("Mars/Olympus_Mons"), Location::new(48.86, 2.34));
        assert!(result.is_err());
    }

    #[test]
    fn test_detected_timezone() {
        let tz = resolve_timezone(None, Location::new(48.86, 2.34)).unwrap();
        assert_eq!(tz, Tz::Europe__Paris);
    }
}
