//! Sunrise and sunset calculations for a geographic location.
//!
//! The timeline only needs two instants per calendar day, so this module keeps a
//! deliberately narrow interface: the [`SolarSource`] trait answers "when does
//! the sun rise and set on this date here". [`SunriseSource`] is the production
//! implementation backed by the `sunrise` crate; tests substitute their own.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use sunrise::{Coordinates, SolarDay, SolarEvent};

use super::Location;
use crate::constants::{MAXIMUM_LATITUDE, MAXIMUM_LONGITUDE, MINIMUM_LATITUDE, MINIMUM_LONGITUDE};

/// Sunrise and sunset instants for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolarTimes {
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

/// Source of civil sunrise/sunset instants.
#[cfg_attr(test, mockall::automock)]
pub trait SolarSource {
    /// Return sunrise and sunset for `date` at `location`.
    fn solar_times(&self, date: NaiveDate, location: Location) -> Result<SolarTimes>;
}

/// Solar calculations using the `sunrise` crate (sun at 0° elevation).
#[derive(Debug, Default, Clone, Copy)]
pub struct SunriseSource;

impl SolarSource for SunriseSource {
    fn solar_times(&self, date: NaiveDate, location: Location) -> Result<SolarTimes> {
        calculate_sunrise_sunset(location.latitude, location.longitude, date).with_context(|| {
            format!(
                "Failed to calculate sunrise/sunset for {} on {}",
                location, date
            )
        })
    }
}

/// Calculate sunrise and sunset instants for a given location and date.
///
/// # Arguments
/// * `latitude` - Geographic latitude in degrees (-90 to +90)
/// * `longitude` - Geographic longitude in degrees (-180 to +180)
/// * `date` - Date for which to calculate sunrise/sunset
///
/// # Returns
/// * `Ok(SolarTimes)` - Sunrise and sunset in UTC
/// * `Err(_)` - If the coordinates are invalid
pub(crate) fn calculate_sunrise_sunset(
    latitude: f64,
    longitude: f64,
    date: NaiveDate,
) -> Result<SolarTimes> {
    if !(MINIMUM_LATITUDE..=MAXIMUM_LATITUDE).contains(&latitude) {
        anyhow::bail!(
            "Invalid latitude: {}. Must be between -90 and 90 degrees",
            latitude
        );
    }
    if !(MINIMUM_LONGITUDE..=MAXIMUM_LONGITUDE).contains(&longitude) {
        anyhow::bail!(
            "Invalid longitude: {}. Must be between -180 and 180 degrees",
            longitude
        );
    }

    let coord = Coordinates::new(latitude, longitude)
        .ok_or_else(|| anyhow::anyhow!("Failed to create coordinates"))?;
    let solar_day = SolarDay::new(coord, date);

    Ok(SolarTimes {
        sunrise: solar_day.event_time(SolarEvent::Sunrise),
        sunset: solar_day.event_time(SolarEvent::Sunset),
    })
}
