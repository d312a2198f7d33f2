//! Geographic inputs of the timeline: location, solar times and timezone.
//!
//! - **solar**: Sunrise/sunset instants for a calendar day
//! - **timezone**: Which local calendar a location lives in

use std::fmt;

pub mod solar;
pub mod timezone;

pub use solar::{SolarSource, SolarTimes, SunriseSource};
pub use timezone::{determine_timezone_from_coordinates, resolve_timezone};

/// A fixed geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lat_dir = if self.latitude >= 0.0 { "N" } else { "S" };
        let lon_dir = if self.longitude >= 0.0 { "E" } else { "W" };
        write!(
            f,
            "{:.4}°{}, {:.4}°{}",
            self.latitude.abs(),
            lat_dir,
            self.longitude.abs(),
            lon_dir
        )
    }
}
