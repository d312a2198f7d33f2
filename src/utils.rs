//! Utility functions shared across the codebase.
//!
//! Small formatting and path helpers used by the logger output, the config
//! loader and the player backends.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Convert a volume in the range 0.0 to 1.0 into a whole percentage.
///
/// Values outside the range are clamped.
///
/// # Examples
/// ```
/// use ambientr::utils::volume_to_percent;
/// assert_eq!(volume_to_percent(0.4), 40);
/// assert_eq!(volume_to_percent(1.0), 100);
/// ```
pub fn volume_to_percent(volume: f32) -> u32 {
    (volume.clamp(0.0, 1.0) * 100.0).round() as u32
}

/// Format a duration as hours and minutes, e.g. "2h 05m" or "12m".
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use ambientr::utils::format_duration;
/// assert_eq!(format_duration(Duration::from_secs(7500)), "2h 05m");
/// assert_eq!(format_duration(Duration::from_secs(59)), "0m");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_minutes = duration.as_secs() / 60;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 {
        format!("{}h {:02}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Shorten a path for display by replacing the home directory with `~`.
pub fn path_for_display(path: &Path) -> String {
    match dirs::home_dir() {
        Some(home) => match path.strip_prefix(&home) {
            Ok(relative) => format!("~/{}", relative.display()),
            Err(_) => path.display().to_string(),
        },
        None => path.display().to_string(),
    }
}

/// Expand a leading `~/` into the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_to_percent() {
        assert_eq!(volume_to_percent(0.0), 0);
        assert_eq!(volume_to_percent(0.5), 50);
        assert_eq!(volume_to_percent(0.333), 33);
        assert_eq!(volume_to_percent(1.0), 100);
    }

    #[test]
    fn test_volume_to_percent_clamping() {
        assert_eq!(volume_to_percent(-0.5), 0);
        assert_eq!(volume_to_percent(1.5), 100);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(0)), "0m");
        assert_eq!(format_duration(Duration::from_secs(45 * 60)), "45m");
        assert_eq!(format_duration(Duration::from_secs(3600)), "1h 00m");
        assert_eq!(format_duration(Duration::from_secs(14 * 3600 + 15 * 60)), "14h 15m");
    }

    #[test]
    fn test_path_for_display_outside_home() {
        assert_eq!(
            path_for_display(Path::new("/tmp/ambientr/sounds")),
            "/tmp/ambientr/sounds"
        );
    }

    #[test]
    fn test_path_for_display_inside_home() {
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".config").join("ambientr");
            assert_eq!(path_for_display(&path), "~/.config/ambientr");
        }
    }

    #[test]
    fn test_expand_tilde() {
        assert_eq!(
            expand_tilde(Path::new("/usr/share/sounds")),
            PathBuf::from("/usr/share/sounds")
        );
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                expand_tilde(Path::new("~/Music/ambient")),
                home.join("Music/ambient")
            );
        }
    }
}
