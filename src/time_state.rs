//! Position of "now" within the daily timeline.
//!
//! Given the day's four boundaries, this module finds the interval "now" falls
//! into, expressed as the pair of boundary kinds surrounding it. Two edge cases
//! wrap around the day:
//! - before the first boundary, "now" is still in yesterday's last interval
//!   (`night → morning0`)
//! - after the last boundary, "now" is in the interval leading to tomorrow's
//!   first boundary (again `night → morning0`)
//!
//! A boundary whose instant equals "now" counts as already passed.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration as StdDuration;

use crate::timeline::{DAILY_CYCLE, TimeBoundary, TimeEventKind};

/// The two adjacent boundary kinds surrounding "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bracket {
    pub prev: TimeEventKind,
    pub next: TimeEventKind,
}

impl Bracket {
    /// The interval starting at `prev` and ending at its successor in the ring.
    pub fn starting_at(prev: TimeEventKind) -> Option<Self> {
        prev.next_in_cycle().map(|next| Self { prev, next })
    }

    /// All four intervals of a day, starting with `morning0 → morning1`.
    pub fn all() -> [Bracket; 4] {
        DAILY_CYCLE.map(|prev| Bracket {
            prev,
            next: prev.next_in_cycle().unwrap_or(TimeEventKind::Morning0),
        })
    }

    /// Whether `next` directly follows `prev` in the daily ring.
    pub fn is_cyclic_adjacent(&self) -> bool {
        self.prev.next_in_cycle() == Some(self.next)
    }
}

impl fmt::Display for Bracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.prev, self.next)
    }
}

/// Check that `boundaries` is one full day of the ring, starting at `morning0`.
fn validate_boundaries(boundaries: &[TimeBoundary]) -> Result<()> {
    if boundaries.len() != DAILY_CYCLE.len() {
        anyhow::bail!(
            "Malformed timeline: expected {} boundaries, got {}",
            DAILY_CYCLE.len(),
            boundaries.len()
        );
    }

    if boundaries[0].kind != DAILY_CYCLE[0] {
        anyhow::bail!(
            "Malformed timeline: first boundary is {}, expected {}",
            boundaries[0].kind,
            DAILY_CYCLE[0]
        );
    }

    for pair in boundaries.windows(2) {
        if pair[0].kind.next_in_cycle() != Some(pair[1].kind) {
            anyhow::bail!(
                "Malformed timeline: {} cannot follow {}",
                pair[1].kind,
                pair[0].kind
            );
        }
    }

    Ok(())
}

/// Find the bracket `(prev, next)` surrounding `now`.
///
/// # Arguments
/// * `boundaries` - One day of boundaries in daily order
/// * `now` - Instant to locate
///
/// # Returns
/// The bracket containing `now`, wrapping around the day at both ends
///
/// # Errors
/// Fails if `boundaries` is not exactly the four kinds of the ring in order.
pub fn resolve_bracket(boundaries: &[TimeBoundary], now: DateTime<Utc>) -> Result<Bracket> {
    validate_boundaries(boundaries)?;

    let mut prev_index = None;
    let mut next_index = None;
    for (i, boundary) in boundaries.iter().enumerate() {
        if boundary.instant <= now {
            prev_index = Some(i);
        } else {
            next_index = Some(i);
            break;
        }
    }

    let first = &boundaries[0];
    let last = &boundaries[boundaries.len() - 1];

    let bracket = match (prev_index, next_index) {
        // Before the first boundary: still in yesterday's last interval
        (None, _) => Bracket {
            prev: last.kind,
            next: first.kind,
        },
        // At or after the last boundary: heading into tomorrow's first one
        (Some(prev), None) => Bracket {
            prev: boundaries[prev].kind,
            next: first.kind,
        },
        (Some(prev), Some(next)) => Bracket {
            prev: boundaries[prev].kind,
            next: boundaries[next].kind,
        },
    };

    debug_assert!(bracket.is_cyclic_adjacent());
    Ok(bracket)
}

/// The first boundary strictly after `now`, if there is one left today.
pub fn next_boundary(boundaries: &[TimeBoundary], now: DateTime<Utc>) -> Option<&TimeBoundary> {
    boundaries.iter().find(|boundary| boundary.instant > now)
}

/// How long until the soundscape changes next today.
///
/// Returns `None` after the day's last boundary, since tomorrow's timeline has
/// not been computed yet.
pub fn time_until_next_boundary(
    boundaries: &[TimeBoundary],
    now: DateTime<Utc>,
) -> Option<StdDuration> {
    next_boundary(boundaries, now).and_then(|boundary| (boundary.instant - now).to_std().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        Utc.from_utc_datetime(&date.and_hms_opt(hour, minute, 0).unwrap())
    }

    /// sunrise 06:00, sunset 20:00, offsets +1h / -30min / +15min
    fn standard_day() -> [TimeBoundary; 4] {
        [
            TimeBoundary::new(TimeEventKind::Morning0, at(6, 0)),
            TimeBoundary::new(TimeEventKind::Morning1, at(7, 0)),
            TimeBoundary::new(TimeEventKind::Evening, at(19, 30)),
            TimeBoundary::new(TimeEventKind::Night, at(20, 15)),
        ]
    }

    fn bracket(prev: TimeEventKind, next: TimeEventKind) -> Bracket {
        Bracket { prev, next }
    }

    #[test]
    fn test_standard_day_scenario() {
        use TimeEventKind::*;

        let cases = [
            ((5, 0), bracket(Night, Morning0)),
            ((6, 30), bracket(Morning0, Morning1)),
            ((12, 0), bracket(Morning1, Evening)),
            ((19, 45), bracket(Evening, Night)),
            ((21, 0), bracket(Night, Morning0)),
        ];

        for ((hour, minute), expected) in cases {
            let result = resolve_bracket(&standard_day(), at(hour, minute)).unwrap();
            assert_eq!(result, expected, "at {:02}:{:02}", hour, minute);
        }
    }

    #[test]
    fn test_wraparound_edges() {
        use TimeEventKind::*;

        assert_eq!(
            resolve_bracket(&standard_day(), at(0, 0)).unwrap(),
            bracket(Night, Morning0)
        );
        assert_eq!(
            resolve_bracket(&standard_day(), at(5, 59)).unwrap(),
            bracket(Night, Morning0)
        );
        assert_eq!(
            resolve_bracket(&standard_day(), at(23, 59)).unwrap(),
            bracket(Night, Morning0)
        );
    }

    #[test]
    fn test_boundary_instant_counts_as_passed() {
        use TimeEventKind::*;

        assert_eq!(
            resolve_bracket(&standard_day(), at(6, 0)).unwrap(),
            bracket(Morning0, Morning1)
        );
        assert_eq!(
            resolve_bracket(&standard_day(), at(7, 0)).unwrap(),
            bracket(Morning1, Evening)
        );
        assert_eq!(
            resolve_bracket(&standard_day(), at(19, 30)).unwrap(),
            bracket(Evening, Night)
        );
        assert_eq!(
            resolve_bracket(&standard_day(), at(20, 15)).unwrap(),
            bracket(Night, Morning0)
        );
    }

    #[test]
    fn test_wrong_boundary_count_is_rejected() {
        let day = standard_day();
        assert!(resolve_bracket(&day[..3], at(12, 0)).is_err());
        assert!(resolve_bracket(&[], at(12, 0)).is_err());

        let mut longer = day.to_vec();
        longer.push(TimeBoundary::new(TimeEventKind::Morning0, at(23, 0)));
        assert!(resolve_bracket(&longer, at(12, 0)).is_err());
    }

    #[test]
    fn test_out_of_order_kinds_are_rejected() {
        let mut day = standard_day();
        day.swap(1, 2);
        assert!(resolve_bracket(&day, at(12, 0)).is_err());

        let mut rotated = standard_day();
        rotated.rotate_left(1);
        assert!(resolve_bracket(&rotated, at(12, 0)).is_err());
    }

    #[test]
    fn test_reserved_kind_is_rejected() {
        let mut day = standard_day();
        day[2].kind = TimeEventKind::Now;
        assert!(resolve_bracket(&day, at(12, 0)).is_err());
    }

    #[test]
    fn test_all_brackets_are_adjacent() {
        let all = Bracket::all();
        assert_eq!(all.len(), 4);
        for bracket in all {
            assert!(bracket.is_cyclic_adjacent());
        }
        assert_eq!(all[3], bracket(TimeEventKind::Night, TimeEventKind::Morning0));

        assert!(!bracket(TimeEventKind::Morning0, TimeEventKind::Evening).is_cyclic_adjacent());
        assert!(!bracket(TimeEventKind::Now, TimeEventKind::Morning0).is_cyclic_adjacent());
        assert_eq!(Bracket::starting_at(TimeEventKind::Now), None);
        assert_eq!(
            Bracket::starting_at(TimeEventKind::Evening),
            Some(bracket(TimeEventKind::Evening, TimeEventKind::Night))
        );
    }

    #[test]
    fn test_time_until_next_boundary() {
        let day = standard_day();

        assert_eq!(
            time_until_next_boundary(&day, at(5, 0)),
            Some(StdDuration::from_secs(3600))
        );
        assert_eq!(
            time_until_next_boundary(&day, at(19, 0)),
            Some(StdDuration::from_secs(30 * 60))
        );
        assert_eq!(
            next_boundary(&day, at(7, 0)).map(|b| b.kind),
            Some(TimeEventKind::Evening)
        );
        assert_eq!(time_until_next_boundary(&day, at(21, 0)), None);
    }

    #[test]
    fn test_bracket_display() {
        assert_eq!(
            bracket(TimeEventKind::Night, TimeEventKind::Morning0).to_string(),
            "night → morning0"
        );
    }
}
