//! Mapping from a timeline bracket to the sounds that should be playing.
//!
//! The mix table is plain data, loaded from `[[soundscape]]` tables in the
//! config file:
//!
//! ```toml
//! [[soundscape]]
//! prev = "morning1"
//! next = "evening"
//! items = [
//!     { sound = "birds", volume = 0.5 },
//!     { sound = "river", volume = 0.5 },
//! ]
//! ```
//!
//! Lookup is an exact match on both ends of the bracket. The first matching
//! entry wins and a bracket without an entry resolves to silence.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::time_state::Bracket;
use crate::timeline::TimeEventKind;

/// Identifier of one ambient sound asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundName {
    Birds,
    Night,
    River,
}

impl SoundName {
    pub const ALL: [SoundName; 3] = [SoundName::Birds, SoundName::Night, SoundName::River];

    pub fn as_str(&self) -> &'static str {
        match self {
            SoundName::Birds => "birds",
            SoundName::Night => "night",
            SoundName::River => "river",
        }
    }

    /// Asset file name inside the sound directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            SoundName::Birds => "birds.mp3",
            SoundName::Night => "night.mp3",
            SoundName::River => "river.mp3",
        }
    }
}

impl fmt::Display for SoundName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sound and the volume it should play at, from 0.0 (silent) to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoundItem {
    #[serde(alias = "name")]
    pub sound: SoundName,
    pub volume: f32,
}

impl SoundItem {
    pub fn new(sound: SoundName, volume: f32) -> Self {
        Self { sound, volume }
    }
}

/// One row of the mix table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundMixEntry {
    pub prev: TimeEventKind,
    pub next: TimeEventKind,
    #[serde(default)]
    pub items: Vec<SoundItem>,
}

impl SoundMixEntry {
    pub fn bracket(&self) -> Bracket {
        Bracket {
            prev: self.prev,
            next: self.next,
        }
    }

    fn matches(&self, bracket: &Bracket) -> bool {
        self.prev == bracket.prev && self.next == bracket.next
    }
}

/// Sounds to play right now, in table order. Empty means silence.
pub type ResolvedSoundSet = Vec<SoundItem>;

/// Look up the sounds for `bracket` in the mix table.
pub fn resolve_sounds(bracket: &Bracket, entries: &[SoundMixEntry]) -> ResolvedSoundSet {
    entries
        .iter()
        .find(|entry| entry.matches(bracket))
        .map(|entry| entry.items.clone())
        .unwrap_or_default()
}

/// Brackets that appear more than once in the table, in first-seen order.
///
/// Only the first entry of each is ever used.
pub fn duplicate_brackets(entries: &[SoundMixEntry]) -> Vec<Bracket> {
    let mut seen: Vec<Bracket> = Vec::new();
    let mut duplicates: Vec<Bracket> = Vec::new();

    for entry in entries {
        let bracket = entry.bracket();
        if seen.contains(&bracket) {
            if !duplicates.contains(&bracket) {
                duplicates.push(bracket);
            }
        } else {
            seen.push(bracket);
        }
    }

    duplicates
}

/// Daily brackets without any entry in the table.
pub fn missing_brackets(entries: &[SoundMixEntry]) -> Vec<Bracket> {
    Bracket::all()
        .into_iter()
        .filter(|bracket| !entries.iter().any(|entry| entry.matches(bracket)))
        .collect()
}

/// The stock mix table used when the config has no `[[soundscape]]` tables.
pub fn default_soundscape() -> Vec<SoundMixEntry> {
    use TimeEventKind::{Evening, Morning0, Morning1};

    vec![
        SoundMixEntry {
            prev: Morning0,
            next: Morning1,
            items: vec![SoundItem::new(SoundName::River, 1.0)],
        },
        SoundMixEntry {
            prev: Morning1,
            next: Evening,
            items: vec![
                SoundItem::new(SoundName::Birds, 0.5),
                SoundItem::new(SoundName::River, 0.5),
            ],
        },
        SoundMixEntry {
            prev: Evening,
            next: TimeEventKind::Night,
            items: vec![SoundItem::new(SoundName::River, 1.0)],
        },
        SoundMixEntry {
            prev: TimeEventKind::Night,
            next: Morning0,
            items: vec![
                SoundItem::new(SoundName::Night, 1.0),
                SoundItem::new(SoundName::River, 0.4),
            ],
        },
    ]
}
