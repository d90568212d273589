//! XP values and difficulty bands.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::role::Role;
use crate::settings::CampaignSettings;

/// Severity order: Trivial < Easy < Moderate < Hard < Extreme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Trivial,
    Easy,
    Moderate,
    Hard,
    Extreme,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

pub const MAX_LEVEL: i32 = 40;

const CREATURE_XP: [i32; 41] = [
    75, 100, 125, 150, 175, 200, 250, 300, 350, 400, // 0-9
    500, 600, 700, 800, 1000, 1200, 1400, 1600, 2000, 2400, // 10-19
    2800, 3200, 4150, 5100, 6050, 7000, 9000, 11000, 13000, 15000, // 20-29
    19000, 23000, 27000, 31000, 39000, 47000, 55000, 63000, 79000, 95000, // 30-39
    111000, // 40
];

/// XP of a standard creature of `level`; 0 below level 0, capped at level 40.
pub fn creature_xp(level: i32) -> i32 {
    if level < 0 {
        return 0;
    }
    CREATURE_XP[level.min(MAX_LEVEL) as usize]
}

/// XP for a threat of `level` and `role`, scaled by the campaign multiplier.
/// Minions are worth a quarter, rounded away from zero.
pub fn role_xp(level: i32, role: &Role, settings: &CampaignSettings) -> i32 {
    let base = creature_xp(level);
    let xp = match role {
        Role::Minion => (base as f64 / 4.0).round() as i32,
        Role::Complex { flag, .. } => base * flag.xp_factor(),
    };
    settings.scale_xp(xp)
}

/// Difficulty of a single creature relative to the party.
pub fn creature_difficulty(level: i32, party_level: i32) -> Difficulty {
    match level - party_level {
        d if d < -1 => Difficulty::Trivial,
        -1..=1 => Difficulty::Easy,
        2 | 3 => Difficulty::Moderate,
        4 | 5 => Difficulty::Hard,
        _ => Difficulty::Extreme,
    }
}

/// Difficulty of a trap, challenge or whole encounter relative to the party.
pub fn threat_difficulty(level: i32, party_level: i32) -> Difficulty {
    match level - party_level {
        d if d < -2 => Difficulty::Trivial,
        -2 | -1 => Difficulty::Easy,
        0 | 1 => Difficulty::Moderate,
        2..=4 => Difficulty::Hard,
        _ => Difficulty::Extreme,
    }
}

/// Level whose XP is numerically closest to `xp`; ties go to the lower level.
pub fn level_for_xp(xp: f64) -> i32 {
    let mut best = 0;
    let mut best_gap = f64::MAX;
    for level in 0..=MAX_LEVEL {
        let gap = (creature_xp(level) as f64 - xp).abs();
        if gap < best_gap {
            best = level;
            best_gap = gap;
        }
    }
    best
}
