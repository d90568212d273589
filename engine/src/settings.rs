use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Campaign-wide scaling applied on top of every composed creature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignSettings {
    /// XP multiplier.
    pub xp: f64,
    /// HP multiplier; never applied to minions.
    pub hp: f64,
    pub ac_bonus: i32,
    /// Bonus to Fortitude, Reflex and Will.
    pub nad_bonus: i32,
    pub attack_bonus: i32,
}

impl Default for CampaignSettings {
    fn default() -> Self {
        Self {
            xp: 1.0,
            hp: 1.0,
            ac_bonus: 0,
            nad_bonus: 0,
            attack_bonus: 0,
        }
    }
}

impl CampaignSettings {
    pub fn scale_xp(&self, xp: i32) -> i32 {
        (xp as f64 * self.xp) as i32
    }

    pub fn scale_hp(&self, hp: i32) -> i32 {
        (hp as f64 * self.hp) as i32
    }

    /// XP multiplier usable as a divisor.
    pub fn xp_divisor(&self) -> f64 {
        if self.xp > 0.0 { self.xp } else { 1.0 }
    }

    /// Parse settings text; YAML for `.yaml`/`.yml` paths, JSON otherwise.
    pub fn from_text(path: &Path, text: &str) -> Result<Self, EngineError> {
        if is_yaml(path) {
            Ok(serde_yaml::from_str(text)?)
        } else {
            Ok(serde_json::from_str(text)?)
        }
    }
}

pub(crate) fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}
