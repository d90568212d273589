use serde::{Deserialize, Serialize};

use crate::ability_mod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityKind {
    Strength,
    Constitution,
    Dexterity,
    Intelligence,
    Wisdom,
    Charisma,
}

/// A single ability score. Copied by value; the modifier and cost are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ability {
    pub score: i32,
}

impl Ability {
    pub const fn new(score: i32) -> Self {
        Self { score }
    }

    pub fn modifier(self) -> i32 {
        ability_mod(self.score)
    }

    /// Point-buy cost of this score; `None` outside the buyable range 10..=18.
    pub fn cost(self) -> Option<i32> {
        match self.score {
            10 => Some(0),
            11 => Some(1),
            12 => Some(2),
            13 => Some(3),
            14 => Some(5),
            15 => Some(7),
            16 => Some(9),
            17 => Some(12),
            18 => Some(16),
            _ => None,
        }
    }
}

impl Default for Ability {
    fn default() -> Self {
        Self::new(10)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityScores {
    pub strength: Ability,
    pub constitution: Ability,
    pub dexterity: Ability,
    pub intelligence: Ability,
    pub wisdom: Ability,
    pub charisma: Ability,
}

impl AbilityScores {
    pub fn get(&self, kind: AbilityKind) -> Ability {
        match kind {
            AbilityKind::Strength => self.strength,
            AbilityKind::Constitution => self.constitution,
            AbilityKind::Dexterity => self.dexterity,
            AbilityKind::Intelligence => self.intelligence,
            AbilityKind::Wisdom => self.wisdom,
            AbilityKind::Charisma => self.charisma,
        }
    }

    pub fn modifier(&self, kind: AbilityKind) -> i32 {
        self.get(kind).modifier()
    }

    /// Higher modifier of the two abilities.
    pub fn best_of(&self, a: AbilityKind, b: AbilityKind) -> i32 {
        self.modifier(a).max(self.modifier(b))
    }
}

/// Key ability for a skill name (case-insensitive).
pub fn skill_ability(skill: &str) -> Option<AbilityKind> {
    use AbilityKind::*;
    match skill.trim().to_lowercase().as_str() {
        "athletics" => Some(Strength),
        "endurance" => Some(Constitution),
        "acrobatics" | "stealth" | "thievery" => Some(Dexterity),
        "arcana" | "history" | "religion" => Some(Intelligence),
        "dungeoneering" | "heal" | "insight" | "nature" | "perception" => Some(Wisdom),
        "bluff" | "diplomacy" | "intimidate" | "streetwise" => Some(Charisma),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_rounds_down() {
        assert_eq!(Ability::new(9).modifier(), -1);
        assert_eq!(Ability::new(10).modifier(), 0);
        assert_eq!(Ability::new(15).modifier(), 2);
        assert_eq!(Ability::new(1).modifier(), -5);
    }

    #[test]
    fn cost_table() {
        assert_eq!(Ability::new(10).cost(), Some(0));
        assert_eq!(Ability::new(14).cost(), Some(5));
        assert_eq!(Ability::new(18).cost(), Some(16));
        assert_eq!(Ability::new(19).cost(), None);
    }

    #[test]
    fn key_abilities() {
        assert_eq!(skill_ability("Stealth"), Some(AbilityKind::Dexterity));
        assert_eq!(skill_ability(" perception "), Some(AbilityKind::Wisdom));
        assert_eq!(skill_ability("Basket Weaving"), None);
    }
}
