//! Creature definitions: library stat blocks, custom creatures and improvised NPCs.
//!
//! All three share one [`Creature`] struct; [`CreatureKind`] decides whether
//! the core statistics are literal values or formulas plus a stored modifier.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::Id;
use crate::abilities::{AbilityKind, AbilityScores};
use crate::damage::DamageModifier;
use crate::role::{Role, RoleFlag, RoleType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Defence {
    Ac,
    Fortitude,
    Reflex,
    Will,
}

impl Defence {
    pub const ALL: [Defence; 4] = [Defence::Ac, Defence::Fortitude, Defence::Reflex, Defence::Will];
}

impl fmt::Display for Defence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Defence::Ac => "AC",
            Defence::Fortitude => "Fortitude",
            Defence::Reflex => "Reflex",
            Defence::Will => "Will",
        })
    }
}

/// Statistics that have a base value on every creature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stat {
    Hp,
    Defence(Defence),
    Initiative,
    Perception,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aura {
    pub name: String,
    #[serde(default)]
    pub keywords: String,
    pub radius: i32,
    pub description: String,
}

impl fmt::Display for Aura {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Aura {}: {}", self.radius, self.description)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerAttack {
    pub bonus: i32,
    pub defence: Defence,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreaturePower {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub range: String,
    #[serde(default)]
    pub attack: Option<PowerAttack>,
    /// Hit / effect text; may embed a damage expression such as `2d6 + 4`.
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub description: String,
}

/// Literal statistics of a published stat block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LiteralStats {
    pub hp: i32,
    pub ac: i32,
    pub fortitude: i32,
    pub reflex: i32,
    pub will: i32,
    pub initiative: i32,
    pub perception: i32,
}

/// Offsets stored alongside formula statistics so a user-entered value
/// reads back exactly: `modifier = entered - formula`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormulaModifiers {
    pub hp: i32,
    pub ac: i32,
    pub fortitude: i32,
    pub reflex: i32,
    pub will: i32,
    pub initiative: i32,
    pub perception: i32,
}

impl FormulaModifiers {
    fn slot(&mut self, stat: Stat) -> &mut i32 {
        match stat {
            Stat::Hp => &mut self.hp,
            Stat::Defence(Defence::Ac) => &mut self.ac,
            Stat::Defence(Defence::Fortitude) => &mut self.fortitude,
            Stat::Defence(Defence::Reflex) => &mut self.reflex,
            Stat::Defence(Defence::Will) => &mut self.will,
            Stat::Initiative => &mut self.initiative,
            Stat::Perception => &mut self.perception,
        }
    }

    fn get(mut self, stat: Stat) -> i32 {
        *self.slot(stat)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CreatureKind {
    /// Published creature with literal statistics.
    Library(LiteralStats),
    /// Player-made creature using monster-building formulas.
    Custom(FormulaModifiers),
    /// Improvised NPC using hero-style formulas.
    Improvised(FormulaModifiers),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub id: Id,
    pub name: String,
    pub level: i32,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub abilities: AbilityScores,
    pub stats: CreatureKind,
    #[serde(default)]
    pub auras: Vec<Aura>,
    #[serde(default)]
    pub powers: Vec<CreaturePower>,
    #[serde(default)]
    pub damage_modifiers: Vec<DamageModifier>,
    /// Skill name to total bonus at the creature's own level.
    #[serde(default)]
    pub skills: IndexMap<String, i32>,
    #[serde(default)]
    pub senses: Vec<String>,
    #[serde(default)]
    pub movement: Vec<String>,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub resist: Vec<String>,
    #[serde(default)]
    pub vulnerable: Vec<String>,
    #[serde(default)]
    pub immune: Vec<String>,
    #[serde(default)]
    pub tactics: Vec<String>,
}

impl Creature {
    /// Minimal creature; levels below 1 are raised to 1.
    pub fn new(id: impl Into<Id>, name: impl Into<String>, level: i32, role: Role, stats: CreatureKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            level: level.max(1),
            role,
            abilities: AbilityScores::default(),
            stats,
            auras: Vec::new(),
            powers: Vec::new(),
            damage_modifiers: Vec::new(),
            skills: IndexMap::new(),
            senses: Vec::new(),
            movement: Vec::new(),
            equipment: Vec::new(),
            resist: Vec::new(),
            vulnerable: Vec::new(),
            immune: Vec::new(),
            tactics: Vec::new(),
        }
    }

    pub fn base(&self, stat: Stat) -> i32 {
        match &self.stats {
            CreatureKind::Library(lit) => match stat {
                Stat::Hp => lit.hp,
                Stat::Defence(Defence::Ac) => lit.ac,
                Stat::Defence(Defence::Fortitude) => lit.fortitude,
                Stat::Defence(Defence::Reflex) => lit.reflex,
                Stat::Defence(Defence::Will) => lit.will,
                Stat::Initiative => lit.initiative,
                Stat::Perception => lit.perception,
            },
            CreatureKind::Custom(mods) | CreatureKind::Improvised(mods) => {
                self.formula(stat) + mods.get(stat)
            }
        }
    }

    /// Store a user-entered value. Formula creatures keep the difference to
    /// the formula so later changes to level, role or abilities still apply.
    pub fn set_base(&mut self, stat: Stat, value: i32) {
        let formula = self.formula(stat);
        match &mut self.stats {
            CreatureKind::Library(lit) => {
                let slot = match stat {
                    Stat::Hp => &mut lit.hp,
                    Stat::Defence(Defence::Ac) => &mut lit.ac,
                    Stat::Defence(Defence::Fortitude) => &mut lit.fortitude,
                    Stat::Defence(Defence::Reflex) => &mut lit.reflex,
                    Stat::Defence(Defence::Will) => &mut lit.will,
                    Stat::Initiative => &mut lit.initiative,
                    Stat::Perception => &mut lit.perception,
                };
                *slot = value;
            }
            CreatureKind::Custom(mods) | CreatureKind::Improvised(mods) => {
                *mods.slot(stat) = value - formula;
            }
        }
    }

    pub fn hp(&self) -> i32 {
        self.base(Stat::Hp)
    }

    pub fn defence(&self, defence: Defence) -> i32 {
        self.base(Stat::Defence(defence))
    }

    pub fn initiative(&self) -> i32 {
        self.base(Stat::Initiative)
    }

    pub fn perception(&self) -> i32 {
        self.base(Stat::Perception)
    }

    /// Formula value of a statistic; zero for library creatures.
    pub fn formula(&self, stat: Stat) -> i32 {
        match self.stats {
            CreatureKind::Library(_) => 0,
            CreatureKind::Custom(_) => monster_formula(stat, self.level, &self.role, &self.abilities),
            CreatureKind::Improvised(_) => npc_formula(stat, self.level, &self.role, &self.abilities),
        }
    }
}

fn flag_hp_multiplier(flag: RoleFlag) -> i32 {
    match flag {
        RoleFlag::Standard => 1,
        RoleFlag::Elite => 2,
        RoleFlag::Solo => 4,
    }
}

fn monster_formula(stat: Stat, level: i32, role: &Role, abilities: &AbilityScores) -> i32 {
    match stat {
        Stat::Hp => match role.role_type() {
            None => 1,
            Some(t) => {
                (t.hp_per_level() * (level + 1) + abilities.constitution.score)
                    * flag_hp_multiplier(role.flag())
            }
        },
        Stat::Defence(Defence::Ac) => {
            let adj = match role.role_type() {
                Some(RoleType::Soldier) => 2,
                Some(RoleType::Artillery) | Some(RoleType::Brute) => -2,
                _ => 0,
            };
            level + 14 + adj
        }
        Stat::Defence(_) => level + 12,
        Stat::Initiative => level / 2 + abilities.modifier(AbilityKind::Dexterity),
        Stat::Perception => level / 2 + abilities.modifier(AbilityKind::Wisdom),
    }
}

fn npc_formula(stat: Stat, level: i32, role: &Role, abilities: &AbilityScores) -> i32 {
    use AbilityKind::*;
    let half = level / 2;
    match stat {
        Stat::Hp => match role.role_type() {
            None => 1,
            Some(t) => {
                (t.hp_per_level() * level + abilities.constitution.score)
                    * flag_hp_multiplier(role.flag())
            }
        },
        Stat::Defence(Defence::Ac) => 10 + half + abilities.best_of(Dexterity, Intelligence) + 2,
        Stat::Defence(Defence::Fortitude) => 10 + half + abilities.best_of(Strength, Constitution),
        Stat::Defence(Defence::Reflex) => 10 + half + abilities.best_of(Dexterity, Intelligence),
        Stat::Defence(Defence::Will) => 10 + half + abilities.best_of(Wisdom, Charisma),
        Stat::Initiative => half + abilities.modifier(Dexterity),
        Stat::Perception => half + abilities.modifier(Wisdom),
    }
}
