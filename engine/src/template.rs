use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::Id;
use crate::creature::{Aura, CreaturePower, Defence};
use crate::damage::DamageModifierTemplate;
use crate::role::{RoleFlag, RoleType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    /// Attack bonuses of its powers are relative to the card's level.
    #[default]
    Functional,
    Class,
}

/// Additive bundle of statistics and powers layered onto a creature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureTemplate {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub kind: TemplateKind,
    /// Escalation this template grants: Elite is one step, Solo two.
    #[serde(default)]
    pub flag: RoleFlag,
    #[serde(default)]
    pub leader: bool,
    #[serde(default)]
    pub hp_per_level: i32,
    #[serde(default)]
    pub initiative: i32,
    #[serde(default)]
    pub ac: i32,
    #[serde(default)]
    pub fortitude: i32,
    #[serde(default)]
    pub reflex: i32,
    #[serde(default)]
    pub will: i32,
    #[serde(default)]
    pub powers: Vec<CreaturePower>,
    #[serde(default)]
    pub auras: Vec<Aura>,
    #[serde(default)]
    pub damage_modifiers: Vec<DamageModifierTemplate>,
    #[serde(default)]
    pub senses: Vec<String>,
    #[serde(default)]
    pub movement: Vec<String>,
    #[serde(default)]
    pub resist: Vec<String>,
    #[serde(default)]
    pub vulnerable: Vec<String>,
    #[serde(default)]
    pub immune: Vec<String>,
    #[serde(default)]
    pub tactics: Vec<String>,
}

impl CreatureTemplate {
    pub fn new(id: impl Into<Id>, name: impl Into<String>, flag: RoleFlag) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: TemplateKind::Functional,
            flag,
            leader: false,
            hp_per_level: 0,
            initiative: 0,
            ac: 0,
            fortitude: 0,
            reflex: 0,
            will: 0,
            powers: Vec::new(),
            auras: Vec::new(),
            damage_modifiers: Vec::new(),
            senses: Vec::new(),
            movement: Vec::new(),
            resist: Vec::new(),
            vulnerable: Vec::new(),
            immune: Vec::new(),
            tactics: Vec::new(),
        }
    }

    pub fn defence(&self, defence: Defence) -> i32 {
        match defence {
            Defence::Ac => self.ac,
            Defence::Fortitude => self.fortitude,
            Defence::Reflex => self.reflex,
            Defence::Will => self.will,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerCategory {
    Attack,
    Utility,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemePower {
    pub category: PowerCategory,
    /// Roles the power suits; empty means any role.
    #[serde(default)]
    pub roles: Vec<RoleType>,
    pub power: CreaturePower,
}

/// Monster theme: a pool of selectable powers plus skill bonuses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterTheme {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub powers: Vec<ThemePower>,
    #[serde(default)]
    pub skill_bonuses: IndexMap<String, i32>,
}

impl MonsterTheme {
    pub fn find_power(&self, id: &Id) -> Option<&ThemePower> {
        self.powers.iter().find(|p| &p.power.id == id)
    }

    /// Powers of `category` suited to `role_type` (any role when `None`).
    pub fn powers_for(&self, category: PowerCategory, role_type: Option<RoleType>) -> Vec<&ThemePower> {
        self.powers
            .iter()
            .filter(|p| p.category == category)
            .filter(|p| match role_type {
                Some(t) => p.roles.is_empty() || p.roles.contains(&t),
                None => true,
            })
            .collect()
    }
}
