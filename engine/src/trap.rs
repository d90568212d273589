use serde::{Deserialize, Serialize};

use crate::Id;
use crate::creature::Defence;
use crate::experience::{Difficulty, role_xp, threat_difficulty};
use crate::role::Role;
use crate::settings::CampaignSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrapKind {
    #[default]
    Trap,
    Hazard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrapAttack {
    pub name: String,
    pub bonus: i32,
    pub defence: Defence,
    #[serde(default)]
    pub details: String,
}

/// Skill check that detects or disarms a trap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrapSkill {
    pub skill: String,
    pub dc: i32,
    #[serde(default)]
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trap {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub kind: TrapKind,
    pub level: i32,
    #[serde(default)]
    pub role: Role,
    /// Traps without initiative act only when triggered.
    #[serde(default)]
    pub initiative: Option<i32>,
    #[serde(default)]
    pub trigger: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub attacks: Vec<TrapAttack>,
    #[serde(default)]
    pub skills: Vec<TrapSkill>,
    #[serde(default)]
    pub countermeasures: Vec<String>,
}

impl Trap {
    pub fn new(id: impl Into<Id>, name: impl Into<String>, level: i32, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: TrapKind::Trap,
            level,
            role,
            initiative: None,
            trigger: String::new(),
            description: String::new(),
            attacks: Vec::new(),
            skills: Vec::new(),
            countermeasures: Vec::new(),
        }
    }

    pub fn xp(&self, settings: &CampaignSettings) -> i32 {
        role_xp(self.level, &self.role, settings)
    }

    pub fn difficulty(&self, party_level: i32) -> Difficulty {
        threat_difficulty(self.level, party_level)
    }
}
