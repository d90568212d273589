pub mod abilities;
pub mod api;
pub mod card;
pub mod challenge;
pub mod checks;
pub mod combat;
pub mod conditions;
pub mod content;
pub mod creature;
pub mod damage;
pub mod dice;
pub mod encounter;
pub mod error;
pub mod experience;
pub mod log;
pub mod registry;
pub mod report;
pub mod role;
pub mod settings;
pub mod sheet;
pub mod template;
pub mod trap;

use std::collections::VecDeque;
use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

pub use abilities::{Ability, AbilityKind, AbilityScores};
pub use card::{CardCategory, EncounterCard};
pub use challenge::{SkillChallenge, SkillChallengeEntry};
pub use combat::CombatData;
pub use conditions::{ConditionDuration, OngoingCondition, OngoingKind};
pub use creature::{Aura, Creature, CreatureKind, CreaturePower, Defence, PowerAttack};
pub use damage::{DamageModifier, DamageModifierTemplate, DamageType, Modifier};
pub use dice::DiceExpression;
pub use encounter::{Encounter, EncounterSlot, SlotType};
pub use error::EngineError;
pub use experience::{Difficulty, creature_xp, threat_difficulty};
pub use registry::{Library, Registry};
pub use report::EncounterReport;
pub use role::{Role, RoleFlag, RoleType};
pub use settings::CampaignSettings;
pub use sheet::StatSheet;
pub use template::{CreatureTemplate, MonsterTheme, TemplateKind};
pub use trap::Trap;

/// Identifier shared by every authored object (creatures, templates, themes, traps, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Seeded dice roller. Scripted values are consumed first, which keeps tests deterministic.
pub struct Dice {
    rng: ChaCha8Rng,
    scripted: VecDeque<u32>,
}

impl Dice {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            scripted: VecDeque::new(),
        }
    }

    pub fn from_scripted(values: Vec<u32>) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(0),
            scripted: values.into(),
        }
    }

    pub fn die(&mut self, sides: u32) -> u32 {
        if let Some(v) = self.scripted.pop_front() {
            return v;
        }
        self.rng.gen_range(1..=sides.max(1))
    }

    pub fn d20(&mut self) -> u32 {
        self.die(20)
    }

    /// Roll `count` dice of `sides` and sum them.
    pub fn roll(&mut self, count: u32, sides: u32) -> i32 {
        (0..count).map(|_| self.die(sides) as i32).sum()
    }
}

/// Ability modifier = floor((score - 10) / 2) for integer scores.
pub fn ability_mod(score: i32) -> i32 {
    // `div_euclid` with positive divisor matches mathematical floor division.
    (score - 10).div_euclid(2)
}
