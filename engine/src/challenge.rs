use serde::{Deserialize, Serialize};

use crate::Id;
use crate::experience::{Difficulty, creature_xp, threat_difficulty};
use crate::settings::CampaignSettings;

fn moderate() -> Difficulty {
    Difficulty::Moderate
}

fn one() -> i32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillChallengeEntry {
    pub skill: String,
    #[serde(default = "moderate")]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub successes: i32,
    #[serde(default)]
    pub failures: i32,
}

impl SkillChallengeEntry {
    pub fn new(skill: impl Into<String>, difficulty: Difficulty) -> Self {
        Self {
            skill: skill.into(),
            difficulty,
            details: String::new(),
            successes: 0,
            failures: 0,
        }
    }

    /// Check DC at `level`: easy 5, moderate 10, hard 15, plus half level.
    pub fn dc(&self, level: i32) -> i32 {
        let base = match self.difficulty {
            Difficulty::Trivial | Difficulty::Easy => 5,
            Difficulty::Moderate => 10,
            Difficulty::Hard | Difficulty::Extreme => 15,
        };
        base + level / 2
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillChallenge {
    pub id: Id,
    pub name: String,
    pub level: i32,
    /// 1 to 5; also the XP multiplier.
    #[serde(default = "one")]
    pub complexity: i32,
    #[serde(default)]
    pub skills: Vec<SkillChallengeEntry>,
    #[serde(default)]
    pub success: String,
    #[serde(default)]
    pub failure: String,
}

impl SkillChallenge {
    pub fn new(id: impl Into<Id>, name: impl Into<String>, level: i32, complexity: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            level,
            complexity,
            skills: Vec::new(),
            success: String::new(),
            failure: String::new(),
        }
    }

    /// Successes needed before three failures.
    pub fn successes_needed(&self) -> i32 {
        (self.complexity + 1) * 2
    }

    pub fn xp(&self, settings: &CampaignSettings) -> i32 {
        settings.scale_xp(creature_xp(self.level) * self.complexity)
    }

    /// Worst of the configured skill difficulties and the level band.
    pub fn difficulty(&self, party_level: i32) -> Difficulty {
        self.skills
            .iter()
            .map(|s| s.difficulty)
            .chain(std::iter::once(threat_difficulty(self.level, party_level)))
            .max()
            .unwrap_or(Difficulty::Trivial)
    }
}
