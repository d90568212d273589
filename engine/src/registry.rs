//! Read-only lookup of authored objects.
//!
//! Composition and difficulty functions take a `&dyn Registry` (or generic
//! `R: Registry`) instead of reaching for global state.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::Id;
use crate::challenge::SkillChallenge;
use crate::creature::Creature;
use crate::error::EngineError;
use crate::settings::{CampaignSettings, is_yaml};
use crate::template::{CreatureTemplate, MonsterTheme};
use crate::trap::Trap;

pub trait Registry {
    fn campaign_settings(&self) -> &CampaignSettings;
    fn find_creature(&self, id: &Id) -> Option<&Creature>;
    fn find_template(&self, id: &Id) -> Option<&CreatureTemplate>;
    fn find_theme(&self, id: &Id) -> Option<&MonsterTheme>;
    fn find_trap(&self, id: &Id) -> Option<&Trap>;
    fn find_skill_challenge(&self, id: &Id) -> Option<&SkillChallenge>;
}

/// In-memory registry keyed by id, preserving authoring order.
#[derive(Debug, Clone, Default)]
pub struct Library {
    pub settings: CampaignSettings,
    pub creatures: IndexMap<Id, Creature>,
    pub templates: IndexMap<Id, CreatureTemplate>,
    pub themes: IndexMap<Id, MonsterTheme>,
    pub traps: IndexMap<Id, Trap>,
    pub skill_challenges: IndexMap<Id, SkillChallenge>,
}

/// On-disk shape: plain lists, ids taken from each entry.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct LibraryFile {
    settings: CampaignSettings,
    creatures: Vec<Creature>,
    templates: Vec<CreatureTemplate>,
    themes: Vec<MonsterTheme>,
    traps: Vec<Trap>,
    skill_challenges: Vec<SkillChallenge>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(mut self, settings: CampaignSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn add_creature(&mut self, creature: Creature) {
        self.creatures.insert(creature.id.clone(), creature);
    }

    pub fn add_template(&mut self, template: CreatureTemplate) {
        self.templates.insert(template.id.clone(), template);
    }

    pub fn add_theme(&mut self, theme: MonsterTheme) {
        self.themes.insert(theme.id.clone(), theme);
    }

    pub fn add_trap(&mut self, trap: Trap) {
        self.traps.insert(trap.id.clone(), trap);
    }

    pub fn add_skill_challenge(&mut self, challenge: SkillChallenge) {
        self.skill_challenges.insert(challenge.id.clone(), challenge);
    }

    pub fn from_yaml(text: &str) -> Result<Self, EngineError> {
        let file: LibraryFile = serde_yaml::from_str(text)?;
        Ok(file.into())
    }

    pub fn from_json(text: &str) -> Result<Self, EngineError> {
        let file: LibraryFile = serde_json::from_str(text)?;
        Ok(file.into())
    }

    /// Parse by extension: YAML for `.yaml`/`.yml`, JSON otherwise.
    pub fn from_text(path: &Path, text: &str) -> Result<Self, EngineError> {
        if is_yaml(path) {
            Self::from_yaml(text)
        } else {
            Self::from_json(text)
        }
    }
}

impl From<LibraryFile> for Library {
    fn from(file: LibraryFile) -> Self {
        let mut lib = Library::new().with_settings(file.settings);
        file.creatures.into_iter().for_each(|c| lib.add_creature(c));
        file.templates.into_iter().for_each(|t| lib.add_template(t));
        file.themes.into_iter().for_each(|t| lib.add_theme(t));
        file.traps.into_iter().for_each(|t| lib.add_trap(t));
        file.skill_challenges
            .into_iter()
            .for_each(|s| lib.add_skill_challenge(s));
        lib
    }
}

impl Registry for Library {
    fn campaign_settings(&self) -> &CampaignSettings {
        &self.settings
    }

    fn find_creature(&self, id: &Id) -> Option<&Creature> {
        self.creatures.get(id)
    }

    fn find_template(&self, id: &Id) -> Option<&CreatureTemplate> {
        self.templates.get(id)
    }

    fn find_theme(&self, id: &Id) -> Option<&MonsterTheme> {
        self.themes.get(id)
    }

    fn find_trap(&self, id: &Id) -> Option<&Trap> {
        self.traps.get(id)
    }

    fn find_skill_challenge(&self, id: &Id) -> Option<&SkillChallenge> {
        self.skill_challenges.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_yaml_lists() {
        let text = r#"
settings:
  xp: 2.0
creatures:
  - id: rat
    name: Giant Rat
    level: 1
    role: { kind: minion }
    stats: { kind: library, hp: 1, ac: 15, fortitude: 13, reflex: 15, will: 12 }
"#;
        let lib = Library::from_yaml(text).unwrap();
        assert_eq!(lib.campaign_settings().xp, 2.0);
        let rat = lib.find_creature(&Id::new("rat")).unwrap();
        assert_eq!(rat.name, "Giant Rat");
        assert!(lib.find_template(&Id::new("rat")).is_none());
    }
}
