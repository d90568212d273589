use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};

use crate::card::EncounterCard;
use crate::content;
use crate::creature::CreaturePower;
use crate::encounter::Encounter;
use crate::experience::Difficulty;
use crate::registry::{Library, Registry};
use crate::settings::CampaignSettings;
use crate::sheet::StatSheet;
use crate::template::PowerCategory;
use crate::{EngineError, Id};

/// Name accepted in place of a path to select the embedded demo content.
pub const BUILTIN: &str = "builtin";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ComposeConfig {
    pub library: String,
    pub settings: Option<String>,
    pub creature: String,
    pub templates: Vec<String>,
    pub theme: Option<String>,
    pub theme_attack_power: Option<String>,
    pub theme_utility_power: Option<String>,
    pub level_adjustment: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AssessConfig {
    pub library: String,
    pub settings: Option<String>,
    /// Path to an encounter file, or the name of a built-in encounter.
    pub encounter: String,
    pub party_level: i32,
    pub party_size: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatKind {
    Creature,
    Trap,
    SkillChallenge,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreatLine {
    pub kind: ThreatKind,
    pub name: String,
    pub level: i32,
    pub count: i32,
    pub xp: i32,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncounterAssessment {
    pub name: String,
    pub xp: i32,
    pub level: i32,
    pub difficulty: Difficulty,
    pub threats: Vec<ThreatLine>,
}

/// Theme powers a creature may pick, split by category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeOptions {
    pub theme: String,
    pub attack: Vec<CreaturePower>,
    pub utility: Vec<CreaturePower>,
}

/// Read a text file, honouring a UTF-8/UTF-16 byte-order mark.
pub fn read_text_auto(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        String::from_utf8(bytes).with_context(|| format!("{} is not valid UTF-8", path.display()))
    }
}

pub fn load_library(path: &str) -> Result<Library> {
    if path == BUILTIN {
        return content::builtin_library().context("failed to parse built-in library");
    }
    let path = Path::new(path);
    let text = read_text_auto(path)?;
    Library::from_text(path, &text).with_context(|| format!("failed to parse library {}", path.display()))
}

pub fn load_settings(path: &str) -> Result<CampaignSettings> {
    let path = Path::new(path);
    let text = read_text_auto(path)?;
    CampaignSettings::from_text(path, &text)
        .with_context(|| format!("failed to parse settings {}", path.display()))
}

pub fn load_encounter(source: &str) -> Result<Encounter> {
    if let Some(parsed) = content::builtin_encounter(source) {
        return parsed.with_context(|| format!("failed to parse built-in encounter {source}"));
    }
    let path = Path::new(source);
    let text = read_text_auto(path)?;
    let parsed: std::result::Result<Encounter, EngineError> = if crate::settings::is_yaml(path) {
        serde_yaml::from_str(&text).map_err(EngineError::from)
    } else {
        serde_json::from_str(&text).map_err(EngineError::from)
    };
    parsed.with_context(|| format!("failed to parse encounter {}", path.display()))
}

fn load_registry(library: &str, settings: Option<&str>) -> Result<Library> {
    let lib = load_library(library)?;
    match settings {
        Some(path) => Ok(lib.with_settings(load_settings(path)?)),
        None => Ok(lib),
    }
}

pub fn compose(cfg: &ComposeConfig) -> Result<StatSheet> {
    let lib = load_registry(&cfg.library, cfg.settings.as_deref())?;
    let mut card = EncounterCard::new(cfg.creature.as_str()).with_level_adjustment(cfg.level_adjustment);
    for template in &cfg.templates {
        card = card.with_template(template.as_str());
    }
    if let Some(theme) = &cfg.theme {
        card = card.with_theme(
            theme.as_str(),
            cfg.theme_attack_power.as_deref().map(Id::from),
            cfg.theme_utility_power.as_deref().map(Id::from),
        );
    }
    StatSheet::build(&card, &lib, None).with_context(|| format!("cannot compose {}", cfg.creature))
}

pub fn assess(cfg: &AssessConfig) -> Result<EncounterAssessment> {
    if cfg.party_size < 1 {
        return Err(anyhow!("party size must be at least 1"));
    }
    let lib = load_registry(&cfg.library, cfg.settings.as_deref())?;
    let encounter = load_encounter(&cfg.encounter)?;
    assess_encounter(&lib, &encounter, cfg.party_level, cfg.party_size)
}

/// Aggregate and per-threat XP and difficulty. Every referenced id must resolve.
pub fn assess_encounter(
    registry: &dyn Registry,
    encounter: &Encounter,
    party_level: i32,
    party_size: i32,
) -> Result<EncounterAssessment> {
    let settings = registry.campaign_settings();
    let mut threats = Vec::new();

    for slot in encounter.opponents() {
        if registry.find_creature(&slot.card.creature_id).is_none() {
            return Err(EngineError::UnknownCreature(slot.card.creature_id.clone()))
                .with_context(|| format!("slot {}", slot.id));
        }
        threats.push(ThreatLine {
            kind: ThreatKind::Creature,
            name: slot.card.title(registry),
            level: slot.card.level(registry),
            count: slot.count(),
            xp: slot.xp(registry),
            difficulty: slot.card.difficulty(registry, party_level),
        });
    }
    for id in &encounter.traps {
        let trap = registry
            .find_trap(id)
            .ok_or_else(|| EngineError::UnknownTrap(id.clone()))?;
        threats.push(ThreatLine {
            kind: ThreatKind::Trap,
            name: trap.name.clone(),
            level: trap.level,
            count: 1,
            xp: trap.xp(settings),
            difficulty: trap.difficulty(party_level),
        });
    }
    for id in &encounter.skill_challenges {
        let challenge = registry
            .find_skill_challenge(id)
            .ok_or_else(|| EngineError::UnknownSkillChallenge(id.clone()))?;
        threats.push(ThreatLine {
            kind: ThreatKind::SkillChallenge,
            name: challenge.name.clone(),
            level: challenge.level,
            count: 1,
            xp: challenge.xp(settings),
            difficulty: challenge.difficulty(party_level),
        });
    }

    Ok(EncounterAssessment {
        name: encounter.name.clone(),
        xp: encounter.xp(registry),
        level: encounter.level(registry, party_size),
        difficulty: encounter.difficulty(registry, party_level, party_size),
        threats,
    })
}

/// Powers of `theme` suited to `creature`'s role, or every power without a creature.
pub fn theme_options(library: &str, theme: &str, creature: Option<&str>) -> Result<ThemeOptions> {
    let lib = load_library(library)?;
    let theme_id = Id::new(theme);
    let found = lib
        .find_theme(&theme_id)
        .ok_or_else(|| EngineError::UnknownTheme(theme_id.clone()))?;
    let role_type = match creature {
        Some(id) => {
            let id = Id::new(id);
            let c = lib
                .find_creature(&id)
                .ok_or_else(|| EngineError::UnknownCreature(id.clone()))?;
            c.role.role_type()
        }
        None => None,
    };
    let pick = |category: PowerCategory| -> Vec<CreaturePower> {
        found
            .powers_for(category, role_type)
            .into_iter()
            .map(|p| p.power.clone())
            .collect()
    };
    Ok(ThemeOptions {
        theme: found.name.clone(),
        attack: pick(PowerCategory::Attack),
        utility: pick(PowerCategory::Utility),
    })
}
