use indexmap::IndexMap;
use serde::Serialize;

use crate::abilities::AbilityScores;
use crate::card::{CardCategory, EncounterCard};
use crate::combat::CombatData;
use crate::conditions::names_from;
use crate::creature::{Aura, CreaturePower, Defence};
use crate::damage::DamageModifier;
use crate::error::EngineError;
use crate::registry::Registry;
use crate::role::Role;

/// Snapshot of every composed statistic of a card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatSheet {
    pub title: String,
    pub level: i32,
    pub role: Role,
    pub category: CardCategory,
    pub xp: i32,
    pub hp: i32,
    pub bloodied: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_hp: Option<i32>,
    pub ac: i32,
    pub fortitude: i32,
    pub reflex: i32,
    pub will: i32,
    pub initiative: i32,
    pub perception: i32,
    pub abilities: AbilityScores,
    pub skills: IndexMap<String, i32>,
    pub senses: Vec<String>,
    pub movement: Vec<String>,
    pub damage_modifiers: Vec<DamageModifier>,
    pub resist: Vec<String>,
    pub vulnerable: Vec<String>,
    pub immune: Vec<String>,
    pub auras: Vec<Aura>,
    pub powers: Vec<CreaturePower>,
    pub equipment: Vec<String>,
    pub tactics: Vec<String>,
    pub conditions: Vec<String>,
}

impl StatSheet {
    /// Compose `card`, failing on any reference the registry cannot resolve.
    pub fn build(
        card: &EncounterCard,
        registry: &dyn Registry,
        data: Option<&CombatData>,
    ) -> Result<Self, EngineError> {
        if registry.find_creature(&card.creature_id).is_none() {
            return Err(EngineError::UnknownCreature(card.creature_id.clone()));
        }
        if let Some(id) = card
            .template_ids
            .iter()
            .find(|id| registry.find_template(id).is_none())
        {
            return Err(EngineError::UnknownTemplate(id.clone()));
        }
        if let Some(id) = &card.theme_id {
            if registry.find_theme(id).is_none() {
                return Err(EngineError::UnknownTheme(id.clone()));
            }
        }

        let category = card.category(registry)?;
        let role = card.role(registry).unwrap_or_default();
        let hp = card.hp(registry);
        let conditions = data
            .map(|d| {
                let combatants = std::slice::from_ref(d);
                let names = names_from(combatants);
                d.conditions
                    .iter()
                    .map(|c| c.description(&names, true))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            title: card.title(registry),
            level: card.level(registry),
            role,
            category,
            xp: card.xp(registry),
            hp,
            bloodied: hp / 2,
            current_hp: data.map(|d| d.remaining_hp(hp)),
            ac: card.defence(registry, Defence::Ac, data),
            fortitude: card.defence(registry, Defence::Fortitude, data),
            reflex: card.defence(registry, Defence::Reflex, data),
            will: card.defence(registry, Defence::Will, data),
            initiative: card.initiative(registry),
            perception: card.perception(registry),
            abilities: card.abilities(registry),
            skills: card.skills(registry),
            senses: card.senses(registry),
            movement: card.movement(registry),
            damage_modifiers: card.damage_modifiers(registry, data),
            resist: card.resist(registry),
            vulnerable: card.vulnerable(registry),
            immune: card.immune(registry),
            auras: card.auras(registry, data),
            powers: card.powers(registry),
            equipment: card.equipment(registry),
            tactics: card.tactics(registry),
            conditions,
        })
    }
}
