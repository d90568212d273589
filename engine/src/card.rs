//! Stat composition: a creature plus templates, theme and level adjustment.
//!
//! An [`EncounterCard`] stores only references; every statistic is derived on
//! read from the registry. Lookup misses degrade to omissions (or the
//! `(unknown creature)` title) instead of failing.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::abilities::{AbilityScores, skill_ability};
use crate::combat::CombatData;
use crate::conditions::{OngoingKind, apply_start_of_turn};
use crate::creature::{Aura, Creature, CreaturePower, Defence};
use crate::damage::{DamageModifier, DamageType, Modifier, combined_modifier, merge_modifier, modifier_for};
use crate::dice::adjust_embedded;
use crate::error::EngineError;
use crate::experience::{Difficulty, creature_difficulty, role_xp};
use crate::registry::Registry;
use crate::role::{Role, RoleFlag, RoleType};
use crate::settings::CampaignSettings;
use crate::template::{CreatureTemplate, MonsterTheme, TemplateKind};
use crate::Id;

const UNKNOWN_CREATURE: &str = "(unknown creature)";
const PERCEPTION: &str = "Perception";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterCard {
    pub creature_id: Id,
    /// Applied in order.
    #[serde(default)]
    pub template_ids: Vec<Id>,
    #[serde(default)]
    pub level_adjustment: i32,
    #[serde(default)]
    pub theme_id: Option<Id>,
    #[serde(default)]
    pub theme_attack_power_id: Option<Id>,
    #[serde(default)]
    pub theme_utility_power_id: Option<Id>,
    #[serde(default)]
    pub drawn: bool,
}

/// Grouping bucket of a composed card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardCategory {
    Minion,
    Solo,
    Leader,
    Artillery,
    Brute,
    Controller,
    Lurker,
    Skirmisher,
    Soldier,
}

/// Everything a card refers to, looked up once per query.
struct Parts<'a> {
    creature: Option<&'a Creature>,
    templates: Vec<&'a CreatureTemplate>,
    theme: Option<&'a MonsterTheme>,
    settings: &'a CampaignSettings,
}

impl EncounterCard {
    pub fn new(creature_id: impl Into<Id>) -> Self {
        Self {
            creature_id: creature_id.into(),
            template_ids: Vec::new(),
            level_adjustment: 0,
            theme_id: None,
            theme_attack_power_id: None,
            theme_utility_power_id: None,
            drawn: false,
        }
    }

    pub fn with_template(mut self, template_id: impl Into<Id>) -> Self {
        self.template_ids.push(template_id.into());
        self
    }

    pub fn with_level_adjustment(mut self, delta: i32) -> Self {
        self.level_adjustment = delta;
        self
    }

    pub fn with_theme(
        mut self,
        theme_id: impl Into<Id>,
        attack_power: Option<Id>,
        utility_power: Option<Id>,
    ) -> Self {
        self.theme_id = Some(theme_id.into());
        self.theme_attack_power_id = attack_power;
        self.theme_utility_power_id = utility_power;
        self
    }

    fn parts<'a>(&self, registry: &'a dyn Registry) -> Parts<'a> {
        let creature = registry.find_creature(&self.creature_id);
        if creature.is_none() {
            debug!(creature = %self.creature_id, "card refers to a missing creature");
        }
        let templates = self
            .template_ids
            .iter()
            .filter_map(|id| {
                let found = registry.find_template(id);
                if found.is_none() {
                    debug!(template = %id, "skipping missing template");
                }
                found
            })
            .collect();
        let theme = self.theme_id.as_ref().and_then(|id| {
            let found = registry.find_theme(id);
            if found.is_none() {
                debug!(theme = %id, "skipping missing theme");
            }
            found
        });
        Parts {
            creature,
            templates,
            theme,
            settings: registry.campaign_settings(),
        }
    }

    pub fn creature<'a>(&self, registry: &'a dyn Registry) -> Option<&'a Creature> {
        registry.find_creature(&self.creature_id)
    }

    /// Creature name followed by applied template names.
    pub fn title(&self, registry: &dyn Registry) -> String {
        let parts = self.parts(registry);
        let name = parts
            .creature
            .map(|c| c.name.clone())
            .unwrap_or_else(|| UNKNOWN_CREATURE.to_string());
        if parts.templates.is_empty() {
            return name;
        }
        let names: Vec<&str> = parts.templates.iter().map(|t| t.name.as_str()).collect();
        format!("{} ({})", name, names.join(", "))
    }

    /// Creature level plus level adjustment, never below 1.
    pub fn level(&self, registry: &dyn Registry) -> i32 {
        let base = self.creature(registry).map(|c| c.level).unwrap_or(0);
        (base + self.level_adjustment).max(1)
    }

    /// Effective role after template escalation; `None` for a missing creature.
    pub fn role(&self, registry: &dyn Registry) -> Option<Role> {
        let parts = self.parts(registry);
        parts.creature.map(|c| effective_role(&c.role, &parts.templates))
    }

    pub fn flag(&self, registry: &dyn Registry) -> RoleFlag {
        self.role(registry).map(|r| r.flag()).unwrap_or_default()
    }

    pub fn abilities(&self, registry: &dyn Registry) -> AbilityScores {
        self.creature(registry)
            .map(|c| c.abilities)
            .unwrap_or_default()
    }

    pub fn hp(&self, registry: &dyn Registry) -> i32 {
        let parts = self.parts(registry);
        let Some(creature) = parts.creature else {
            return 0;
        };
        let Role::Complex { role_type, .. } = creature.role else {
            return creature.hp();
        };
        let level = self.level(registry);
        let flag = effective_role(&creature.role, &parts.templates).flag();

        let mut hp = creature.hp();
        if !parts.templates.is_empty() {
            let per_level = parts
                .templates
                .iter()
                .map(|t| t.hp_per_level)
                .max()
                .unwrap_or(0);
            hp += per_level * level + creature.abilities.constitution.score;
            if flag == RoleFlag::Solo && creature.role.flag() != RoleFlag::Solo {
                hp *= 2;
            }
        }
        hp += level_adjustment_hp(role_type, flag, self.level_adjustment);
        parts.settings.scale_hp(hp)
    }

    /// Defence including templates, level adjustment, campaign bonus and,
    /// when combat data is given, defence-modifier conditions.
    pub fn defence(&self, registry: &dyn Registry, defence: Defence, data: Option<&CombatData>) -> i32 {
        let parts = self.parts(registry);
        let Some(creature) = parts.creature else {
            return 0;
        };
        let templates: i32 = parts.templates.iter().map(|t| t.defence(defence)).sum();
        let campaign = match defence {
            Defence::Ac => parts.settings.ac_bonus,
            _ => parts.settings.nad_bonus,
        };
        let conditions: i32 = data
            .map(|d| {
                d.conditions
                    .iter()
                    .filter_map(|c| match &c.kind {
                        OngoingKind::DefenceModifier { delta, defences }
                            if defences.is_empty() || defences.contains(&defence) =>
                        {
                            Some(*delta)
                        }
                        _ => None,
                    })
                    .sum()
            })
            .unwrap_or(0);
        creature.defence(defence) + templates + self.level_adjustment + campaign + conditions
    }

    pub fn initiative(&self, registry: &dyn Registry) -> i32 {
        let parts = self.parts(registry);
        let Some(creature) = parts.creature else {
            return 0;
        };
        let templates: i32 = parts.templates.iter().map(|t| t.initiative).sum();
        creature.initiative() + templates + self.level_adjustment / 2
    }

    /// Perception, re-derived for the effective level plus any theme bonus.
    pub fn perception(&self, registry: &dyn Registry) -> i32 {
        let parts = self.parts(registry);
        let Some(creature) = parts.creature else {
            return 0;
        };
        let theme_bonus = parts
            .theme
            .and_then(|t| lookup_skill(&t.skill_bonuses, PERCEPTION))
            .unwrap_or(0);
        rederive(creature.perception(), creature.level, self.level(registry)) + theme_bonus
    }

    /// Skills other than Perception, re-derived for the effective level.
    pub fn skills(&self, registry: &dyn Registry) -> IndexMap<String, i32> {
        let parts = self.parts(registry);
        let Some(creature) = parts.creature else {
            return IndexMap::new();
        };
        let level = self.level(registry);
        let mut skills: IndexMap<String, i32> = creature
            .skills
            .iter()
            .filter(|(name, _)| !is_perception(name))
            .map(|(name, bonus)| (name.clone(), rederive(*bonus, creature.level, level)))
            .collect();

        if let Some(theme) = parts.theme {
            for (name, bonus) in theme.skill_bonuses.iter().filter(|(n, _)| !is_perception(n)) {
                let existing = skills
                    .iter_mut()
                    .find(|(n, _)| n.eq_ignore_ascii_case(name))
                    .map(|(_, v)| v);
                match existing {
                    Some(value) => *value += bonus,
                    None => {
                        let ability = skill_ability(name)
                            .map(|a| creature.abilities.modifier(a))
                            .unwrap_or(0);
                        skills.insert(name.clone(), ability + level / 2 + bonus);
                    }
                }
            }
        }
        skills
    }

    /// Creature modifiers merged with each template's tiered modifiers and,
    /// when combat data is given, damage-modifier conditions.
    pub fn damage_modifiers(&self, registry: &dyn Registry, data: Option<&CombatData>) -> Vec<DamageModifier> {
        let parts = self.parts(registry);
        let Some(creature) = parts.creature else {
            return Vec::new();
        };
        let mut mods = creature.damage_modifiers.clone();
        for template in &parts.templates {
            for dmt in &template.damage_modifiers {
                merge_modifier(&mut mods, dmt.modifier_at(creature.level));
            }
        }
        if let Some(data) = data {
            for c in &data.conditions {
                if let OngoingKind::DamageModifier(m) = &c.kind {
                    merge_modifier(&mut mods, *m);
                }
            }
        }
        mods
    }

    /// Net modifier against damage carrying all of `types`.
    pub fn damage_modifier(
        &self,
        registry: &dyn Registry,
        types: &[DamageType],
        data: Option<&CombatData>,
    ) -> Option<Modifier> {
        combined_modifier(&self.damage_modifiers(registry, data), types)
    }

    pub fn powers(&self, registry: &dyn Registry) -> Vec<CreaturePower> {
        let parts = self.parts(registry);
        let Some(creature) = parts.creature else {
            return Vec::new();
        };
        let level = self.level(registry);
        let mut powers = creature.powers.clone();

        for template in &parts.templates {
            for power in &template.powers {
                let mut power = power.clone();
                if template.kind == TemplateKind::Functional {
                    if let Some(attack) = power.attack.as_mut() {
                        attack.bonus += level;
                    }
                }
                powers.push(power);
            }
        }

        if let Some(theme) = parts.theme {
            let selected = [&self.theme_attack_power_id, &self.theme_utility_power_id];
            for id in selected.into_iter().flatten() {
                match theme.find_power(id) {
                    Some(tp) => powers.push(tp.power.clone()),
                    None => debug!(power = %id, theme = %theme.id, "skipping missing theme power"),
                }
            }
        }

        let bonus = self.level_adjustment + parts.settings.attack_bonus;
        for power in &mut powers {
            if let Some(attack) = power.attack.as_mut() {
                attack.bonus += bonus;
            }
            if self.level_adjustment != 0 {
                power.details = adjust_embedded(&power.details, self.level_adjustment);
            }
        }
        powers
    }

    pub fn auras(&self, registry: &dyn Registry, data: Option<&CombatData>) -> Vec<Aura> {
        let parts = self.parts(registry);
        let mut auras: Vec<Aura> = parts
            .creature
            .map(|c| c.auras.clone())
            .unwrap_or_default();
        for template in &parts.templates {
            auras.extend(template.auras.iter().cloned());
        }
        if let Some(data) = data {
            auras.extend(data.conditions.iter().filter_map(|c| match &c.kind {
                OngoingKind::Aura(a) => Some(a.clone()),
                _ => None,
            }));
        }
        auras
    }

    pub fn senses(&self, registry: &dyn Registry) -> Vec<String> {
        self.text_list(registry, |c| &c.senses, |t| &t.senses)
    }

    pub fn movement(&self, registry: &dyn Registry) -> Vec<String> {
        self.text_list(registry, |c| &c.movement, |t| &t.movement)
    }

    pub fn equipment(&self, registry: &dyn Registry) -> Vec<String> {
        self.text_list(registry, |c| &c.equipment, |_| &[])
    }

    pub fn resist(&self, registry: &dyn Registry) -> Vec<String> {
        self.text_list(registry, |c| &c.resist, |t| &t.resist)
    }

    pub fn vulnerable(&self, registry: &dyn Registry) -> Vec<String> {
        self.text_list(registry, |c| &c.vulnerable, |t| &t.vulnerable)
    }

    pub fn immune(&self, registry: &dyn Registry) -> Vec<String> {
        self.text_list(registry, |c| &c.immune, |t| &t.immune)
    }

    pub fn tactics(&self, registry: &dyn Registry) -> Vec<String> {
        self.text_list(registry, |c| &c.tactics, |t| &t.tactics)
    }

    fn text_list(
        &self,
        registry: &dyn Registry,
        from_creature: impl Fn(&Creature) -> &[String],
        from_template: impl Fn(&CreatureTemplate) -> &[String],
    ) -> Vec<String> {
        let parts = self.parts(registry);
        let creature_entries = parts.creature.map(|c| from_creature(c)).unwrap_or(&[]);
        creature_entries
            .iter()
            .chain(parts.templates.iter().flat_map(|t| from_template(t).iter()))
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// XP value, scaled by the campaign multiplier; 0 for a missing creature.
    pub fn xp(&self, registry: &dyn Registry) -> i32 {
        match self.role(registry) {
            Some(role) => role_xp(self.level(registry), &role, registry.campaign_settings()),
            None => 0,
        }
    }

    pub fn difficulty(&self, registry: &dyn Registry, party_level: i32) -> Difficulty {
        creature_difficulty(self.level(registry), party_level)
    }

    pub fn category(&self, registry: &dyn Registry) -> Result<CardCategory, EngineError> {
        let role = self.role(registry).ok_or_else(|| EngineError::Unclassifiable {
            creature_id: self.creature_id.clone(),
        })?;
        Ok(match role {
            Role::Minion => CardCategory::Minion,
            Role::Complex {
                flag: RoleFlag::Solo,
                ..
            } => CardCategory::Solo,
            Role::Complex { leader: true, .. } => CardCategory::Leader,
            Role::Complex { role_type, .. } => match role_type {
                RoleType::Artillery => CardCategory::Artillery,
                RoleType::Brute => CardCategory::Brute,
                RoleType::Controller => CardCategory::Controller,
                RoleType::Lurker => CardCategory::Lurker,
                RoleType::Skirmisher => CardCategory::Skirmisher,
                RoleType::Soldier => CardCategory::Soldier,
            },
        })
    }

    /// Ongoing damage (after this card's modifiers) and regeneration at the
    /// start of the combatant's turn. Returns `(damage_taken, hp_regenerated)`.
    pub fn start_turn(&self, registry: &dyn Registry, data: &mut CombatData, log: impl FnMut(String)) -> (i32, i32) {
        let mods = self.damage_modifiers(registry, Some(&*data));
        let max_hp = self.hp(registry);
        apply_start_of_turn(data, max_hp, |t| modifier_for(&mods, t), log)
    }
}

/// Role after template escalation. Minions are never escalated.
fn effective_role(base: &Role, templates: &[&CreatureTemplate]) -> Role {
    match *base {
        Role::Minion => Role::Minion,
        Role::Complex {
            role_type,
            flag,
            leader,
        } => {
            let steps = flag.steps() + templates.iter().map(|t| t.flag.steps()).sum::<u32>();
            Role::Complex {
                role_type,
                flag: RoleFlag::from_steps(steps),
                leader: leader || templates.iter().any(|t| t.leader),
            }
        }
    }
}

/// HP change for a level adjustment, scaled by the flag's threat factor.
pub fn level_adjustment_hp(role_type: RoleType, flag: RoleFlag, delta: i32) -> i32 {
    role_type.hp_per_level() * delta * flag.xp_factor()
}

/// Strip the half-level baked into a bonus and reapply it at `level`.
fn rederive(bonus: i32, base_level: i32, level: i32) -> i32 {
    bonus - base_level / 2 + level / 2
}

fn is_perception(name: &str) -> bool {
    name.trim().eq_ignore_ascii_case(PERCEPTION)
}

fn lookup_skill(skills: &IndexMap<String, i32>, name: &str) -> Option<i32> {
    skills
        .iter()
        .find(|(n, _)| n.trim().eq_ignore_ascii_case(name))
        .map(|(_, v)| *v)
}
