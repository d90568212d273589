//! Encounter rosters and their aggregate XP, level and difficulty.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Dice;
use crate::Id;
use crate::card::EncounterCard;
use crate::combat::CombatData;
use crate::experience::{Difficulty, level_for_xp, threat_difficulty};
use crate::registry::Registry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotType {
    #[default]
    Opponent,
    Ally,
    Neutral,
}

/// One roster entry: a composed card and its live instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterSlot {
    pub id: Id,
    pub card: EncounterCard,
    #[serde(default)]
    pub combat_data: Vec<CombatData>,
    #[serde(default)]
    pub slot_type: SlotType,
}

impl EncounterSlot {
    pub fn new(id: impl Into<Id>, card: EncounterCard) -> Self {
        Self {
            id: id.into(),
            card,
            combat_data: Vec::new(),
            slot_type: SlotType::Opponent,
        }
    }

    /// Add `count` instances named after the card title ("Goblin 1", "Goblin 2", ...).
    pub fn with_instances(mut self, registry: &dyn Registry, count: usize) -> Self {
        let title = self.card.title(registry);
        let start = self.combat_data.len();
        for n in start + 1..=start + count {
            let id = Id::new(format!("{}-{}", self.id, n));
            self.combat_data.push(CombatData::new(id, format!("{title} {n}")));
        }
        self
    }

    pub fn with_slot_type(mut self, slot_type: SlotType) -> Self {
        self.slot_type = slot_type;
        self
    }

    /// Instances counted for XP; a slot without live data still counts once.
    pub fn count(&self) -> i32 {
        self.combat_data.len().max(1) as i32
    }

    /// XP for every instance. Allies subtract their XP; neutrals are worth nothing.
    pub fn xp(&self, registry: &dyn Registry) -> i32 {
        let total = self.card.xp(registry) * self.count();
        match self.slot_type {
            SlotType::Opponent => total,
            SlotType::Ally => -total,
            SlotType::Neutral => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Encounter {
    pub name: String,
    pub slots: Vec<EncounterSlot>,
    pub traps: Vec<Id>,
    pub skill_challenges: Vec<Id>,
    pub notes: Vec<String>,
}

impl Encounter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn opponents(&self) -> impl Iterator<Item = &EncounterSlot> {
        self.slots
            .iter()
            .filter(|s| s.slot_type == SlotType::Opponent)
    }

    /// Total XP of slots, traps and skill challenges, never negative.
    pub fn xp(&self, registry: &dyn Registry) -> i32 {
        let settings = registry.campaign_settings();
        let slots: i32 = self.slots.iter().map(|s| s.xp(registry)).sum();
        let traps: i32 = self
            .traps
            .iter()
            .filter_map(|id| registry.find_trap(id))
            .map(|t| t.xp(settings))
            .sum();
        let challenges: i32 = self
            .skill_challenges
            .iter()
            .filter_map(|id| registry.find_skill_challenge(id))
            .map(|c| c.xp(settings))
            .sum();
        (slots + traps + challenges).max(0)
    }

    /// Level whose creature XP best matches the XP per party member.
    pub fn level(&self, registry: &dyn Registry, party_size: i32) -> i32 {
        let divisor = registry.campaign_settings().xp_divisor();
        let per_member = self.xp(registry) as f64 / divisor / party_size.max(1) as f64;
        let level = level_for_xp(per_member);
        debug!(per_member, level, "resolved encounter level");
        level
    }

    /// Opponent slots whose creature resolves; the rest are omitted.
    fn resolved_opponents<'a>(&'a self, registry: &'a dyn Registry) -> impl Iterator<Item = &'a EncounterSlot> + 'a {
        self.opponents().filter(move |s| {
            let found = s.card.creature(registry).is_some();
            if !found {
                debug!(slot = %s.id, creature = %s.card.creature_id, "skipping slot with a missing creature");
            }
            found
        })
    }

    fn is_empty(&self, registry: &dyn Registry) -> bool {
        self.resolved_opponents(registry).next().is_none()
            && !self.traps.iter().any(|id| registry.find_trap(id).is_some())
            && !self
                .skill_challenges
                .iter()
                .any(|id| registry.find_skill_challenge(id).is_some())
    }

    /// Worst band across opponents, traps, skill challenges and the overall
    /// XP-per-member level.
    pub fn difficulty(&self, registry: &dyn Registry, party_level: i32, party_size: i32) -> Difficulty {
        if self.is_empty(registry) {
            return Difficulty::Trivial;
        }
        let overall = threat_difficulty(self.level(registry, party_size), party_level);
        let opponents = self
            .resolved_opponents(registry)
            .map(|s| s.card.difficulty(registry, party_level));
        let traps = self
            .traps
            .iter()
            .filter_map(|id| registry.find_trap(id))
            .map(|t| t.difficulty(party_level));
        let challenges = self
            .skill_challenges
            .iter()
            .filter_map(|id| registry.find_skill_challenge(id))
            .map(|c| c.difficulty(party_level));
        opponents
            .chain(traps)
            .chain(challenges)
            .fold(overall, Difficulty::max)
    }

    pub fn combatants(&self) -> impl Iterator<Item = &CombatData> {
        self.slots.iter().flat_map(|s| s.combat_data.iter())
    }

    pub fn find_combatant(&self, id: &Id) -> Option<(&EncounterSlot, &CombatData)> {
        self.slots
            .iter()
            .find_map(|s| s.combat_data.iter().find(|c| &c.id == id).map(|c| (s, c)))
    }

    pub fn find_combatant_mut(&mut self, id: &Id) -> Option<(&EncounterCard, &mut CombatData)> {
        self.slots.iter_mut().find_map(|s| {
            let card = &s.card;
            s.combat_data
                .iter_mut()
                .find(|c| &c.id == id)
                .map(|c| (card, c))
        })
    }

    /// Apply ongoing damage and regeneration at the start of a combatant's
    /// turn. `None` when no instance has that id.
    pub fn start_turn(
        &mut self,
        registry: &dyn Registry,
        id: &Id,
        log: impl FnMut(String),
    ) -> Option<(i32, i32)> {
        let (card, data) = self.find_combatant_mut(id)?;
        Some(card.start_turn(registry, data, log))
    }

    /// Roll initiative for every instance: d20 plus the card's initiative.
    pub fn roll_initiative(&mut self, registry: &dyn Registry, dice: &mut Dice) {
        for slot in &mut self.slots {
            let bonus = slot.card.initiative(registry);
            for data in &mut slot.combat_data {
                data.roll_initiative(dice, bonus);
            }
        }
    }

    /// Combatants with rolled initiative, highest first; ties keep roster order.
    pub fn initiative_order(&self) -> Vec<&CombatData> {
        let mut order: Vec<&CombatData> = self
            .combatants()
            .filter(|c| c.initiative.is_some())
            .collect();
        order.sort_by(|a, b| b.initiative.cmp(&a.initiative));
        order
    }

    pub fn reset(&mut self) {
        for data in self.slots.iter_mut().flat_map(|s| s.combat_data.iter_mut()) {
            data.reset();
        }
    }
}
