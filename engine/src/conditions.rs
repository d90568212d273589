use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Id;
use crate::combat::CombatData;
use crate::creature::{Aura, Defence};
use crate::damage::{DamageModifier, DamageType, Modifier, adjust_damage};

const UNKNOWN_CREATURE: &str = "(unknown creature)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionDuration {
    /// Lasts until removed by hand.
    #[default]
    Encounter,
    SaveEnds,
    BeginningOfTurn,
    EndOfTurn,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Regeneration {
    pub value: i32,
    #[serde(default)]
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OngoingKind {
    Condition {
        text: String,
    },
    Damage {
        value: i32,
        #[serde(default)]
        damage_type: Option<DamageType>,
    },
    /// Empty `defences` means all four.
    DefenceModifier {
        delta: i32,
        #[serde(default)]
        defences: Vec<Defence>,
    },
    DamageModifier(DamageModifier),
    Regeneration(Regeneration),
    Aura(Aura),
}

/// Condition currently affecting a combatant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OngoingCondition {
    pub kind: OngoingKind,
    #[serde(default)]
    pub duration: ConditionDuration,
    /// Whose turn boundary ends a turn-based duration.
    #[serde(default)]
    pub duration_creature_id: Option<Id>,
    /// First round in which the turn boundary may end the condition.
    #[serde(default)]
    pub duration_round: i32,
    #[serde(default)]
    pub saving_throw_modifier: Option<i32>,
}

/// Lifecycle hooks to expire conditions or allow saves at turn boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnBoundary {
    StartOfTurn,
    EndOfTurn,
}

impl OngoingCondition {
    pub fn new(kind: OngoingKind) -> Self {
        Self {
            kind,
            duration: ConditionDuration::Encounter,
            duration_creature_id: None,
            duration_round: 0,
            saving_throw_modifier: None,
        }
    }

    pub fn save_ends(kind: OngoingKind, saving_throw_modifier: Option<i32>) -> Self {
        Self {
            duration: ConditionDuration::SaveEnds,
            saving_throw_modifier,
            ..Self::new(kind)
        }
    }

    /// Lasts until `creature`'s next start or end of turn. Applied during that
    /// creature's own turn, the current round's boundary does not count.
    pub fn until_turn(
        kind: OngoingKind,
        boundary: TurnBoundary,
        creature: Id,
        current_round: i32,
        during_own_turn: bool,
    ) -> Self {
        let duration = match boundary {
            TurnBoundary::StartOfTurn => ConditionDuration::BeginningOfTurn,
            TurnBoundary::EndOfTurn => ConditionDuration::EndOfTurn,
        };
        Self {
            duration,
            duration_creature_id: Some(creature),
            duration_round: current_round + i32::from(during_own_turn),
            ..Self::new(kind)
        }
    }

    pub fn expires_at(&self, boundary: TurnBoundary, creature: &Id, round: i32) -> bool {
        let matches_boundary = matches!(
            (self.duration, boundary),
            (ConditionDuration::BeginningOfTurn, TurnBoundary::StartOfTurn)
                | (ConditionDuration::EndOfTurn, TurnBoundary::EndOfTurn)
        );
        matches_boundary
            && self.duration_creature_id.as_ref() == Some(creature)
            && round >= self.duration_round
    }

    pub fn effect_text(&self) -> String {
        match &self.kind {
            OngoingKind::Condition { text } => text.clone(),
            OngoingKind::Damage {
                value,
                damage_type: Some(t),
            } => format!("{value} ongoing {t} damage"),
            OngoingKind::Damage {
                value,
                damage_type: None,
            } => format!("{value} ongoing damage"),
            OngoingKind::DefenceModifier { delta, defences } => {
                let covers_all = Defence::ALL.iter().all(|d| defences.contains(d));
                let target = if defences.is_empty() || covers_all {
                    "defences".to_string()
                } else {
                    defences
                        .iter()
                        .map(|d| d.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                format!("{delta:+} to {target}")
            }
            OngoingKind::DamageModifier(m) => m.to_string(),
            OngoingKind::Regeneration(r) if r.details.trim().is_empty() => {
                format!("Regeneration {}", r.value)
            }
            OngoingKind::Regeneration(r) => format!("Regeneration {} ({})", r.value, r.details),
            OngoingKind::Aura(a) => a.to_string(),
        }
    }

    pub fn duration_text(&self, names: impl Fn(&Id) -> Option<String>) -> Option<String> {
        let name = || {
            self.duration_creature_id
                .as_ref()
                .and_then(&names)
                .unwrap_or_else(|| UNKNOWN_CREATURE.to_string())
        };
        match self.duration {
            ConditionDuration::Encounter => None,
            ConditionDuration::SaveEnds => Some(match self.saving_throw_modifier {
                Some(m) if m != 0 => format!("(save ends, {m:+} to saving throws)"),
                _ => "(save ends)".to_string(),
            }),
            ConditionDuration::BeginningOfTurn => {
                Some(format!("until the start of {}'s next turn", name()))
            }
            ConditionDuration::EndOfTurn => Some(format!("until the end of {}'s next turn", name())),
        }
    }

    /// Full description, optionally with the duration clause appended.
    pub fn description(&self, names: impl Fn(&Id) -> Option<String>, include_duration: bool) -> String {
        let effect = self.effect_text();
        if !include_duration {
            return effect;
        }
        match self.duration_text(names) {
            Some(clause) => format!("{effect} {clause}"),
            None => effect,
        }
    }
}

/// Look up display names among the combatants of an encounter.
pub fn names_from(combatants: &[CombatData]) -> impl Fn(&Id) -> Option<String> + '_ {
    move |id: &Id| {
        combatants
            .iter()
            .find(|c| &c.id == id)
            .map(|c| c.display_name.clone())
    }
}

/// Expire conditions at `acting`'s turn boundary across all combatants.
///
/// At the end of the turn the acting combatant also saves against each of
/// its own save-ends conditions; `saving_throw` resolves the roll. Returns
/// the conditions that ended.
pub fn process_turn_boundary(
    boundary: TurnBoundary,
    acting: &Id,
    round: i32,
    combatants: &mut [CombatData],
    mut saving_throw: impl FnMut(&CombatData, &OngoingCondition) -> bool,
    mut log: impl FnMut(String),
) -> Vec<OngoingCondition> {
    let mut ended = Vec::new();

    if boundary == TurnBoundary::EndOfTurn {
        if let Some(pos) = combatants.iter().position(|c| &c.id == acting) {
            let saved: Vec<usize> = {
                let data = &combatants[pos];
                data.conditions
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| c.duration == ConditionDuration::SaveEnds)
                    .filter(|(_, c)| {
                        let success = saving_throw(data, c);
                        log(format!(
                            "[SAVE][{}] vs {} → {}",
                            data.display_name,
                            c.effect_text(),
                            if success { "SUCCESS" } else { "FAIL" }
                        ));
                        success
                    })
                    .map(|(idx, _)| idx)
                    .collect()
            };
            let data = &mut combatants[pos];
            for idx in saved.into_iter().rev() {
                let removed = data.conditions.remove(idx);
                debug!(combatant = %data.id, condition = %removed.effect_text(), "saved against condition");
                log(format!(
                    "[COND][{}] is no longer affected by {}",
                    data.display_name,
                    removed.effect_text()
                ));
                ended.push(removed);
            }
        }
    }

    let acting_name = names_from(combatants)(acting).unwrap_or_else(|| UNKNOWN_CREATURE.to_string());
    for data in combatants.iter_mut() {
        let mut idx = 0;
        while idx < data.conditions.len() {
            if data.conditions[idx].expires_at(boundary, acting, round) {
                let removed = data.conditions.remove(idx);
                debug!(combatant = %data.id, condition = %removed.effect_text(), round, "condition expired");
                log(format!(
                    "[COND][{}] {} ends at {:?} of {}",
                    data.display_name,
                    removed.effect_text(),
                    boundary,
                    acting_name
                ));
                ended.push(removed);
            } else {
                idx += 1;
            }
        }
    }

    ended
}

/// Ongoing damage due at the start of a turn: the highest value per damage type.
pub fn ongoing_damage(conditions: &[OngoingCondition]) -> Vec<(Option<DamageType>, i32)> {
    let mut out: Vec<(Option<DamageType>, i32)> = Vec::new();
    for c in conditions {
        if let OngoingKind::Damage { value, damage_type } = &c.kind {
            match out.iter_mut().find(|(t, _)| t == damage_type) {
                Some(entry) => entry.1 = entry.1.max(*value),
                None => out.push((*damage_type, *value)),
            }
        }
    }
    out
}

/// Highest regeneration among the conditions, 0 if none.
pub fn regeneration(conditions: &[OngoingCondition]) -> i32 {
    conditions
        .iter()
        .filter_map(|c| match &c.kind {
            OngoingKind::Regeneration(r) => Some(r.value),
            _ => None,
        })
        .max()
        .unwrap_or(0)
}

/// Apply ongoing damage and regeneration at the start of the combatant's turn.
/// `modifier` gives the combatant's net modifier against a damage type.
/// Returns `(damage_taken, hp_regenerated)`.
pub fn apply_start_of_turn(
    data: &mut CombatData,
    max_hp: i32,
    modifier: impl Fn(DamageType) -> Option<Modifier>,
    mut log: impl FnMut(String),
) -> (i32, i32) {
    let mut taken = 0;
    for (damage_type, value) in ongoing_damage(&data.conditions) {
        let amount = adjust_damage(value, damage_type.and_then(&modifier));
        taken += data.take_damage(amount, &mut log);
    }

    let mut regenerated = 0;
    let regen = regeneration(&data.conditions);
    if regen > 0 && !data.is_defeated(max_hp) {
        regenerated = data.heal(regen, &mut log);
    }
    (taken, regenerated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_floor_skips_current_round_when_applied_on_own_turn() {
        let c = OngoingCondition::until_turn(
            OngoingKind::Condition { text: "Dazed".into() },
            TurnBoundary::EndOfTurn,
            Id::new("ogre"),
            3,
            true,
        );
        let ogre = Id::new("ogre");
        assert!(!c.expires_at(TurnBoundary::EndOfTurn, &ogre, 3));
        assert!(c.expires_at(TurnBoundary::EndOfTurn, &ogre, 4));
        assert!(!c.expires_at(TurnBoundary::StartOfTurn, &ogre, 4));
        assert!(!c.expires_at(TurnBoundary::EndOfTurn, &Id::new("goblin"), 4));
    }

    #[test]
    fn encounter_duration_never_expires() {
        let c = OngoingCondition::new(OngoingKind::Condition { text: "Marked".into() });
        let any = Id::new("x");
        assert!(!c.expires_at(TurnBoundary::StartOfTurn, &any, 99));
        assert!(!c.expires_at(TurnBoundary::EndOfTurn, &any, 99));
    }

    #[test]
    fn ongoing_damage_keeps_highest_per_type() {
        let conds = vec![
            OngoingCondition::new(OngoingKind::Damage {
                value: 5,
                damage_type: Some(DamageType::Fire),
            }),
            OngoingCondition::new(OngoingKind::Damage {
                value: 10,
                damage_type: Some(DamageType::Fire),
            }),
            OngoingCondition::new(OngoingKind::Damage {
                value: 3,
                damage_type: None,
            }),
        ];
        assert_eq!(
            ongoing_damage(&conds),
            vec![(Some(DamageType::Fire), 10), (None, 3)]
        );
    }
}
