//! Post-encounter report: per-combatant tables and MVP scoring.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::Id;
use crate::log::{EncounterEvent, EncounterLog};

/// Points for the 1st..10th distinct value of a table.
pub const MVP_POINTS: [i32; 10] = [25, 18, 15, 12, 10, 8, 6, 4, 2, 1];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Party,
    #[default]
    Opposition,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub is_pc: bool,
    #[serde(default)]
    pub side: Side,
}

impl RosterEntry {
    pub fn pc(id: impl Into<Id>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_pc: true,
            side: Side::Party,
        }
    }

    pub fn npc(id: impl Into<Id>, name: impl Into<String>, side: Side) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_pc: false,
            side,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub combatant: Id,
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportTable {
    pub title: String,
    pub lower_is_better: bool,
    pub rows: Vec<ReportRow>,
}

impl ReportTable {
    fn new(title: &str, lower_is_better: bool) -> Self {
        Self {
            title: title.to_string(),
            lower_is_better,
            rows: Vec::new(),
        }
    }

    /// Points per combatant. Equal values share a rank; each distinct value
    /// takes the next rank.
    pub fn points(&self) -> IndexMap<Id, i32> {
        let score = |v: f64| if self.lower_is_better { -v } else { v };
        let mut distinct: Vec<f64> = self.rows.iter().map(|r| score(r.value)).collect();
        distinct.sort_by(|a, b| b.total_cmp(a));
        distinct.dedup();
        self.rows
            .iter()
            .map(|r| {
                let rank = distinct
                    .iter()
                    .position(|v| *v == score(r.value))
                    .unwrap_or(usize::MAX);
                (r.combatant.clone(), MVP_POINTS.get(rank).copied().unwrap_or(0))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
struct Tally {
    turns: u32,
    turn_seconds: f64,
    damage_to_enemies: i32,
    damage_to_allies: i32,
    damage_taken: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterReport {
    pub rounds: i32,
    pub elapsed_seconds: f64,
    pub turn_time: ReportTable,
    pub damage_to_enemies: ReportTable,
    pub damage_to_allies: ReportTable,
    pub damage_taken: IndexMap<Id, i32>,
}

impl EncounterReport {
    /// Segment the log into turns and attribute damage to the acting combatant.
    pub fn new(log: &EncounterLog, roster: &[RosterEntry]) -> Self {
        let mut tally: IndexMap<Id, Tally> = roster
            .iter()
            .map(|r| (r.id.clone(), Tally::default()))
            .collect();
        let side_of = |id: &Id| roster.iter().find(|r| &r.id == id).map(|r| r.side);

        let mut current: Option<(Id, DateTime<Utc>)> = None;
        for entry in &log.entries {
            match &entry.event {
                EncounterEvent::StartTurn { combatant } => {
                    current = Some((combatant.clone(), entry.timestamp));
                }
                EncounterEvent::EndTurn { combatant } => {
                    if let Some((actor, start)) = current.take() {
                        if &actor == combatant {
                            let t = tally.entry(actor).or_default();
                            t.turns += 1;
                            t.turn_seconds += seconds_between(start, entry.timestamp);
                        }
                    }
                }
                EncounterEvent::Damage { target, amount, .. } => {
                    tally.entry(target.clone()).or_default().damage_taken += amount;
                    let Some((actor, _)) = &current else {
                        continue;
                    };
                    // ongoing damage on one's own turn only counts as damage taken
                    if actor == target {
                        continue;
                    }
                    match (side_of(actor), side_of(target)) {
                        (Some(a), Some(t)) if a == t => {
                            tally.entry(actor.clone()).or_default().damage_to_allies += amount;
                        }
                        (Some(a), Some(t)) if a != Side::Neutral && t != Side::Neutral => {
                            tally.entry(actor.clone()).or_default().damage_to_enemies += amount;
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        let mut turn_time = ReportTable::new("Mean turn time", true);
        let mut damage_to_enemies = ReportTable::new("Damage to enemies", false);
        let mut damage_to_allies = ReportTable::new("Damage to allies", true);
        for pc in roster.iter().filter(|r| r.is_pc) {
            let t = tally.get(&pc.id).cloned().unwrap_or_default();
            let row = |value: f64| ReportRow {
                combatant: pc.id.clone(),
                name: pc.name.clone(),
                value,
            };
            if t.turns > 0 {
                turn_time.rows.push(row(t.turn_seconds / t.turns as f64));
            }
            damage_to_enemies.rows.push(row(t.damage_to_enemies as f64));
            damage_to_allies.rows.push(row(t.damage_to_allies as f64));
        }

        let elapsed_seconds = match (log.started(), log.ended()) {
            (Some(start), Some(end)) => seconds_between(start, end),
            _ => 0.0,
        };

        Self {
            rounds: log.rounds(),
            elapsed_seconds,
            turn_time,
            damage_to_enemies,
            damage_to_allies,
            damage_taken: tally
                .into_iter()
                .map(|(id, t)| (id, t.damage_taken))
                .collect(),
        }
    }

    pub fn tables(&self) -> [&ReportTable; 3] {
        [&self.turn_time, &self.damage_to_enemies, &self.damage_to_allies]
    }

    /// Points summed over all tables.
    pub fn mvp_points(&self) -> IndexMap<Id, i32> {
        let mut totals: IndexMap<Id, i32> = IndexMap::new();
        for table in self.tables() {
            for (id, points) in table.points() {
                *totals.entry(id).or_default() += points;
            }
        }
        totals
    }

    /// Highest-scoring combatants; ties produce several MVPs.
    pub fn mvps(&self) -> Vec<Id> {
        let totals = self.mvp_points();
        let Some(best) = totals.values().copied().max() else {
            return Vec::new();
        };
        totals
            .into_iter()
            .filter(|(_, points)| *points == best)
            .map(|(id, _)| id)
            .collect()
    }
}

fn seconds_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(values: &[(&str, f64)], lower_is_better: bool) -> ReportTable {
        let mut t = ReportTable::new("t", lower_is_better);
        t.rows = values
            .iter()
            .map(|(id, v)| ReportRow {
                combatant: Id::new(*id),
                name: id.to_string(),
                value: *v,
            })
            .collect();
        t
    }

    #[test]
    fn ties_share_points() {
        let p = table(&[("a", 30.0), ("b", 30.0), ("c", 12.0)], false).points();
        assert_eq!(p[&Id::new("a")], 25);
        assert_eq!(p[&Id::new("b")], 25);
        assert_eq!(p[&Id::new("c")], 18);
    }

    #[test]
    fn lower_is_better_inverts() {
        let p = table(&[("a", 40.0), ("b", 20.0)], true).points();
        assert_eq!(p[&Id::new("b")], 25);
        assert_eq!(p[&Id::new("a")], 18);
    }

    #[test]
    fn beyond_tenth_scores_zero() {
        let rows: Vec<(String, f64)> = (0..12).map(|i| (format!("pc{i}"), i as f64)).collect();
        let rows: Vec<(&str, f64)> = rows.iter().map(|(n, v)| (n.as_str(), *v)).collect();
        let p = table(&rows, false).points();
        assert_eq!(p[&Id::new("pc11")], 25);
        assert_eq!(p[&Id::new("pc2")], 1);
        assert_eq!(p[&Id::new("pc1")], 0);
        assert_eq!(p[&Id::new("pc0")], 0);
    }
}
