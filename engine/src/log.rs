use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Id;
use crate::damage::DamageType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EncounterEvent {
    StartEncounter,
    EndEncounter,
    StartRound {
        round: i32,
    },
    StartTurn {
        combatant: Id,
    },
    EndTurn {
        combatant: Id,
    },
    Damage {
        target: Id,
        amount: i32,
        #[serde(default)]
        types: Vec<DamageType>,
    },
    Heal {
        target: Id,
        amount: i32,
    },
    ConditionAdded {
        target: Id,
        description: String,
    },
    ConditionRemoved {
        target: Id,
        description: String,
    },
    SaveThrow {
        target: Id,
        success: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub event: EncounterEvent,
}

/// Ordered record of what happened during one encounter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EncounterLog {
    pub entries: Vec<LogEntry>,
}

impl EncounterLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: EncounterEvent) {
        self.record_at(Utc::now(), event);
    }

    /// Entries are kept in insertion order; callers replaying a log supply
    /// their own timestamps.
    pub fn record_at(&mut self, timestamp: DateTime<Utc>, event: EncounterEvent) {
        self.entries.push(LogEntry { timestamp, event });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn started(&self) -> Option<DateTime<Utc>> {
        self.entries
            .iter()
            .find(|e| e.event == EncounterEvent::StartEncounter)
            .or_else(|| self.entries.first())
            .map(|e| e.timestamp)
    }

    pub fn ended(&self) -> Option<DateTime<Utc>> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.event == EncounterEvent::EndEncounter)
            .or_else(|| self.entries.last())
            .map(|e| e.timestamp)
    }

    /// Highest round number started.
    pub fn rounds(&self) -> i32 {
        self.entries
            .iter()
            .filter_map(|e| match e.event {
                EncounterEvent::StartRound { round } => Some(round),
                _ => None,
            })
            .max()
            .unwrap_or(0)
    }
}
