use chrono::{DateTime, Duration, TimeZone, Utc};
use encounter_engine::log::{EncounterEvent, EncounterLog};
use encounter_engine::report::{RosterEntry, Side};
use encounter_engine::{EncounterReport, Id};

struct Replay {
    log: EncounterLog,
    now: DateTime<Utc>,
}

impl Replay {
    fn new() -> Self {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 20, 0, 0).unwrap();
        let mut log = EncounterLog::new();
        log.record_at(now, EncounterEvent::StartEncounter);
        Self { log, now }
    }

    fn at(&mut self, seconds: i64, event: EncounterEvent) {
        self.now += Duration::seconds(seconds);
        self.log.record_at(self.now, event);
    }

    fn turn(&mut self, who: &str, seconds: i64, hits: &[(&str, i32)]) {
        self.at(0, EncounterEvent::StartTurn {
            combatant: Id::new(who),
        });
        for (target, amount) in hits {
            self.at(0, EncounterEvent::Damage {
                target: Id::new(*target),
                amount: *amount,
                types: Vec::new(),
            });
        }
        self.at(seconds, EncounterEvent::EndTurn {
            combatant: Id::new(who),
        });
    }
}

fn roster() -> Vec<RosterEntry> {
    vec![
        RosterEntry::pc("ana", "Ana"),
        RosterEntry::pc("bo", "Bo"),
        RosterEntry::pc("cy", "Cy"),
        RosterEntry::npc("orc", "Orc", Side::Opposition),
        RosterEntry::npc("crow", "Crow", Side::Neutral),
    ]
}

fn fight() -> EncounterLog {
    let mut r = Replay::new();
    r.at(0, EncounterEvent::StartRound { round: 1 });
    r.turn("ana", 30, &[("orc", 12)]);
    r.turn("bo", 60, &[("orc", 12), ("ana", 4)]);
    r.turn("cy", 45, &[("orc", 5), ("crow", 3)]);
    r.turn("orc", 20, &[("ana", 8)]);
    r.at(0, EncounterEvent::StartRound { round: 2 });
    r.turn("cy", 15, &[]);
    r.at(5, EncounterEvent::EndEncounter);
    r.log
}

#[test]
fn tables_attribute_damage_to_the_acting_combatant() {
    let report = EncounterReport::new(&fight(), &roster());
    assert_eq!(report.rounds, 2);
    assert_eq!(report.elapsed_seconds, 175.0);

    let value = |table: &encounter_engine::report::ReportTable, id: &str| {
        table
            .rows
            .iter()
            .find(|r| r.combatant.as_str() == id)
            .map(|r| r.value)
    };
    assert_eq!(value(&report.damage_to_enemies, "ana"), Some(12.0));
    assert_eq!(value(&report.damage_to_enemies, "bo"), Some(12.0));
    // neutral targets count for neither side
    assert_eq!(value(&report.damage_to_enemies, "cy"), Some(5.0));
    assert_eq!(value(&report.damage_to_allies, "bo"), Some(4.0));
    assert_eq!(value(&report.turn_time, "cy"), Some(30.0));
    // only player characters are ranked
    assert_eq!(value(&report.damage_to_enemies, "orc"), None);

    assert_eq!(report.damage_taken[&Id::new("orc")], 29);
    assert_eq!(report.damage_taken[&Id::new("ana")], 12);
}

#[test]
fn tied_damage_shares_the_top_score() {
    let report = EncounterReport::new(&fight(), &roster());
    let points = report.damage_to_enemies.points();
    assert_eq!(points[&Id::new("ana")], 25);
    assert_eq!(points[&Id::new("bo")], 25);
    assert_eq!(points[&Id::new("cy")], 18);
}

#[test]
fn mvp_sums_all_tables() {
    let report = EncounterReport::new(&fight(), &roster());
    // ana: fastest (30s, 25) + top damage (25) + no friendly fire (25)
    // bo: slowest (18) + top damage (25) + friendly fire (18)
    // cy: 30s mean ties ana (25) + 18 + 25
    let totals = report.mvp_points();
    assert_eq!(totals[&Id::new("ana")], 75);
    assert_eq!(totals[&Id::new("bo")], 61);
    assert_eq!(totals[&Id::new("cy")], 68);
    assert_eq!(report.mvps(), vec![Id::new("ana")]);
}

#[test]
fn tied_totals_produce_several_mvps() {
    let mut r = Replay::new();
    r.at(0, EncounterEvent::StartRound { round: 1 });
    r.turn("ana", 10, &[("orc", 6)]);
    r.turn("bo", 10, &[("orc", 6)]);
    let full = roster();
    let roster = [full[0].clone(), full[1].clone(), full[3].clone()];
    let report = EncounterReport::new(&r.log, &roster);
    assert_eq!(report.mvps(), vec![Id::new("ana"), Id::new("bo")]);
}

#[test]
fn empty_log_has_no_mvp() {
    let report = EncounterReport::new(&EncounterLog::new(), &[]);
    assert!(report.mvps().is_empty());
    assert_eq!(report.rounds, 0);
}

#[test]
fn ongoing_damage_on_own_turn_is_not_friendly_fire() {
    let mut r = Replay::new();
    r.at(0, EncounterEvent::StartRound { round: 1 });
    r.turn("ana", 30, &[("ana", 5), ("orc", 10)]);
    r.turn("bo", 30, &[("orc", 10)]);
    let full = roster();
    let roster = [full[0].clone(), full[1].clone(), full[3].clone()];
    let report = EncounterReport::new(&r.log, &roster);

    let allies: Vec<f64> = report.damage_to_allies.rows.iter().map(|r| r.value).collect();
    assert_eq!(allies, [0.0, 0.0]);
    assert_eq!(report.damage_taken[&Id::new("ana")], 5);
    assert_eq!(report.mvps(), vec![Id::new("ana"), Id::new("bo")]);
}
