use encounter_engine::conditions::{OngoingKind, Regeneration};
use encounter_engine::creature::LiteralStats;
use encounter_engine::template::{PowerCategory, ThemePower};
use encounter_engine::{
    Ability, CampaignSettings, CardCategory, CombatData, Creature, CreatureKind, CreaturePower,
    CreatureTemplate, Defence, DamageModifier, DamageModifierTemplate, DamageType, EncounterCard,
    EngineError, Id, Library, Modifier, MonsterTheme, OngoingCondition, PowerAttack, Role,
    RoleFlag, RoleType, TemplateKind,
};

fn power(id: &str, bonus: Option<i32>, defence: Defence, details: &str) -> CreaturePower {
    CreaturePower {
        id: Id::new(id),
        name: id.to_string(),
        action: "Standard".into(),
        keywords: String::new(),
        range: "Melee 1".into(),
        attack: bonus.map(|bonus| PowerAttack { bonus, defence }),
        details: details.into(),
        description: String::new(),
    }
}

fn soldier(id: &str, flag: RoleFlag, hp: i32) -> Creature {
    let mut c = Creature::new(
        id,
        "Soldier",
        5,
        Role::with_flag(RoleType::Soldier, flag),
        CreatureKind::Library(LiteralStats {
            hp,
            ac: 21,
            fortitude: 18,
            reflex: 16,
            will: 17,
            initiative: 5,
            perception: 4,
        }),
    );
    c.abilities.strength = Ability::new(18);
    c.abilities.constitution = Ability::new(16);
    c.abilities.dexterity = Ability::new(14);
    c.skills.insert("Athletics".into(), 11);
    c.skills.insert("Perception".into(), 4);
    c.powers.push(power("guard-spear", Some(12), Defence::Ac, "1d10 + 5 damage."));
    c.damage_modifiers.push(DamageModifier::resist(DamageType::Fire, 5));
    c.senses.push("darkvision".into());
    c.movement.push("speed 5".into());
    c
}

fn fixture() -> Library {
    let mut lib = Library::new();
    lib.add_creature(soldier("soldier", RoleFlag::Standard, 63));
    lib.add_creature(soldier("elite-soldier", RoleFlag::Elite, 126));
    lib.add_creature(Creature::new(
        "minion",
        "Spear Minion",
        5,
        Role::Minion,
        CreatureKind::Library(LiteralStats {
            hp: 1,
            ac: 19,
            ..Default::default()
        }),
    ));

    let mut a = CreatureTemplate::new("elite-a", "Elite A", RoleFlag::Elite);
    a.hp_per_level = 8;
    a.ac = 2;
    a.initiative = 2;
    a.powers.push(power("a-strike", Some(5), Defence::Fortitude, "2d6 damage."));
    a.senses.push("  ".into());
    a.senses.push("tremorsense 5".into());
    lib.add_template(a);

    let mut b = CreatureTemplate::new("elite-b", "Elite B", RoleFlag::Elite);
    b.kind = TemplateKind::Class;
    b.hp_per_level = 10;
    b.fortitude = 2;
    b.powers.push(power("b-strike", Some(9), Defence::Will, "1d8 damage."));
    lib.add_template(b);

    let mut fire = CreatureTemplate::new("fire-t", "Fire-Touched", RoleFlag::Standard);
    fire.damage_modifiers.push(DamageModifierTemplate {
        damage_type: DamageType::Fire,
        heroic: -5,
        paragon: -10,
        epic: -15,
    });
    fire.damage_modifiers.push(DamageModifierTemplate {
        damage_type: DamageType::Cold,
        heroic: 5,
        paragon: 10,
        epic: 15,
    });
    lib.add_template(fire);

    let mut kindling = CreatureTemplate::new("kindling", "Kindling", RoleFlag::Standard);
    kindling.damage_modifiers.push(DamageModifierTemplate {
        damage_type: DamageType::Fire,
        heroic: 5,
        paragon: 5,
        epic: 5,
    });
    lib.add_template(kindling);

    let mut leader = CreatureTemplate::new("leader-t", "Captain", RoleFlag::Standard);
    leader.leader = true;
    lib.add_template(leader);

    let mut drill = MonsterTheme {
        id: Id::new("drill"),
        name: "Drill Company".into(),
        powers: Vec::new(),
        skill_bonuses: Default::default(),
    };
    drill.skill_bonuses.insert("Athletics".into(), 1);
    drill.skill_bonuses.insert("Stealth".into(), 2);
    drill.skill_bonuses.insert("Perception".into(), 2);
    drill.powers.push(ThemePower {
        category: PowerCategory::Attack,
        roles: vec![RoleType::Soldier],
        power: power("drill-lunge", Some(7), Defence::Reflex, "1d6 + 2 damage."),
    });
    drill.powers.push(ThemePower {
        category: PowerCategory::Utility,
        roles: Vec::new(),
        power: power("drill-brace", None, Defence::Ac, "Gain 5 temporary hit points."),
    });
    lib.add_theme(drill);
    lib
}

#[test]
fn plain_card_reproduces_creature() {
    let lib = fixture();
    let card = EncounterCard::new("soldier");
    assert_eq!(card.title(&lib), "Soldier");
    assert_eq!(card.level(&lib), 5);
    assert_eq!(card.hp(&lib), 63);
    assert_eq!(card.defence(&lib, Defence::Ac, None), 21);
    assert_eq!(card.defence(&lib, Defence::Fortitude, None), 18);
    assert_eq!(card.defence(&lib, Defence::Reflex, None), 16);
    assert_eq!(card.defence(&lib, Defence::Will, None), 17);
    assert_eq!(card.initiative(&lib), 5);
    assert_eq!(card.perception(&lib), 4);
    assert_eq!(card.skills(&lib).get("Athletics"), Some(&11));
    assert_eq!(card.powers(&lib)[0].attack.map(|a| a.bonus), Some(12));
    assert_eq!(card.powers(&lib)[0].details, "1d10 + 5 damage.");
    assert_eq!(card.flag(&lib), RoleFlag::Standard);
}

#[test]
fn templates_escalate_the_flag() {
    let lib = fixture();
    let one = EncounterCard::new("soldier").with_template("elite-a");
    assert_eq!(one.flag(&lib), RoleFlag::Elite);
    let two = one.clone().with_template("elite-b");
    assert_eq!(two.flag(&lib), RoleFlag::Solo);
    let elite = EncounterCard::new("elite-soldier").with_template("elite-a");
    assert_eq!(elite.flag(&lib), RoleFlag::Solo);
    let minion = EncounterCard::new("minion").with_template("elite-a");
    assert_eq!(minion.role(&lib), Some(Role::Minion));
}

#[test]
fn template_hp_uses_best_rate_and_doubles_for_new_solo() {
    let lib = fixture();
    let one = EncounterCard::new("soldier").with_template("elite-a");
    assert_eq!(one.hp(&lib), 63 + 8 * 5 + 16);

    let two = one.with_template("elite-b");
    assert_eq!(two.hp(&lib), (63 + 10 * 5 + 16) * 2);

    let elite = EncounterCard::new("elite-soldier").with_template("elite-a");
    assert_eq!(elite.hp(&lib), (126 + 8 * 5 + 16) * 2);
}

#[test]
fn level_adjustment_hp_scales_with_flag() {
    let lib = fixture();
    let base = EncounterCard::new("soldier");
    let adjusted = base.clone().with_level_adjustment(1);
    assert_eq!(adjusted.hp(&lib) - base.hp(&lib), 8);

    let elite = EncounterCard::new("elite-soldier");
    let elite_adjusted = elite.clone().with_level_adjustment(1);
    assert_eq!(elite_adjusted.hp(&lib) - elite.hp(&lib), 16);
}

#[test]
fn campaign_hp_multiplier_skips_minions() {
    let lib = fixture().with_settings(CampaignSettings {
        hp: 1.5,
        ..Default::default()
    });
    assert_eq!(EncounterCard::new("soldier").hp(&lib), 94);
    assert_eq!(EncounterCard::new("minion").hp(&lib), 1);
    assert_eq!(
        EncounterCard::new("minion")
            .with_template("elite-a")
            .with_level_adjustment(3)
            .hp(&lib),
        1
    );
}

#[test]
fn defences_add_templates_adjustment_and_campaign() {
    let lib = fixture().with_settings(CampaignSettings {
        ac_bonus: 1,
        nad_bonus: 2,
        ..Default::default()
    });
    let card = EncounterCard::new("soldier")
        .with_template("elite-a")
        .with_level_adjustment(2);
    assert_eq!(card.defence(&lib, Defence::Ac, None), 21 + 2 + 2 + 1);
    assert_eq!(card.defence(&lib, Defence::Fortitude, None), 18 + 2 + 2);
    assert_eq!(card.defence(&lib, Defence::Reflex, None), 16 + 2 + 2);
}

#[test]
fn initiative_gets_half_the_adjustment() {
    let lib = fixture();
    let up = EncounterCard::new("soldier")
        .with_template("elite-a")
        .with_level_adjustment(3);
    assert_eq!(up.initiative(&lib), 5 + 2 + 1);
    let down = EncounterCard::new("soldier").with_level_adjustment(-3);
    assert_eq!(down.initiative(&lib), 5 - 1);
}

#[test]
fn skills_rederive_for_effective_level() {
    let lib = fixture();
    let card = EncounterCard::new("soldier").with_level_adjustment(2);
    let skills = card.skills(&lib);
    assert_eq!(skills.get("Athletics"), Some(&12));
    assert!(!skills.contains_key("Perception"));
    assert_eq!(card.perception(&lib), 5);
}

#[test]
fn theme_adds_skills_and_selected_powers() {
    let lib = fixture();
    let card = EncounterCard::new("soldier").with_theme(
        "drill",
        Some(Id::new("drill-lunge")),
        Some(Id::new("drill-brace")),
    );
    let skills = card.skills(&lib);
    assert_eq!(skills.get("Athletics"), Some(&12));
    // Dex 14 (+2) + half level 2 + theme 2
    assert_eq!(skills.get("Stealth"), Some(&6));
    assert_eq!(card.perception(&lib), 6);

    let names: Vec<String> = card.powers(&lib).into_iter().map(|p| p.id.to_string()).collect();
    assert_eq!(names, ["guard-spear", "drill-lunge", "drill-brace"]);

    let unselected = EncounterCard::new("soldier").with_theme("drill", None, Some(Id::new("nope")));
    assert_eq!(unselected.powers(&lib).len(), 1);
}

#[test]
fn powers_follow_level_adjustment() {
    let lib = fixture().with_settings(CampaignSettings {
        attack_bonus: 1,
        ..Default::default()
    });
    let card = EncounterCard::new("soldier")
        .with_template("elite-a")
        .with_template("elite-b")
        .with_level_adjustment(2);
    let powers = card.powers(&lib);
    let bonus = |id: &str| {
        powers
            .iter()
            .find(|p| p.id.as_str() == id)
            .and_then(|p| p.attack)
            .map(|a| a.bonus)
    };
    assert_eq!(bonus("guard-spear"), Some(12 + 2 + 1));
    // functional template: relative to effective level 7
    assert_eq!(bonus("a-strike"), Some(5 + 7 + 2 + 1));
    assert_eq!(bonus("b-strike"), Some(9 + 2 + 1));
    assert_eq!(powers[0].details, "1d10 + 6 damage.");
    assert_eq!(powers[1].details, "2d6 + 1 damage.");
}

#[test]
fn template_damage_modifiers_merge() {
    let lib = fixture();
    let card = EncounterCard::new("soldier").with_template("fire-t");
    assert_eq!(
        card.damage_modifier(&lib, &[DamageType::Fire], None),
        Some(Modifier::Resist(10))
    );
    assert_eq!(
        card.damage_modifier(&lib, &[DamageType::Cold], None),
        Some(Modifier::Vulnerable(5))
    );
    assert_eq!(
        card.damage_modifier(&lib, &[DamageType::Fire, DamageType::Cold], None),
        None
    );

    // tier comes from the creature's own level
    let raised = card.clone().with_level_adjustment(6);
    assert_eq!(
        raised.damage_modifier(&lib, &[DamageType::Fire], None),
        Some(Modifier::Resist(10))
    );

    let cancelled = EncounterCard::new("soldier").with_template("kindling");
    assert!(cancelled.damage_modifiers(&lib, None).is_empty());
}

#[test]
fn live_conditions_feed_defences_and_modifiers() {
    let lib = fixture();
    let card = EncounterCard::new("soldier");
    let mut data = CombatData::new("soldier-1", "Soldier 1");
    data.conditions.push(OngoingCondition::new(OngoingKind::DefenceModifier {
        delta: -2,
        defences: vec![Defence::Ac],
    }));
    data.conditions.push(OngoingCondition::new(OngoingKind::DefenceModifier {
        delta: 1,
        defences: Vec::new(),
    }));
    data.conditions.push(OngoingCondition::new(OngoingKind::DamageModifier(
        DamageModifier::vulnerable(DamageType::Fire, 5),
    )));
    assert_eq!(card.defence(&lib, Defence::Ac, Some(&data)), 20);
    assert_eq!(card.defence(&lib, Defence::Will, Some(&data)), 18);
    assert_eq!(card.damage_modifier(&lib, &[DamageType::Fire], Some(&data)), None);
    assert_eq!(
        card.damage_modifier(&lib, &[DamageType::Fire], None),
        Some(Modifier::Resist(5))
    );
}

#[test]
fn start_turn_applies_resisted_ongoing_damage_then_regeneration() {
    let lib = fixture();
    let card = EncounterCard::new("soldier");
    let mut data = CombatData::new("soldier-1", "Soldier 1");
    data.damage = 10;
    data.conditions.push(OngoingCondition::new(OngoingKind::Damage {
        value: 5,
        damage_type: Some(DamageType::Fire),
    }));
    data.conditions.push(OngoingCondition::new(OngoingKind::Damage {
        value: 3,
        damage_type: None,
    }));
    data.conditions.push(OngoingCondition::new(OngoingKind::Regeneration(Regeneration {
        value: 4,
        details: String::new(),
    })));
    let mut logs = Vec::new();
    let (taken, regenerated) = card.start_turn(&lib, &mut data, |m| logs.push(m));
    assert_eq!((taken, regenerated), (3, 4));
    assert_eq!(data.damage, 9);
    assert!(logs.iter().any(|l| l.starts_with("[HEAL][Soldier 1]")));
}

#[test]
fn text_lists_concatenate_and_skip_blanks() {
    let lib = fixture();
    let card = EncounterCard::new("soldier").with_template("elite-a");
    assert_eq!(card.senses(&lib), ["darkvision", "tremorsense 5"]);
    assert_eq!(card.movement(&lib), ["speed 5"]);
}

#[test]
fn lookup_misses_degrade() {
    let lib = fixture();
    let missing = EncounterCard::new("nobody");
    assert_eq!(missing.title(&lib), "(unknown creature)");
    assert_eq!(missing.hp(&lib), 0);
    assert_eq!(missing.xp(&lib), 0);
    assert!(missing.powers(&lib).is_empty());
    assert!(matches!(
        missing.category(&lib),
        Err(EngineError::Unclassifiable { .. })
    ));

    let ghost = EncounterCard::new("soldier")
        .with_template("ghost")
        .with_template("elite-a");
    assert_eq!(ghost.title(&lib), "Soldier (Elite A)");
    assert_eq!(ghost.flag(&lib), RoleFlag::Elite);
}

#[test]
fn categories() {
    let lib = fixture();
    let category = |card: EncounterCard| card.category(&lib).unwrap();
    assert_eq!(category(EncounterCard::new("minion")), CardCategory::Minion);
    assert_eq!(category(EncounterCard::new("soldier")), CardCategory::Soldier);
    assert_eq!(
        category(EncounterCard::new("soldier").with_template("leader-t")),
        CardCategory::Leader
    );
    assert_eq!(
        category(EncounterCard::new("elite-soldier").with_template("elite-a")),
        CardCategory::Solo
    );
}

#[test]
fn xp_and_difficulty_use_effective_values() {
    let lib = fixture();
    let card = EncounterCard::new("soldier").with_template("elite-a");
    assert_eq!(card.xp(&lib), 200 * 2);
    assert_eq!(card.difficulty(&lib, 3), encounter_engine::Difficulty::Moderate);
    let minion = EncounterCard::new("minion").with_level_adjustment(5);
    // level 10 minion: 500 / 4
    assert_eq!(minion.xp(&lib), 125);
}
