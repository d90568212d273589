use serde::{Deserialize, Serialize};

use crate::conditions::OngoingCondition;
use crate::{Dice, Id};

/// Live state of one combatant instance during an encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatData {
    pub id: Id,
    pub display_name: String,
    #[serde(default)]
    pub damage: i32,
    #[serde(default)]
    pub temp_hp: i32,
    /// Rolled initiative; `None` until rolled.
    #[serde(default)]
    pub initiative: Option<i32>,
    #[serde(default)]
    pub conditions: Vec<OngoingCondition>,
    #[serde(default)]
    pub used_powers: Vec<Id>,
    #[serde(default)]
    pub delaying: bool,
}

impl CombatData {
    pub fn new(id: impl Into<Id>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            damage: 0,
            temp_hp: 0,
            initiative: None,
            conditions: Vec::new(),
            used_powers: Vec::new(),
            delaying: false,
        }
    }

    pub fn remaining_hp(&self, max_hp: i32) -> i32 {
        max_hp - self.damage
    }

    pub fn is_bloodied(&self, max_hp: i32) -> bool {
        let remaining = self.remaining_hp(max_hp);
        remaining > 0 && remaining <= max_hp / 2
    }

    pub fn is_defeated(&self, max_hp: i32) -> bool {
        self.remaining_hp(max_hp) <= 0
    }

    /// Apply damage, draining temporary hit points first. Returns damage taken past temp HP.
    pub fn take_damage(&mut self, amount: i32, mut log: impl FnMut(String)) -> i32 {
        if amount <= 0 {
            return 0;
        }
        let absorbed = amount.min(self.temp_hp);
        self.temp_hp -= absorbed;
        let taken = amount - absorbed;
        let before = self.damage;
        self.damage += taken;
        if absorbed > 0 {
            log(format!(
                "[DMG][{}] {} (temp HP absorbs {}), damage {} → {}",
                self.display_name, amount, absorbed, before, self.damage
            ));
        } else {
            log(format!(
                "[DMG][{}] {}, damage {} → {}",
                self.display_name, amount, before, self.damage
            ));
        }
        taken
    }

    /// Heal; damage never drops below zero. Returns HP actually restored.
    pub fn heal(&mut self, amount: i32, mut log: impl FnMut(String)) -> i32 {
        if amount <= 0 || self.damage == 0 {
            return 0;
        }
        let healed = amount.min(self.damage);
        self.damage -= healed;
        log(format!(
            "[HEAL][{}] +{} (damage now {})",
            self.display_name, healed, self.damage
        ));
        healed
    }

    /// Temporary hit points do not stack; the higher value is kept.
    pub fn gain_temp_hp(&mut self, amount: i32) {
        self.temp_hp = self.temp_hp.max(amount);
    }

    pub fn roll_initiative(&mut self, dice: &mut Dice, bonus: i32) -> i32 {
        let total = dice.d20() as i32 + bonus;
        self.initiative = Some(total);
        total
    }

    pub fn use_power(&mut self, power: &Id) {
        if !self.has_used(power) {
            self.used_powers.push(power.clone());
        }
    }

    pub fn has_used(&self, power: &Id) -> bool {
        self.used_powers.contains(power)
    }

    /// Clear everything that only lasts for one encounter.
    pub fn reset(&mut self) {
        self.damage = 0;
        self.temp_hp = 0;
        self.initiative = None;
        self.conditions.clear();
        self.used_powers.clear();
        self.delaying = false;
    }
}
