use crate::Dice;
use crate::conditions::OngoingCondition;

/// A saving throw succeeds on 10 or higher.
pub const SAVE_TARGET: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveResult {
    pub roll: i32,
    pub total: i32,
    pub passed: bool,
}

/// Roll a d20, add modifier, succeed on 10+.
pub fn roll_saving_throw(dice: &mut Dice, modifier: i32) -> SaveResult {
    let roll = dice.d20() as i32;
    let total = roll + modifier;
    SaveResult {
        roll,
        total,
        passed: total >= SAVE_TARGET,
    }
}

/// Save against `condition`, adding its own saving-throw modifier to `bonus`.
pub fn save_against(dice: &mut Dice, condition: &OngoingCondition, bonus: i32) -> SaveResult {
    roll_saving_throw(dice, bonus + condition.saving_throw_modifier.unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::OngoingKind;

    #[test]
    fn ten_succeeds_nine_fails() {
        let mut dice = Dice::from_scripted(vec![10, 9]);
        assert!(roll_saving_throw(&mut dice, 0).passed);
        assert!(!roll_saving_throw(&mut dice, 0).passed);
    }

    #[test]
    fn condition_modifier_applies() {
        let cond = OngoingCondition::save_ends(
            OngoingKind::Condition {
                text: "Slowed".into(),
            },
            Some(-2),
        );
        let mut dice = Dice::from_scripted(vec![11]);
        let res = save_against(&mut dice, &cond, 0);
        assert_eq!(res.total, 9);
        assert!(!res.passed);
    }
}
