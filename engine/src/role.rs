use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleType {
    Artillery,
    Brute,
    Controller,
    Lurker,
    Skirmisher,
    Soldier,
}

impl RoleType {
    /// Hit points gained per level for this role.
    pub fn hp_per_level(self) -> i32 {
        match self {
            RoleType::Artillery | RoleType::Lurker => 6,
            RoleType::Controller | RoleType::Skirmisher | RoleType::Soldier => 8,
            RoleType::Brute => 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleFlag {
    #[default]
    Standard,
    Elite,
    Solo,
}

impl RoleFlag {
    /// Escalation steps this flag contributes: Standard 0, Elite 1, Solo 2.
    pub fn steps(self) -> u32 {
        match self {
            RoleFlag::Standard => 0,
            RoleFlag::Elite => 1,
            RoleFlag::Solo => 2,
        }
    }

    pub fn from_steps(steps: u32) -> Self {
        match steps {
            0 => RoleFlag::Standard,
            1 => RoleFlag::Elite,
            _ => RoleFlag::Solo,
        }
    }

    /// Threat multiplier used for XP and level-adjusted HP.
    pub fn xp_factor(self) -> i32 {
        match self {
            RoleFlag::Standard => 1,
            RoleFlag::Elite => 2,
            RoleFlag::Solo => 5,
        }
    }
}

/// A creature's role. Minions carry no flag or leader semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Role {
    Minion,
    Complex {
        #[serde(rename = "type")]
        role_type: RoleType,
        #[serde(default)]
        flag: RoleFlag,
        #[serde(default)]
        leader: bool,
    },
}

impl Role {
    pub fn standard(role_type: RoleType) -> Self {
        Role::Complex {
            role_type,
            flag: RoleFlag::Standard,
            leader: false,
        }
    }

    pub fn with_flag(role_type: RoleType, flag: RoleFlag) -> Self {
        Role::Complex {
            role_type,
            flag,
            leader: false,
        }
    }

    pub fn is_minion(&self) -> bool {
        matches!(self, Role::Minion)
    }

    pub fn role_type(&self) -> Option<RoleType> {
        match self {
            Role::Minion => None,
            Role::Complex { role_type, .. } => Some(*role_type),
        }
    }

    /// Standard for minions, which are never escalated.
    pub fn flag(&self) -> RoleFlag {
        match self {
            Role::Minion => RoleFlag::Standard,
            Role::Complex { flag, .. } => *flag,
        }
    }

    pub fn is_leader(&self) -> bool {
        matches!(self, Role::Complex { leader: true, .. })
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::standard(RoleType::Soldier)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Minion => write!(f, "Minion"),
            Role::Complex {
                role_type,
                flag,
                leader,
            } => {
                match flag {
                    RoleFlag::Standard => write!(f, "{role_type:?}")?,
                    _ => write!(f, "{flag:?} {role_type:?}")?,
                }
                if *leader {
                    write!(f, " (Leader)")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_round_trip_and_saturate() {
        assert_eq!(RoleFlag::from_steps(RoleFlag::Elite.steps()), RoleFlag::Elite);
        assert_eq!(RoleFlag::from_steps(4), RoleFlag::Solo);
    }

    #[test]
    fn minion_has_no_flag_semantics() {
        assert_eq!(Role::Minion.flag(), RoleFlag::Standard);
        assert!(!Role::Minion.is_leader());
        assert_eq!(Role::Minion.role_type(), None);
    }

    #[test]
    fn display() {
        let role = Role::Complex {
            role_type: RoleType::Soldier,
            flag: RoleFlag::Elite,
            leader: true,
        };
        assert_eq!(role.to_string(), "Elite Soldier (Leader)");
        assert_eq!(Role::standard(RoleType::Brute).to_string(), "Brute");
    }
}
