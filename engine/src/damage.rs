//! Damage types and resist / vulnerable / immune modifiers.
//!
//! Authored data keeps the signed encoding (`0` immune, negative resist,
//! positive vulnerable); in memory it is the typed [`Modifier`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    Acid,
    Cold,
    Fire,
    Force,
    Lightning,
    Necrotic,
    Poison,
    Psychic,
    Radiant,
    Thunder,
}

impl DamageType {
    pub const ALL: [DamageType; 10] = [
        DamageType::Acid,
        DamageType::Cold,
        DamageType::Fire,
        DamageType::Force,
        DamageType::Lightning,
        DamageType::Necrotic,
        DamageType::Poison,
        DamageType::Psychic,
        DamageType::Radiant,
        DamageType::Thunder,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DamageType::Acid => "acid",
            DamageType::Cold => "cold",
            DamageType::Fire => "fire",
            DamageType::Force => "force",
            DamageType::Lightning => "lightning",
            DamageType::Necrotic => "necrotic",
            DamageType::Poison => "poison",
            DamageType::Psychic => "psychic",
            DamageType::Radiant => "radiant",
            DamageType::Thunder => "thunder",
        }
    }
}

impl fmt::Display for DamageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DamageType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        DamageType::ALL
            .into_iter()
            .find(|t| t.name() == lowered)
            .ok_or_else(|| EngineError::UnknownDamageType(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Immune,
    Resist(i32),
    Vulnerable(i32),
}

impl Modifier {
    /// Decode the signed form: `0` immune, `< 0` resist, `> 0` vulnerable.
    pub fn from_value(value: i32) -> Self {
        match value {
            0 => Modifier::Immune,
            v if v < 0 => Modifier::Resist(-v),
            v => Modifier::Vulnerable(v),
        }
    }

    pub fn value(self) -> i32 {
        match self {
            Modifier::Immune => 0,
            Modifier::Resist(n) => -n,
            Modifier::Vulnerable(n) => n,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SignedModifier", into = "SignedModifier")]
pub struct DamageModifier {
    pub damage_type: DamageType,
    pub modifier: Modifier,
}

#[derive(Serialize, Deserialize)]
struct SignedModifier {
    #[serde(rename = "type")]
    damage_type: DamageType,
    value: i32,
}

impl From<SignedModifier> for DamageModifier {
    fn from(raw: SignedModifier) -> Self {
        DamageModifier::new(raw.damage_type, Modifier::from_value(raw.value))
    }
}

impl From<DamageModifier> for SignedModifier {
    fn from(m: DamageModifier) -> Self {
        SignedModifier {
            damage_type: m.damage_type,
            value: m.modifier.value(),
        }
    }
}

impl DamageModifier {
    pub fn new(damage_type: DamageType, modifier: Modifier) -> Self {
        Self {
            damage_type,
            modifier,
        }
    }

    pub fn immune(damage_type: DamageType) -> Self {
        Self::new(damage_type, Modifier::Immune)
    }

    pub fn resist(damage_type: DamageType, amount: i32) -> Self {
        Self::new(damage_type, Modifier::Resist(amount))
    }

    pub fn vulnerable(damage_type: DamageType, amount: i32) -> Self {
        Self::new(damage_type, Modifier::Vulnerable(amount))
    }
}

impl fmt::Display for DamageModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.modifier {
            Modifier::Immune => write!(f, "Immune to {}", self.damage_type),
            Modifier::Resist(n) => write!(f, "Resist {} {}", n, self.damage_type),
            Modifier::Vulnerable(n) => write!(f, "Vulnerable {} {}", n, self.damage_type),
        }
    }
}

/// A template's damage modifier, with one signed value per tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageModifierTemplate {
    #[serde(rename = "type")]
    pub damage_type: DamageType,
    pub heroic: i32,
    pub paragon: i32,
    pub epic: i32,
}

impl DamageModifierTemplate {
    /// Tier by level: below 10 heroic, below 20 paragon, epic otherwise.
    pub fn value_at(&self, level: i32) -> i32 {
        if level < 10 {
            self.heroic
        } else if level < 20 {
            self.paragon
        } else {
            self.epic
        }
    }

    pub fn modifier_at(&self, level: i32) -> DamageModifier {
        DamageModifier::new(self.damage_type, Modifier::from_value(self.value_at(level)))
    }
}

/// Fold `incoming` into `mods`.
///
/// Immunity already present is absorbing. Otherwise the signed values add up,
/// and a sum of exactly zero removes the entry.
pub fn merge_modifier(mods: &mut Vec<DamageModifier>, incoming: DamageModifier) {
    let Some(idx) = mods
        .iter()
        .position(|m| m.damage_type == incoming.damage_type)
    else {
        mods.push(incoming);
        return;
    };
    if mods[idx].modifier == Modifier::Immune {
        return;
    }
    let sum = mods[idx].modifier.value() + incoming.modifier.value();
    if sum == 0 {
        mods.remove(idx);
    } else {
        mods[idx].modifier = Modifier::from_value(sum);
    }
}

pub fn modifier_for(mods: &[DamageModifier], damage_type: DamageType) -> Option<Modifier> {
    mods.iter()
        .find(|m| m.damage_type == damage_type)
        .map(|m| m.modifier)
}

/// Net modifier against damage of several types at once.
///
/// Immune only if immune to every type; resistant to all gives the weakest
/// resistance; vulnerable to all gives the smallest vulnerability; anything
/// mixed (or an empty list) has no effect.
pub fn combined_modifier(mods: &[DamageModifier], types: &[DamageType]) -> Option<Modifier> {
    if types.is_empty() {
        return None;
    }
    let found: Vec<Modifier> = types
        .iter()
        .map(|t| modifier_for(mods, *t))
        .collect::<Option<_>>()?;

    if found.iter().all(|m| *m == Modifier::Immune) {
        return Some(Modifier::Immune);
    }
    let resists: Vec<i32> = found
        .iter()
        .filter_map(|m| match m {
            Modifier::Resist(n) => Some(*n),
            _ => None,
        })
        .collect();
    if resists.len() == found.len() {
        return resists.into_iter().min().map(Modifier::Resist);
    }
    let vulns: Vec<i32> = found
        .iter()
        .filter_map(|m| match m {
            Modifier::Vulnerable(n) => Some(*n),
            _ => None,
        })
        .collect();
    if vulns.len() == found.len() {
        return vulns.into_iter().min().map(Modifier::Vulnerable);
    }
    None
}

/// Apply a net modifier to a damage amount.
pub fn adjust_damage(amount: i32, modifier: Option<Modifier>) -> i32 {
    match modifier {
        None => amount,
        Some(Modifier::Immune) => 0,
        Some(Modifier::Resist(n)) => (amount - n).max(0),
        Some(Modifier::Vulnerable(n)) => amount + n,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_encoding_round_trips() {
        for v in [-10, -1, 0, 1, 7] {
            assert_eq!(Modifier::from_value(v).value(), v);
        }
        assert_eq!(Modifier::from_value(-5), Modifier::Resist(5));
    }

    #[test]
    fn serde_uses_signed_value() {
        let m = DamageModifier::resist(DamageType::Fire, 5);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"{"type":"fire","value":-5}"#);
        let back: DamageModifier = serde_json::from_str(r#"{"type":"cold","value":0}"#).unwrap();
        assert_eq!(back, DamageModifier::immune(DamageType::Cold));
    }

    #[test]
    fn opposite_values_cancel() {
        let mut mods = vec![DamageModifier::resist(DamageType::Fire, 5)];
        merge_modifier(&mut mods, DamageModifier::vulnerable(DamageType::Fire, 5));
        assert!(mods.is_empty());
    }

    #[test]
    fn immunity_is_absorbing() {
        let mut mods = vec![DamageModifier::immune(DamageType::Poison)];
        merge_modifier(&mut mods, DamageModifier::vulnerable(DamageType::Poison, 10));
        assert_eq!(mods, vec![DamageModifier::immune(DamageType::Poison)]);
    }

    #[test]
    fn tiers() {
        let t = DamageModifierTemplate {
            damage_type: DamageType::Necrotic,
            heroic: -5,
            paragon: -10,
            epic: -15,
        };
        assert_eq!(t.value_at(9), -5);
        assert_eq!(t.value_at(10), -10);
        assert_eq!(t.value_at(19), -10);
        assert_eq!(t.value_at(20), -15);
    }

    #[test]
    fn adjusting_damage() {
        assert_eq!(adjust_damage(12, Some(Modifier::Resist(5))), 7);
        assert_eq!(adjust_damage(3, Some(Modifier::Resist(5))), 0);
        assert_eq!(adjust_damage(3, Some(Modifier::Vulnerable(5))), 8);
        assert_eq!(adjust_damage(3, Some(Modifier::Immune)), 0);
    }

    #[test]
    fn parse_names() {
        assert_eq!("Fire".parse::<DamageType>().unwrap(), DamageType::Fire);
        assert!("bludgeoning".parse::<DamageType>().is_err());
    }
}
