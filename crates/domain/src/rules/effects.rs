//! Passive feature effects.
//!
//! Some features change the sheet just by being present (extra hit points,
//! weapon training). Each such effect is registered under its feature key and
//! run once over the character's feature list at finalization.

use std::collections::HashMap;

use crate::aggregates::Character;
use crate::error::DomainError;
use crate::value_objects::{Proficiency, ProficiencyCategory};

/// An effect applied because a character has a given feature.
pub trait PassiveEffect: Send + Sync {
    /// Key of the feature that triggers this effect
    fn feature_key(&self) -> &'static str;

    fn apply(&self, character: &mut Character) -> Result<(), DomainError>;
}

/// A failed effect. Collected, never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectError {
    pub feature_key: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectsReport {
    pub applied: Vec<String>,
    pub errors: Vec<EffectError>,
}

pub struct PassiveEffectRegistry {
    effects: HashMap<&'static str, Box<dyn PassiveEffect>>,
}

impl PassiveEffectRegistry {
    pub fn empty() -> Self {
        Self {
            effects: HashMap::new(),
        }
    }

    pub fn register(&mut self, effect: Box<dyn PassiveEffect>) {
        self.effects.insert(effect.feature_key(), effect);
    }

    /// Run every registered effect whose feature the character has, in
    /// feature order. An effect that fails is reported and the rest still run.
    pub fn apply_all(&self, character: &mut Character) -> EffectsReport {
        let keys: Vec<String> = character.features().iter().map(|f| f.key.clone()).collect();

        let mut report = EffectsReport::default();
        for key in keys {
            let Some(effect) = self.effects.get(key.as_str()) else {
                continue;
            };
            match effect.apply(character) {
                Ok(()) => report.applied.push(key),
                Err(e) => report.errors.push(EffectError {
                    feature_key: key,
                    message: e.to_string(),
                }),
            }
        }
        report
    }
}

impl Default for PassiveEffectRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(DwarvenToughness));
        registry.register(Box::new(KeenSenses));
        registry.register(Box::new(WeaponTraining {
            feature_key: "dwarven-combat-training",
            weapons: &[
                ("battleaxes", "Battleaxes"),
                ("handaxes", "Handaxes"),
                ("light-hammers", "Light Hammers"),
                ("warhammers", "Warhammers"),
            ],
        }));
        registry.register(Box::new(WeaponTraining {
            feature_key: "elf-weapon-training",
            weapons: &[
                ("longswords", "Longswords"),
                ("shortswords", "Shortswords"),
                ("shortbows", "Shortbows"),
                ("longbows", "Longbows"),
            ],
        }));
        registry
    }
}

/// +1 max hit point per level.
struct DwarvenToughness;

impl PassiveEffect for DwarvenToughness {
    fn feature_key(&self) -> &'static str {
        "dwarven-toughness"
    }

    fn apply(&self, character: &mut Character) -> Result<(), DomainError> {
        if character.max_hit_points() <= 0 {
            return Err(DomainError::constraint(
                "no hit points to raise; the character has no class",
            ));
        }
        character.raise_max_hit_points(i32::from(character.level()));
        Ok(())
    }
}

/// Proficiency in Perception.
struct KeenSenses;

impl PassiveEffect for KeenSenses {
    fn feature_key(&self) -> &'static str {
        "keen-senses"
    }

    fn apply(&self, character: &mut Character) -> Result<(), DomainError> {
        character.grant_proficiencies([Proficiency::new(
            "skill-perception",
            "Skill: Perception",
            ProficiencyCategory::Skill,
        )]);
        Ok(())
    }
}

/// Proficiency with a fixed list of weapons.
struct WeaponTraining {
    feature_key: &'static str,
    weapons: &'static [(&'static str, &'static str)],
}

impl PassiveEffect for WeaponTraining {
    fn feature_key(&self) -> &'static str {
        self.feature_key
    }

    fn apply(&self, character: &mut Character) -> Result<(), DomainError> {
        character.grant_proficiencies(
            self.weapons
                .iter()
                .map(|(key, name)| Proficiency::new(*key, *name, ProficiencyCategory::Weapon)),
        );
        Ok(())
    }
}
