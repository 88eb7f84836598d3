//! Armor class calculation.

use crate::aggregates::Character;
use crate::value_objects::{Ability, Armor, Equipment, EquipmentSlot, FeatureChoiceKind};

pub const UNARMORED_BASE: i32 = 10;

const BARBARIAN_UNARMORED_DEFENSE: &str = "barbarian-unarmored-defense";
const MONK_UNARMORED_DEFENSE: &str = "monk-unarmored-defense";

/// Armor class from the character's current attributes, equipment, and features.
///
/// Pure and unmemoized: call it again after anything changes.
pub fn calculate_armor_class(character: &Character) -> i32 {
    let dex = character.modifier(Ability::Dexterity);

    let body = character
        .equipped()
        .get(&EquipmentSlot::Body)
        .and_then(Equipment::as_armor)
        .filter(|a| !a.is_shield());
    let shield = character
        .equipped()
        .get(&EquipmentSlot::OffHand)
        .and_then(Equipment::as_armor)
        .filter(|a| a.is_shield());

    let base = match body {
        Some(armor) => armored_base(armor, dex),
        None => unarmored_base(character, dex, shield.is_some()),
    };

    let shield_bonus = shield.map(|s| s.armor_class.base).unwrap_or(0);

    let defense_style = if body.is_some() && has_defense_style(character) {
        1
    } else {
        0
    };

    base + shield_bonus + defense_style
}

fn armored_base(armor: &Armor, dex: i32) -> i32 {
    let formula = armor.armor_class;
    if !formula.dex_bonus {
        return formula.base;
    }
    let dex_bonus = match formula.max_bonus {
        Some(max) => dex.min(max),
        None => dex,
    };
    formula.base + dex_bonus
}

fn unarmored_base(character: &Character, dex: i32, has_shield: bool) -> i32 {
    if character.has_feature(BARBARIAN_UNARMORED_DEFENSE) {
        UNARMORED_BASE + dex + character.modifier(Ability::Constitution)
    } else if character.has_feature(MONK_UNARMORED_DEFENSE) && !has_shield {
        UNARMORED_BASE + dex + character.modifier(Ability::Wisdom)
    } else {
        UNARMORED_BASE + dex
    }
}

fn has_defense_style(character: &Character) -> bool {
    character
        .features()
        .iter()
        .filter(|f| f.choice_kind() == Some(FeatureChoiceKind::FightingStyle))
        .any(|f| f.recorded_choice() == Some("defense"))
}
