//! Proficiency value objects.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Classification of a trained capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProficiencyCategory {
    Armor,
    Weapon,
    SavingThrow,
    Skill,
    Tool,
    Unclassified,
}

impl ProficiencyCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Armor => "armor",
            Self::Weapon => "weapon",
            Self::SavingThrow => "saving_throw",
            Self::Skill => "skill",
            Self::Tool => "tool",
            Self::Unclassified => "unclassified",
        }
    }

    /// Best-effort category for a rules-catalog proficiency key.
    ///
    /// Catalog keys follow a loose naming scheme ("skill-athletics",
    /// "saving-throw-str", "light-armor", "martial-weapons", "thieves-tools").
    /// Keys that fit none of the patterns are `Unclassified`.
    pub fn infer_from_key(key: &str) -> Self {
        let key = key.to_lowercase();
        if key.starts_with("skill-") {
            Self::Skill
        } else if key.starts_with("saving-throw-") {
            Self::SavingThrow
        } else if key.ends_with("-armor") || key == "shields" {
            Self::Armor
        } else if key.ends_with("-weapons") || WEAPON_KEYS.contains(&key.as_str()) {
            Self::Weapon
        } else if key.ends_with("-tools")
            || key.ends_with("-kit")
            || key.ends_with("-supplies")
            || key.ends_with("-set")
            || key.ends_with("-instrument")
        {
            Self::Tool
        } else {
            Self::Unclassified
        }
    }
}

/// Individual weapon keys that show up as proficiencies (racial weapon training etc.).
const WEAPON_KEYS: &[&str] = &[
    "battleaxes",
    "handaxes",
    "light-hammers",
    "warhammers",
    "longswords",
    "shortswords",
    "shortbows",
    "longbows",
    "rapiers",
    "hand-crossbows",
    "clubs",
    "daggers",
    "darts",
    "javelins",
    "maces",
    "quarterstaffs",
    "scimitars",
    "sickles",
    "slings",
    "spears",
    "light-crossbows",
];

impl fmt::Display for ProficiencyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A trained capability granted by species, class, features, or a user pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proficiency {
    pub key: String,
    pub name: String,
    pub category: ProficiencyCategory,
}

impl Proficiency {
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        category: ProficiencyCategory,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            category,
        }
    }
}

/// A character's proficiencies grouped by category.
pub type Proficiencies = BTreeMap<ProficiencyCategory, Vec<Proficiency>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_categories_from_catalog_keys() {
        assert_eq!(
            ProficiencyCategory::infer_from_key("skill-athletics"),
            ProficiencyCategory::Skill
        );
        assert_eq!(
            ProficiencyCategory::infer_from_key("saving-throw-con"),
            ProficiencyCategory::SavingThrow
        );
        assert_eq!(
            ProficiencyCategory::infer_from_key("heavy-armor"),
            ProficiencyCategory::Armor
        );
        assert_eq!(
            ProficiencyCategory::infer_from_key("shields"),
            ProficiencyCategory::Armor
        );
        assert_eq!(
            ProficiencyCategory::infer_from_key("martial-weapons"),
            ProficiencyCategory::Weapon
        );
        assert_eq!(
            ProficiencyCategory::infer_from_key("warhammers"),
            ProficiencyCategory::Weapon
        );
        assert_eq!(
            ProficiencyCategory::infer_from_key("thieves-tools"),
            ProficiencyCategory::Tool
        );
        assert_eq!(
            ProficiencyCategory::infer_from_key("language-elvish"),
            ProficiencyCategory::Unclassified
        );
    }
}
