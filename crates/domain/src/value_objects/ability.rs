//! Ability value objects - the six core abilities, rolled values, and derived scores.
//!
//! Provides type safety for ability references instead of using magic strings like "STR", "DEX".

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::ids::RollId;

/// One of the six core abilities.
///
/// This is a closed set: parsing an unknown code is an error, never a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Ability {
    /// Strength - physical power
    #[serde(rename = "STR")]
    Strength,
    /// Dexterity - agility and reflexes
    #[serde(rename = "DEX")]
    Dexterity,
    /// Constitution - endurance and health
    #[serde(rename = "CON")]
    Constitution,
    /// Intelligence - reasoning and memory
    #[serde(rename = "INT")]
    Intelligence,
    /// Wisdom - perception and insight
    #[serde(rename = "WIS")]
    Wisdom,
    /// Charisma - force of personality
    #[serde(rename = "CHA")]
    Charisma,
}

impl Ability {
    /// All abilities in sheet order.
    pub const ALL: [Ability; 6] = [
        Self::Strength,
        Self::Dexterity,
        Self::Constitution,
        Self::Intelligence,
        Self::Wisdom,
        Self::Charisma,
    ];

    /// Returns the short uppercase code (e.g., "STR", "DEX").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strength => "STR",
            Self::Dexterity => "DEX",
            Self::Constitution => "CON",
            Self::Intelligence => "INT",
            Self::Wisdom => "WIS",
            Self::Charisma => "CHA",
        }
    }

    /// Returns the full name of the ability (e.g., "Strength").
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Strength => "Strength",
            Self::Dexterity => "Dexterity",
            Self::Constitution => "Constitution",
            Self::Intelligence => "Intelligence",
            Self::Wisdom => "Wisdom",
            Self::Charisma => "Charisma",
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Ability {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "STR" | "STRENGTH" => Ok(Self::Strength),
            "DEX" | "DEXTERITY" => Ok(Self::Dexterity),
            "CON" | "CONSTITUTION" => Ok(Self::Constitution),
            "INT" | "INTELLIGENCE" => Ok(Self::Intelligence),
            "WIS" | "WISDOM" => Ok(Self::Wisdom),
            "CHA" | "CHARISMA" => Ok(Self::Charisma),
            _ => Err(DomainError::parse(format!("Unknown ability: {}", s))),
        }
    }
}

/// Ability modifier: `floor((score - 10) / 2)`.
///
/// Rust's `/` truncates toward zero, so this uses euclidean division to round
/// toward negative infinity (score 9 -> -1, not 0).
pub fn ability_modifier(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}

/// A finished ability score and its derived modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScore {
    pub score: i32,
    pub modifier: i32,
}

impl AbilityScore {
    pub fn new(score: i32) -> Self {
        Self {
            score,
            modifier: ability_modifier(score),
        }
    }
}

/// A rolled value with a stable identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityRoll {
    pub id: RollId,
    pub value: i32,
}

impl AbilityRoll {
    pub fn new(id: impl Into<RollId>, value: i32) -> Self {
        Self {
            id: id.into(),
            value,
        }
    }
}

/// The user's mapping of rolled values onto ability slots.
pub type AbilityAssignments = BTreeMap<Ability, RollId>;

/// Finished ability scores keyed by ability.
pub type Attributes = BTreeMap<Ability, AbilityScore>;

/// A racial ability-score bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityBonus {
    pub ability: Ability,
    pub bonus: i32,
}

impl AbilityBonus {
    pub fn new(ability: Ability, bonus: i32) -> Self {
        Self { ability, bonus }
    }
}
