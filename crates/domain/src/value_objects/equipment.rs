//! Equipment value objects.
//!
//! Equipment is a closed set of shapes (weapon, armor, gear). They share the
//! accessors in [`EquipmentInfo`]; type-specific behaviour such as armor class
//! is reached by matching on [`Equipment`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Inventory grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentCategory {
    Weapon,
    Armor,
    Gear,
}

impl fmt::Display for EquipmentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Weapon => "weapon",
            Self::Armor => "armor",
            Self::Gear => "gear",
        };
        write!(f, "{}", s)
    }
}

/// Where an equipped item sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentSlot {
    MainHand,
    OffHand,
    TwoHanded,
    Body,
}

/// Common accessors shared by every equipment shape.
pub trait EquipmentInfo {
    fn key(&self) -> &str;
    fn name(&self) -> &str;
    fn category(&self) -> EquipmentCategory;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponCategory {
    Simple,
    Martial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponRange {
    Melee,
    Ranged,
}

/// Damage dice, e.g. 1d8 slashing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Damage {
    pub dice_count: u8,
    pub dice_size: u8,
    pub damage_type: String,
}

impl fmt::Display for Damage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{} {}", self.dice_count, self.dice_size, self.damage_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub key: String,
    pub name: String,
    pub weapon_category: WeaponCategory,
    pub weapon_range: WeaponRange,
    #[serde(default)]
    pub damage: Option<Damage>,
    #[serde(default)]
    pub properties: Vec<String>,
}

impl Weapon {
    pub fn is_two_handed(&self) -> bool {
        self.properties.iter().any(|p| p == "two-handed")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmorCategory {
    Light,
    Medium,
    Heavy,
    Shield,
}

/// How a piece of armor contributes to armor class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmorClassFormula {
    pub base: i32,
    #[serde(default)]
    pub dex_bonus: bool,
    #[serde(default)]
    pub max_bonus: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Armor {
    pub key: String,
    pub name: String,
    pub armor_category: ArmorCategory,
    pub armor_class: ArmorClassFormula,
    #[serde(default)]
    pub str_minimum: u8,
    #[serde(default)]
    pub stealth_disadvantage: bool,
}

impl Armor {
    pub fn is_shield(&self) -> bool {
        self.armor_category == ArmorCategory::Shield
    }
}

/// Adventuring gear, packs, tools, and anything else without combat stats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gear {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub gear_category: Option<String>,
}

/// A piece of equipment from the rules catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Equipment {
    Weapon(Weapon),
    Armor(Armor),
    Gear(Gear),
}

impl Equipment {
    /// Returns the armor details if this is armor or a shield.
    pub fn as_armor(&self) -> Option<&Armor> {
        match self {
            Self::Armor(armor) => Some(armor),
            _ => None,
        }
    }

    /// Returns the weapon details if this is a weapon.
    pub fn as_weapon(&self) -> Option<&Weapon> {
        match self {
            Self::Weapon(weapon) => Some(weapon),
            _ => None,
        }
    }
}

impl EquipmentInfo for Weapon {
    fn key(&self) -> &str {
        &self.key
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> EquipmentCategory {
        EquipmentCategory::Weapon
    }
}

impl EquipmentInfo for Armor {
    fn key(&self) -> &str {
        &self.key
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> EquipmentCategory {
        EquipmentCategory::Armor
    }
}

impl EquipmentInfo for Gear {
    fn key(&self) -> &str {
        &self.key
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> EquipmentCategory {
        EquipmentCategory::Gear
    }
}

impl EquipmentInfo for Equipment {
    fn key(&self) -> &str {
        match self {
            Self::Weapon(w) => w.key(),
            Self::Armor(a) => a.key(),
            Self::Gear(g) => g.key(),
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Weapon(w) => w.name(),
            Self::Armor(a) => a.name(),
            Self::Gear(g) => g.name(),
        }
    }

    fn category(&self) -> EquipmentCategory {
        match self {
            Self::Weapon(w) => w.category(),
            Self::Armor(a) => a.category(),
            Self::Gear(g) => g.category(),
        }
    }
}

/// An inventory stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub equipment: Equipment,
    pub quantity: u32,
}

impl InventoryItem {
    pub fn new(equipment: Equipment, quantity: u32) -> Self {
        Self {
            equipment,
            quantity,
        }
    }
}

/// Unequipped items grouped by category.
pub type Inventory = BTreeMap<EquipmentCategory, Vec<InventoryItem>>;

/// Equipped items by slot.
pub type EquippedItems = BTreeMap<EquipmentSlot, Equipment>;
