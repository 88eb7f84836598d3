//! Class rule definition.

use serde::{Deserialize, Serialize};

use super::catalog_choice::{ChoiceSet, ReferenceItem};
use crate::value_objects::Ability;

/// A fixed starting item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartingEquipment {
    pub equipment: ReferenceItem,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    #[serde(alias = "index")]
    pub key: String,
    pub name: String,
    pub hit_die: u8,
    /// Proficiencies granted by the class, saving throws included
    #[serde(default)]
    pub proficiencies: Vec<ReferenceItem>,
    #[serde(default)]
    pub proficiency_choices: Vec<ChoiceSet>,
    #[serde(default)]
    pub starting_equipment: Vec<StartingEquipment>,
    #[serde(default)]
    pub starting_equipment_options: Vec<ChoiceSet>,
    #[serde(default)]
    pub spellcasting_ability: Option<Ability>,
}

impl Class {
    pub fn proficiency_keys(&self) -> impl Iterator<Item = &str> {
        self.proficiencies.iter().map(|p| p.key.as_str())
    }

    pub fn is_spellcaster(&self) -> bool {
        self.spellcasting_ability.is_some()
    }
}
