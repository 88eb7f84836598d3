//! Value objects - Immutable objects defined by their attributes

mod ability;
mod choice;
mod equipment;
mod feature;
mod names;
mod proficiency;
mod resources;

pub use ability::{
    ability_modifier, Ability, AbilityAssignments, AbilityBonus, AbilityRoll, AbilityScore,
    Attributes,
};
pub use choice::{
    BundleItem, Choice, ChoiceKind, ChoiceOption, NestedChoice, ResolvedChoices, SkippedChoice,
};
pub use equipment::{
    Armor, ArmorCategory, ArmorClassFormula, Damage, Equipment, EquipmentCategory,
    EquipmentInfo, EquipmentSlot, EquippedItems, Gear, Inventory, InventoryItem, Weapon,
    WeaponCategory, WeaponRange,
};
pub use feature::{Feature, FeatureCategory, FeatureChoiceKind, FeatureMetadata};
pub use names::CharacterName;
pub use proficiency::{Proficiencies, Proficiency, ProficiencyCategory};
pub use resources::{ResourceKind, ResourcePool, RestType};
