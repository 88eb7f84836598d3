//! Rule definitions supplied by the rules catalog.

mod catalog_choice;
mod class;
mod equipment_category;
mod species;

pub use catalog_choice::{ChoiceEntry, ChoiceSet, OptionSet, ReferenceItem};
pub use class::{Class, StartingEquipment};
pub use equipment_category::EquipmentCategoryListing;
pub use species::{Species, SpeciesTrait};
