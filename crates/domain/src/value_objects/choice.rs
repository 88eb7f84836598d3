//! Presentable choices - the flattened form of rules-catalog choice trees.

use serde::{Deserialize, Serialize};

/// What a choice picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceKind {
    Proficiency,
    Equipment,
}

/// A "choose N of these" unit ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Stable id, e.g. `class-fighter-equipment-1`
    pub id: String,
    pub name: String,
    pub kind: ChoiceKind,
    pub choose_count: u8,
    pub options: Vec<ChoiceOption>,
}

impl Choice {
    pub fn option(&self, key: &str) -> Option<&ChoiceOption> {
        self.options.iter().find(|o| o.key == key)
    }
}

/// An item granted automatically alongside a chosen option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleItem {
    pub key: String,
    pub quantity: u32,
}

/// Marks an option that is a category, not a concrete item.
///
/// The caller has to present a secondary picker over the category
/// before the option can be granted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedChoice {
    pub category_key: String,
    pub category_name: String,
    /// How many items to pick from the category
    pub choose: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Quantity of the primary item (20 arrows, 4 javelins)
    pub quantity: u32,
    #[serde(default)]
    pub bundle_items: Vec<BundleItem>,
    #[serde(default)]
    pub nested: Option<NestedChoice>,
}

impl ChoiceOption {
    pub fn leaf(key: impl Into<String>, name: impl Into<String>, quantity: u32) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            description: String::new(),
            quantity,
            bundle_items: Vec::new(),
            nested: None,
        }
    }

    pub fn is_nested(&self) -> bool {
        self.nested.is_some()
    }

    /// Key of the concrete item a leaf option grants. A bundle's key joins
    /// all its item keys with `+`; the primary item comes first. Nested
    /// options have no primary item until the user picks from the category.
    pub fn primary_item_key(&self) -> Option<&str> {
        if self.is_nested() {
            None
        } else {
            self.key.split('+').next()
        }
    }

    /// Keys of every auxiliary item granted with this option.
    pub fn bundle_item_keys(&self) -> Vec<&str> {
        self.bundle_items.iter().map(|b| b.key.as_str()).collect()
    }
}

/// Choices for a species/class pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedChoices {
    pub proficiency_choices: Vec<Choice>,
    pub equipment_choices: Vec<Choice>,
    /// Catalog entries that could not be turned into choices
    #[serde(default)]
    pub skipped: Vec<SkippedChoice>,
}

impl ResolvedChoices {
    pub fn find(&self, choice_id: &str) -> Option<&Choice> {
        self.proficiency_choices
            .iter()
            .chain(self.equipment_choices.iter())
            .find(|c| c.id == choice_id)
    }
}

/// A catalog entry dropped during resolution, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedChoice {
    pub choice_id: String,
    pub reason: String,
}
