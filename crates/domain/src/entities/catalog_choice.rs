//! Rules-catalog choice trees, in the shape the public 5e catalog publishes them.
//!
//! ```json
//! {"desc": "(a) a martial weapon and a shield or (b) two martial weapons",
//!  "choose": 1,
//!  "from": {"option_set_type": "options_array", "options": [
//!     {"option_type": "multiple", "items": [
//!         {"option_type": "choice", "choice": {"desc": "a martial weapon", "choose": 1,
//!          "from": {"option_set_type": "equipment_category",
//!                   "equipment_category": {"index": "martial-weapons", "name": "Martial Weapons"}}}},
//!         {"option_type": "counted_reference", "count": 1, "of": {"index": "shield", "name": "Shield"}}]},
//!     {"option_type": "choice", "choice": {"desc": "two martial weapons", "choose": 2,
//!      "from": {"option_set_type": "equipment_category",
//!               "equipment_category": {"index": "martial-weapons", "name": "Martial Weapons"}}}}]}}
//! ```
//!
//! Unknown option types deserialize to `Unsupported` so a catalog with entries
//! this crate does not understand still loads.

use serde::{Deserialize, Serialize};

/// A `{key, name}` pointer into the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceItem {
    #[serde(alias = "index")]
    pub key: String,
    pub name: String,
}

impl ReferenceItem {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
        }
    }
}

/// "Choose N from ..."
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceSet {
    #[serde(default)]
    pub desc: String,
    pub choose: u8,
    pub from: OptionSet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "option_set_type", rename_all = "snake_case")]
pub enum OptionSet {
    #[serde(rename = "options_array")]
    Options { options: Vec<ChoiceEntry> },
    EquipmentCategory { equipment_category: ReferenceItem },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "option_type", rename_all = "snake_case")]
pub enum ChoiceEntry {
    Reference { item: ReferenceItem },
    CountedReference { count: u32, of: ReferenceItem },
    Multiple { items: Vec<ChoiceEntry> },
    Choice { choice: Box<ChoiceSet> },
    #[serde(other)]
    Unsupported,
}
