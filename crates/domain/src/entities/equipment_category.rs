//! Equipment category listing.

use serde::{Deserialize, Serialize};

use super::catalog_choice::ReferenceItem;

/// A named group of equipment, such as "Martial Weapons".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentCategoryListing {
    #[serde(alias = "index")]
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub equipment: Vec<ReferenceItem>,
}

impl EquipmentCategoryListing {
    pub fn contains(&self, key: &str) -> bool {
        self.equipment.iter().any(|e| e.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_catalog_listing() {
        let listing: EquipmentCategoryListing = serde_json::from_str(
            r#"{
                "index": "martial-melee-weapons",
                "name": "Martial Melee Weapons",
                "equipment": [
                    {"index": "longsword", "name": "Longsword"},
                    {"index": "warhammer", "name": "Warhammer"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(listing.key, "martial-melee-weapons");
        assert!(listing.contains("warhammer"));
        assert!(!listing.contains("dagger"));
    }
}
