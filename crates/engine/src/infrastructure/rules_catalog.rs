//! File-backed rules catalog.
//!
//! Loads species, classes, class features, proficiencies, equipment, and
//! equipment categories from one JSON document shaped like the public 5e
//! rules API (`index` keys, `option_type` choice trees). A small SRD sample
//! catalog is bundled into the binary.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use charforge_domain::{
    Class, Equipment, EquipmentCategoryListing, EquipmentInfo, Feature, FeatureCategory,
    Proficiency, ProficiencyCategory, Species,
};
use serde::Deserialize;

use crate::infrastructure::ports::{RulesError, RulesProvider};

const BUNDLED_CATALOG: &str = include_str!("../../data/srd_catalog.json");

// =============================================================================
// Catalog document
// =============================================================================

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    species: Vec<Species>,
    #[serde(default)]
    classes: Vec<Class>,
    #[serde(default)]
    class_features: Vec<ClassFeatureRecord>,
    #[serde(default)]
    proficiencies: Vec<ProficiencyRecord>,
    #[serde(default)]
    equipment: Vec<Equipment>,
    #[serde(default)]
    equipment_categories: Vec<EquipmentCategoryListing>,
}

#[derive(Debug, Deserialize)]
struct ClassFeatureRecord {
    class: String,
    level: u8,
    #[serde(alias = "index")]
    key: String,
    name: String,
    #[serde(default)]
    description: String,
}

impl ClassFeatureRecord {
    fn to_feature(&self) -> Feature {
        Feature::new(
            &self.key,
            &self.name,
            FeatureCategory::Class,
            self.level,
            &self.class,
        )
        .with_description(&self.description)
    }
}

/// Catalog proficiency. The category is optional and inferred from the key
/// when absent.
#[derive(Debug, Deserialize)]
struct ProficiencyRecord {
    #[serde(alias = "index")]
    key: String,
    name: String,
    #[serde(default)]
    category: Option<ProficiencyCategory>,
}

impl From<ProficiencyRecord> for Proficiency {
    fn from(record: ProficiencyRecord) -> Self {
        let category = record
            .category
            .unwrap_or_else(|| ProficiencyCategory::infer_from_key(&record.key));
        Proficiency::new(record.key, record.name, category)
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Rules catalog held fully in memory, indexed by key.
pub struct JsonRulesCatalog {
    species: HashMap<String, Species>,
    classes: HashMap<String, Class>,
    class_features: HashMap<String, Vec<Feature>>,
    proficiencies: HashMap<String, Proficiency>,
    equipment: HashMap<String, Equipment>,
    equipment_categories: HashMap<String, EquipmentCategoryListing>,
}

impl JsonRulesCatalog {
    /// Parse a catalog document.
    pub fn from_json(json: &str) -> Result<Self, RulesError> {
        let document: CatalogDocument =
            serde_json::from_str(json).map_err(|e| RulesError::Malformed(e.to_string()))?;

        let mut class_features: HashMap<String, Vec<Feature>> = HashMap::new();
        for record in &document.class_features {
            class_features
                .entry(record.class.clone())
                .or_default()
                .push(record.to_feature());
        }

        Ok(Self {
            species: index_by(document.species, |s| s.key.clone()),
            classes: index_by(document.classes, |c| c.key.clone()),
            class_features,
            proficiencies: index_by(
                document.proficiencies.into_iter().map(Proficiency::from),
                |p| p.key.clone(),
            ),
            equipment: index_by(document.equipment, |e| e.key().to_string()),
            equipment_categories: index_by(document.equipment_categories, |c| c.key.clone()),
        })
    }

    /// Read a catalog document from disk.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, RulesError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            RulesError::Unavailable(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// The SRD sample catalog compiled into the binary.
    pub fn bundled() -> Result<Self, RulesError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    pub fn species_keys(&self) -> Vec<&str> {
        sorted_keys(&self.species)
    }

    pub fn class_keys(&self) -> Vec<&str> {
        sorted_keys(&self.classes)
    }
}

fn index_by<T>(items: impl IntoIterator<Item = T>, key: impl Fn(&T) -> String) -> HashMap<String, T> {
    items.into_iter().map(|item| (key(&item), item)).collect()
}

fn sorted_keys<T>(map: &HashMap<String, T>) -> Vec<&str> {
    let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
    keys.sort_unstable();
    keys
}

#[async_trait]
impl RulesProvider for JsonRulesCatalog {
    async fn get_species(&self, key: &str) -> Result<Species, RulesError> {
        self.species
            .get(key)
            .cloned()
            .ok_or_else(|| RulesError::not_found("Species", key))
    }

    async fn get_class(&self, key: &str) -> Result<Class, RulesError> {
        self.classes
            .get(key)
            .cloned()
            .ok_or_else(|| RulesError::not_found("Class", key))
    }

    async fn get_proficiency(&self, key: &str) -> Result<Proficiency, RulesError> {
        self.proficiencies
            .get(key)
            .cloned()
            .ok_or_else(|| RulesError::not_found("Proficiency", key))
    }

    async fn get_equipment(&self, key: &str) -> Result<Equipment, RulesError> {
        self.equipment
            .get(key)
            .cloned()
            .ok_or_else(|| RulesError::not_found("Equipment", key))
    }

    async fn list_class_features(
        &self,
        class_key: &str,
        level: u8,
    ) -> Result<Vec<Feature>, RulesError> {
        if !self.classes.contains_key(class_key) {
            return Err(RulesError::not_found("Class", class_key));
        }
        Ok(self
            .class_features
            .get(class_key)
            .map(|features| {
                features
                    .iter()
                    .filter(|f| f.level <= level)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get_equipment_category(
        &self,
        key: &str,
    ) -> Result<EquipmentCategoryListing, RulesError> {
        self.equipment_categories
            .get(key)
            .cloned()
            .ok_or_else(|| RulesError::not_found("EquipmentCategory", key))
    }
}
