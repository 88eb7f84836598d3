//! Rules catalog port.
//!
//! Rule definitions (species, classes, equipment, proficiencies, class
//! features) come from an external catalog. Lookups of unknown keys return
//! `RulesError::NotFound` so callers can tell a bad key from an outage.

use async_trait::async_trait;
use charforge_domain::{Class, Equipment, EquipmentCategoryListing, Feature, Proficiency, Species};

use super::error::RulesError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RulesProvider: Send + Sync {
    async fn get_species(&self, key: &str) -> Result<Species, RulesError>;
    async fn get_class(&self, key: &str) -> Result<Class, RulesError>;
    async fn get_proficiency(&self, key: &str) -> Result<Proficiency, RulesError>;
    async fn get_equipment(&self, key: &str) -> Result<Equipment, RulesError>;
    /// Class feature templates for every level up to and including `level`.
    async fn list_class_features(&self, class_key: &str, level: u8)
        -> Result<Vec<Feature>, RulesError>;
    /// Concrete items in an equipment category (the secondary picker for a
    /// nested choice).
    async fn get_equipment_category(
        &self,
        key: &str,
    ) -> Result<EquipmentCategoryListing, RulesError>;
}
