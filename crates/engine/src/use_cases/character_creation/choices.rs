//! Choice lookups for the creation UI.

use std::sync::Arc;

use charforge_domain::rules::resolve_choices;
use charforge_domain::{EquipmentCategoryListing, ResolvedChoices};

use super::CharacterCreationError;
use crate::infrastructure::ports::RulesProvider;

/// Proficiency and equipment choices offered for a species/class pair.
pub struct ResolveChoices {
    rules: Arc<dyn RulesProvider>,
}

impl ResolveChoices {
    pub fn new(rules: Arc<dyn RulesProvider>) -> Self {
        Self { rules }
    }

    /// At least one of the keys is required. Catalog entries that cannot be
    /// offered are logged and left out.
    pub async fn execute(
        &self,
        species_key: Option<&str>,
        class_key: Option<&str>,
    ) -> Result<ResolvedChoices, CharacterCreationError> {
        let species_key = species_key.map(str::trim).filter(|k| !k.is_empty());
        let class_key = class_key.map(str::trim).filter(|k| !k.is_empty());
        if species_key.is_none() && class_key.is_none() {
            return Err(CharacterCreationError::invalid_argument(
                "a species key or class key is required",
            ));
        }

        let species = match species_key {
            Some(key) => Some(self.rules.get_species(key).await?),
            None => None,
        };
        let class = match class_key {
            Some(key) => Some(self.rules.get_class(key).await?),
            None => None,
        };

        let resolved = resolve_choices(species.as_ref(), class.as_ref());
        for skipped in &resolved.skipped {
            tracing::warn!(
                choice_id = %skipped.choice_id,
                reason = %skipped.reason,
                "Skipped catalog choice"
            );
        }
        Ok(resolved)
    }
}

/// Concrete items behind a nested equipment option.
pub struct ListCategoryOptions {
    rules: Arc<dyn RulesProvider>,
}

impl ListCategoryOptions {
    pub fn new(rules: Arc<dyn RulesProvider>) -> Self {
        Self { rules }
    }

    pub async fn execute(
        &self,
        category_key: &str,
    ) -> Result<EquipmentCategoryListing, CharacterCreationError> {
        let key = category_key.trim();
        if key.is_empty() {
            return Err(CharacterCreationError::invalid_argument(
                "category key is required",
            ));
        }
        Ok(self.rules.get_equipment_category(key).await?)
    }
}
