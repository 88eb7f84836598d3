//! Draft -> Active finalization.
//!
//! Everything happens on an in-memory copy of the character. The only write
//! that can fail the call is the final character update, so a failed
//! finalization leaves the stored draft exactly as it was.

use std::collections::HashSet;
use std::sync::Arc;

use charforge_domain::rules::{
    calculate_armor_class, class_resource_pools, has_proficiency, max_hit_points,
    PassiveEffectRegistry,
};
use charforge_domain::{
    Ability, Character, CharacterId, Class, Feature, InventoryItem, Species,
};

use super::types::{FinalizationReport, FinalizeResult};
use super::{load_character, require_draft, CharacterCreationError};
use crate::infrastructure::ports::{
    CharacterRepo, ClockPort, CreationSessionPort, DraftRepo, RulesError, RulesProvider,
};

pub struct FinalizeDraftCharacter {
    characters: Arc<dyn CharacterRepo>,
    drafts: Arc<dyn DraftRepo>,
    rules: Arc<dyn RulesProvider>,
    sessions: Arc<dyn CreationSessionPort>,
    clock: Arc<dyn ClockPort>,
    effects: Arc<PassiveEffectRegistry>,
}

impl FinalizeDraftCharacter {
    pub fn new(
        characters: Arc<dyn CharacterRepo>,
        drafts: Arc<dyn DraftRepo>,
        rules: Arc<dyn RulesProvider>,
        sessions: Arc<dyn CreationSessionPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            characters,
            drafts,
            rules,
            sessions,
            clock,
            effects: Arc::new(PassiveEffectRegistry::default()),
        }
    }

    pub fn with_effects(mut self, effects: Arc<PassiveEffectRegistry>) -> Self {
        self.effects = effects;
        self
    }

    pub async fn execute(
        &self,
        character_id: CharacterId,
    ) -> Result<FinalizeResult, CharacterCreationError> {
        let mut character = load_character(self.characters.as_ref(), character_id).await?;
        require_draft(&character, "finalize")?;

        let species = character.species().cloned();
        let class = character.class().cloned();
        let class_features = self.class_features(class.as_ref(), character.level()).await?;

        let mut report = FinalizationReport::default();

        // Attributes
        if character.needs_attribute_heal() {
            tracing::warn!(
                character_id = %character_id,
                assignments = character.ability_assignments().len(),
                "Attributes empty despite assignments, re-deriving"
            );
            character.rederive_attributes();
            report.self_healed = true;
        }
        report.filled_abilities = character.fill_missing_attributes();
        if !report.filled_abilities.is_empty() {
            tracing::info!(
                character_id = %character_id,
                abilities = ?report.filled_abilities,
                "Filled unassigned abilities with base scores"
            );
        }

        // Hit points
        if let Some(class) = &class {
            if character.max_hit_points() == 0 {
                character.set_hit_points(max_hit_points(
                    class.hit_die,
                    character.modifier(Ability::Constitution),
                    character.level(),
                ));
            }
        }

        // Features, species first
        if let Some(species) = &species {
            report
                .granted_features
                .extend(character.synthesize_features(species.trait_features()));
        }
        report
            .granted_features
            .extend(character.synthesize_features(class_features));

        let effects = self.effects.apply_all(&mut character);
        for error in &effects.errors {
            tracing::warn!(
                character_id = %character_id,
                feature = %error.feature_key,
                error = %error.message,
                "Passive effect failed"
            );
        }
        report.applied_effects = effects.applied;
        report.effect_errors = effects
            .errors
            .into_iter()
            .map(|e| format!("{}: {}", e.feature_key, e.message))
            .collect();
        character.set_armor_class(calculate_armor_class(&character));

        // Proficiencies and starting equipment, best-effort per item
        self.grant_proficiencies(&mut character, species.as_ref(), class.as_ref(), &mut report)
            .await;
        if let Some(class) = &class {
            self.grant_starting_equipment(&mut character, class, &mut report)
                .await;
        }

        report.equipped = character.equip_starting_loadout();
        character.set_armor_class(calculate_armor_class(&character));

        if let Some(class) = &class {
            report.initialized_resources = character.init_resources(class_resource_pools(
                &class.key,
                character.level(),
                character.modifier(Ability::Charisma),
            ));
        }

        character.activate(self.clock.now())?;
        self.characters.update(&character).await?;

        report.draft_delete_failed = !self.delete_draft(character_id).await;
        self.sessions.remove(character_id).await;

        tracing::info!(
            character_id = %character_id,
            max_hit_points = character.max_hit_points(),
            armor_class = character.armor_class(),
            features = character.features().len(),
            self_healed = report.self_healed,
            "Character finalized"
        );

        Ok(FinalizeResult { character, report })
    }

    /// Class feature templates up to the character's level. An unknown class
    /// yields no templates; a catalog outage fails the finalization.
    async fn class_features(
        &self,
        class: Option<&Class>,
        level: u8,
    ) -> Result<Vec<Feature>, CharacterCreationError> {
        let Some(class) = class else {
            return Ok(Vec::new());
        };
        match self.rules.list_class_features(&class.key, level).await {
            Ok(features) => Ok(features),
            Err(RulesError::NotFound { .. }) => {
                tracing::warn!(class = %class.key, "No class features in catalog");
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn grant_proficiencies(
        &self,
        character: &mut Character,
        species: Option<&Species>,
        class: Option<&Class>,
        report: &mut FinalizationReport,
    ) {
        let mut keys: Vec<String> = species
            .map(|s| s.guaranteed_proficiency_keys().map(str::to_string).collect())
            .unwrap_or_default();

        if let Some(class) = class {
            let already_granted = class
                .proficiency_keys()
                .all(|key| has_proficiency(character.proficiencies(), key));
            if already_granted {
                tracing::debug!(class = %class.key, "Class proficiencies already present");
            } else {
                keys.extend(class.proficiency_keys().map(str::to_string));
            }
        }

        let mut seen = HashSet::new();
        keys.retain(|key| {
            !has_proficiency(character.proficiencies(), key) && seen.insert(key.clone())
        });

        for key in keys {
            match self.rules.get_proficiency(&key).await {
                Ok(proficiency) => {
                    for granted in character.grant_proficiencies([proficiency]) {
                        report.granted_proficiencies.push(granted.key);
                    }
                }
                Err(e) => {
                    tracing::warn!(proficiency = %key, error = %e, "Skipping proficiency grant");
                    report.skipped_proficiencies.push(key);
                }
            }
        }
    }

    async fn grant_starting_equipment(
        &self,
        character: &mut Character,
        class: &Class,
        report: &mut FinalizationReport,
    ) {
        for starting in &class.starting_equipment {
            let key = &starting.equipment.key;
            match self.rules.get_equipment(key).await {
                Ok(equipment) => {
                    character.add_to_inventory(InventoryItem::new(equipment, starting.quantity));
                    report.granted_equipment.push(key.clone());
                }
                Err(e) => {
                    tracing::warn!(equipment = %key, error = %e, "Skipping starting equipment");
                    report.skipped_equipment.push(key.clone());
                }
            }
        }
    }

    /// Remove the draft wrapper. Returns false if it could not be removed.
    async fn delete_draft(&self, character_id: CharacterId) -> bool {
        let result = match self.drafts.get_by_character_id(character_id).await {
            Ok(Some(draft)) => self.drafts.delete(draft.id()).await,
            Ok(None) => return true,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(
                    character_id = %character_id,
                    error = %e,
                    "Character finalized but its draft could not be deleted"
                );
                false
            }
        }
    }
}
