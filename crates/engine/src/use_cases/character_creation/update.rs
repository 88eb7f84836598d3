//! Draft edits: partial updates and ability rolls.

use std::collections::HashMap;
use std::sync::Arc;

use charforge_domain::rules::{resolve_choices, roll_ability_scores};
use charforge_domain::{
    Character, CharacterDraft, CharacterId, CharacterName, CreationStep, InventoryItem,
    Proficiency, ResolvedChoices,
};

use super::types::{DraftUpdate, EquipmentPick, UpdateDraftResult, UpdateSkips};
use super::{load_character, require_draft, CharacterCreationError};
use crate::infrastructure::ports::{
    CharacterRepo, ClockPort, CreationSessionPort, DraftRepo, RandomPort, RulesError,
    RulesProvider,
};

// =============================================================================
// Update
// =============================================================================

/// Apply a partial update to a draft character.
///
/// Fields are applied in flow order (species, class, rolls, assignments,
/// proficiencies, equipment, name) so later steps see earlier changes made in
/// the same call. Nothing is persisted unless every field applies.
pub struct UpdateDraftCharacter {
    characters: Arc<dyn CharacterRepo>,
    drafts: Arc<dyn DraftRepo>,
    rules: Arc<dyn RulesProvider>,
    sessions: Arc<dyn CreationSessionPort>,
    clock: Arc<dyn ClockPort>,
}

impl UpdateDraftCharacter {
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
        }
    }

    pub async fn execute(
        &self,
        character_id: CharacterId,
        update: DraftUpdate,
    ) -> Result<UpdateDraftResult, CharacterCreationError> {
        if update.is_empty() {
            return Err(CharacterCreationError::invalid_argument(
                "update contains no fields",
            ));
        }
        let name = update
            .name
            .as_deref()
            .map(CharacterName::new)
            .transpose()
            .map_err(|e| CharacterCreationError::invalid_argument(e.to_string()))?;

        let mut character = load_character(self.characters.as_ref(), character_id).await?;
        require_draft(&character, "update")?;
        let mut draft = self
            .drafts
            .get_by_character_id(character_id)
            .await?
            .ok_or(CharacterCreationError::DraftNotFound(character_id))?;
        let previous_draft = draft.clone();

        let now = self.clock.now();
        let mut steps = Vec::new();
        let mut skipped = UpdateSkips::default();
        let mut replaced_skills = Vec::new();

        if let Some(key) = &update.species_key {
            let species = self.rules.get_species(key).await?;
            skipped.assignments.extend(character.set_species(species, now)?);
            steps.push(CreationStep::Species);
        }

        if let Some(key) = &update.class_key {
            let class = self.rules.get_class(key).await?;
            character.set_class(class, now)?;
            steps.push(CreationStep::Class);
        }

        if let Some(rolls) = update.ability_rolls {
            character.set_ability_rolls(rolls, now)?;
        }

        if let Some(assignments) = update.ability_assignments {
            let skips = character.assign_abilities(assignments, now)?;
            // A fresh assignment supersedes skips reported by a species change
            skipped.assignments = skips;
            steps.push(CreationStep::AbilityScores);
        }

        if let Some(keys) = &update.proficiency_keys {
            let selected = self.lookup_proficiencies(keys, &mut skipped).await?;
            let outcome = character.select_proficiencies(selected, now)?;
            replaced_skills = outcome.replaced_skills;
            steps.push(CreationStep::Proficiencies);
        }

        if let Some(picks) = &update.equipment_picks {
            let items = self
                .equipment_for_picks(&character, picks, &mut skipped)
                .await?;
            character.replace_chosen_equipment(items, now)?;
            steps.push(CreationStep::Equipment);
        }

        if let Some(name) = name {
            character.set_name(name, now)?;
            steps.push(CreationStep::Name);
        }

        for skip in &skipped.assignments {
            tracing::warn!(
                character_id = %character_id,
                ability = %skip.ability,
                roll_id = %skip.roll_id,
                "Ability assignment references an unknown roll"
            );
        }

        draft.record_progress(steps, now);
        save_edit(
            self.characters.as_ref(),
            self.drafts.as_ref(),
            self.sessions.as_ref(),
            &character,
            &draft,
            &previous_draft,
        )
        .await?;

        tracing::debug!(
            character_id = %character_id,
            current_step = %draft.flow().current_step,
            "Draft updated"
        );

        Ok(UpdateDraftResult {
            character,
            draft,
            replaced_skills,
            skipped,
        })
    }

    async fn lookup_proficiencies(
        &self,
        keys: &[String],
        skipped: &mut UpdateSkips,
    ) -> Result<Vec<Proficiency>, CharacterCreationError> {
        let mut found = Vec::with_capacity(keys.len());
        for key in keys {
            match self.rules.get_proficiency(key).await {
                Ok(p) => found.push(p),
                Err(RulesError::NotFound { .. }) => {
                    tracing::warn!(proficiency = %key, "Skipping unknown proficiency");
                    skipped.proficiency_keys.push(key.clone());
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(found)
    }

    /// Validate picks against the character's current choices and fetch the
    /// items they grant.
    async fn equipment_for_picks(
        &self,
        character: &Character,
        picks: &[EquipmentPick],
        skipped: &mut UpdateSkips,
    ) -> Result<Vec<InventoryItem>, CharacterCreationError> {
        let choices = resolve_choices(character.species(), character.class());
        let grants = self.validate_picks(&choices, picks).await?;

        let mut items = Vec::new();
        for (key, quantity) in grants {
            match self.rules.get_equipment(&key).await {
                Ok(equipment) => items.push(InventoryItem::new(equipment, quantity)),
                Err(RulesError::NotFound { .. }) => {
                    tracing::warn!(equipment = %key, "Skipping unknown equipment");
                    skipped.equipment_keys.push(key);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(items)
    }

    /// Turn picks into `(item key, quantity)` grants, rejecting picks that do
    /// not match an offered option.
    async fn validate_picks(
        &self,
        choices: &ResolvedChoices,
        picks: &[EquipmentPick],
    ) -> Result<Vec<(String, u32)>, CharacterCreationError> {
        let mut per_choice: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut grants = Vec::new();

        for pick in picks {
            let choice = choices
                .equipment_choices
                .iter()
                .find(|c| c.id == pick.choice_id)
                .ok_or_else(|| {
                    CharacterCreationError::invalid_argument(format!(
                        "unknown equipment choice '{}'",
                        pick.choice_id
                    ))
                })?;
            let option = choice.option(&pick.option_key).ok_or_else(|| {
                CharacterCreationError::invalid_argument(format!(
                    "choice '{}' has no option '{}'",
                    choice.id, pick.option_key
                ))
            })?;

            let picked = per_choice.entry(choice.id.as_str()).or_default();
            if picked.contains(&option.key.as_str()) {
                return Err(CharacterCreationError::invalid_argument(format!(
                    "option '{}' picked twice for choice '{}'",
                    option.key, choice.id
                )));
            }
            picked.push(option.key.as_str());
            if picked.len() > usize::from(choice.choose_count) {
                return Err(CharacterCreationError::invalid_argument(format!(
                    "choice '{}' allows {} pick(s)",
                    choice.id, choice.choose_count
                )));
            }

            match (&option.nested, option.primary_item_key()) {
                (Some(nested), _) => {
                    let count = pick.selected_keys.len();
                    if count == 0 || count > usize::from(nested.choose) {
                        return Err(CharacterCreationError::invalid_argument(format!(
                            "option '{}' needs 1 to {} item(s) from {}",
                            option.key, nested.choose, nested.category_name
                        )));
                    }
                    let listing = self
                        .rules
                        .get_equipment_category(&nested.category_key)
                        .await?;
                    for key in &pick.selected_keys {
                        if !listing.contains(key) {
                            return Err(CharacterCreationError::invalid_argument(format!(
                                "'{}' is not in {}",
                                key, nested.category_name
                            )));
                        }
                        grants.push((key.clone(), 1));
                    }
                }
                (None, Some(primary)) => {
                    if !pick.selected_keys.is_empty() {
                        return Err(CharacterCreationError::invalid_argument(format!(
                            "option '{}' is not a category pick",
                            option.key
                        )));
                    }
                    grants.push((primary.to_string(), option.quantity));
                }
                (None, None) => {
                    return Err(CharacterCreationError::invalid_argument(format!(
                        "option '{}' grants nothing",
                        option.key
                    )));
                }
            }
            grants.extend(
                option
                    .bundle_items
                    .iter()
                    .map(|b| (b.key.clone(), b.quantity)),
            );
        }

        Ok(grants)
    }

}

/// Persist an edited draft character and its wrapper.
///
/// The wrapper is written first. If the character write then fails, the
/// previous wrapper is put back so neither record shows the failed edit.
async fn save_edit(
    characters: &dyn CharacterRepo,
    drafts: &dyn DraftRepo,
    sessions: &dyn CreationSessionPort,
    character: &Character,
    draft: &CharacterDraft,
    previous_draft: &CharacterDraft,
) -> Result<(), CharacterCreationError> {
    drafts.update(draft).await?;
    if let Err(e) = characters.update(character).await {
        if let Err(restore) = drafts.update(previous_draft).await {
            tracing::error!(
                character_id = %character.id(),
                error = %restore,
                "Draft progress could not be restored after a failed character write"
            );
        }
        return Err(e.into());
    }

    if let Some(mut session) = sessions.get(draft.character_id()).await {
        session.current_step = draft.flow().current_step;
        sessions.put(session).await;
    }
    Ok(())
}

// =============================================================================
// Roll
// =============================================================================

/// Roll fresh ability values for a draft. Existing assignments are cleared.
pub struct RollAbilityScores {
    characters: Arc<dyn CharacterRepo>,
    drafts: Arc<dyn DraftRepo>,
    sessions: Arc<dyn CreationSessionPort>,
    random: Arc<dyn RandomPort>,
    clock: Arc<dyn ClockPort>,
}

impl RollAbilityScores {
    pub fn new(
        characters: Arc<dyn CharacterRepo>,
        drafts: Arc<dyn DraftRepo>,
        sessions: Arc<dyn CreationSessionPort>,
        random: Arc<dyn RandomPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            characters,
            drafts,
            sessions,
            random,
            clock,
        }
    }

    pub async fn execute(&self, character_id: CharacterId) -> Result<Character, CharacterCreationError> {
        let mut character = load_character(self.characters.as_ref(), character_id).await?;
        require_draft(&character, "roll abilities")?;
        let mut draft = self
            .drafts
            .get_by_character_id(character_id)
            .await?
            .ok_or(CharacterCreationError::DraftNotFound(character_id))?;
        let previous_draft = draft.clone();

        let rolls = roll_ability_scores(|| self.random.gen_range(1, 6));
        tracing::debug!(
            character_id = %character_id,
            values = ?rolls.iter().map(|r| r.value).collect::<Vec<_>>(),
            "Ability scores rolled"
        );
        let now = self.clock.now();
        character.set_ability_rolls(rolls, now)?;
        draft.record_progress(Vec::new(), now);
        save_edit(
            self.characters.as_ref(),
            self.drafts.as_ref(),
            self.sessions.as_ref(),
            &character,
            &draft,
            &previous_draft,
        )
        .await?;
        Ok(character)
    }
}
