//! Character creation use cases.
//!
//! Drafts are created, edited step by step, then finalized into an active
//! character. Rule definitions come from the rules provider; storage goes
//! through the character and draft repositories.

mod choices;
mod draft;
mod error;
mod feature_choices;
mod finalize;
mod types;
mod update;

pub use choices::{ListCategoryOptions, ResolveChoices};
pub use draft::{CancelDraft, GetOrCreateDraftCharacter, StartNewDraft};
pub use error::{CharacterCreationError, ErrorKind};
pub use feature_choices::{GetPendingFeatureChoices, RecordFeatureChoice};
pub use finalize::FinalizeDraftCharacter;
pub use types::{
    DraftUpdate, DraftView, EquipmentPick, FinalizationReport, FinalizeResult,
    PendingFeatureChoice, UpdateDraftResult, UpdateSkips,
};
pub use update::{RollAbilityScores, UpdateDraftCharacter};

use std::sync::Arc;

use charforge_domain::{Character, CharacterId, OwnerId, RealmId};

use crate::infrastructure::ports::CharacterRepo;

/// Container for character creation use cases.
pub struct CharacterCreationUseCases {
    pub get_or_create_draft: Arc<GetOrCreateDraftCharacter>,
    pub start_new_draft: Arc<StartNewDraft>,
    pub cancel_draft: Arc<CancelDraft>,
    pub update_draft: Arc<UpdateDraftCharacter>,
    pub roll_ability_scores: Arc<RollAbilityScores>,
    pub finalize: Arc<FinalizeDraftCharacter>,
    pub resolve_choices: Arc<ResolveChoices>,
    pub list_category_options: Arc<ListCategoryOptions>,
    pub pending_feature_choices: Arc<GetPendingFeatureChoices>,
    pub record_feature_choice: Arc<RecordFeatureChoice>,
}

impl CharacterCreationUseCases {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        get_or_create_draft: Arc<GetOrCreateDraftCharacter>,
        start_new_draft: Arc<StartNewDraft>,
        cancel_draft: Arc<CancelDraft>,
        update_draft: Arc<UpdateDraftCharacter>,
        roll_ability_scores: Arc<RollAbilityScores>,
        finalize: Arc<FinalizeDraftCharacter>,
        resolve_choices: Arc<ResolveChoices>,
        list_category_options: Arc<ListCategoryOptions>,
        pending_feature_choices: Arc<GetPendingFeatureChoices>,
        record_feature_choice: Arc<RecordFeatureChoice>,
    ) -> Self {
        Self {
            get_or_create_draft,
            start_new_draft,
            cancel_draft,
            update_draft,
            roll_ability_scores,
            finalize,
            resolve_choices,
            list_category_options,
            pending_feature_choices,
            record_feature_choice,
        }
    }
}

// =============================================================================
// Shared helpers
// =============================================================================

pub(crate) fn parse_owner_realm(
    owner_id: &str,
    realm_id: &str,
) -> Result<(OwnerId, RealmId), CharacterCreationError> {
    let owner_id = OwnerId::new(owner_id)
        .map_err(|e| CharacterCreationError::invalid_argument(e.to_string()))?;
    let realm_id = RealmId::new(realm_id)
        .map_err(|e| CharacterCreationError::invalid_argument(e.to_string()))?;
    Ok((owner_id, realm_id))
}

pub(crate) async fn load_character(
    characters: &dyn CharacterRepo,
    character_id: CharacterId,
) -> Result<Character, CharacterCreationError> {
    characters
        .get(character_id)
        .await?
        .ok_or(CharacterCreationError::CharacterNotFound(character_id))
}

pub(crate) fn require_draft(
    character: &Character,
    operation: &'static str,
) -> Result<(), CharacterCreationError> {
    if character.is_draft() {
        Ok(())
    } else {
        Err(CharacterCreationError::InvalidState {
            operation,
            character_id: character.id(),
            reason: format!("character is {}", character.status()),
        })
    }
}
