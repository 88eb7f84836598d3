//! Feature sub-choices (fighting style, divine domain, ...).

use std::sync::Arc;

use charforge_domain::{Character, CharacterId};

use super::types::PendingFeatureChoice;
use super::{load_character, CharacterCreationError};
use crate::infrastructure::ports::{CharacterRepo, ClockPort};

/// Features still waiting for the user's decision.
pub struct GetPendingFeatureChoices {
    characters: Arc<dyn CharacterRepo>,
}

impl GetPendingFeatureChoices {
    pub fn new(characters: Arc<dyn CharacterRepo>) -> Self {
        Self { characters }
    }

    pub async fn execute(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<PendingFeatureChoice>, CharacterCreationError> {
        let character = load_character(self.characters.as_ref(), character_id).await?;
        Ok(pending_choices(&character))
    }
}

fn pending_choices(character: &Character) -> Vec<PendingFeatureChoice> {
    character
        .pending_feature_choices()
        .into_iter()
        .filter_map(|feature| {
            let kind = feature.choice_kind()?;
            Some(PendingFeatureChoice {
                feature_key: feature.key.clone(),
                feature_name: feature.name.clone(),
                kind,
                options: kind.options().iter().map(|o| o.to_string()).collect(),
            })
        })
        .collect()
}

/// Record a feature sub-choice. Works on drafts and active characters; a
/// choice that was already made cannot be changed.
pub struct RecordFeatureChoice {
    characters: Arc<dyn CharacterRepo>,
    clock: Arc<dyn ClockPort>,
}

impl RecordFeatureChoice {
    pub fn new(characters: Arc<dyn CharacterRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { characters, clock }
    }

    pub async fn execute(
        &self,
        character_id: CharacterId,
        feature_key: &str,
        value: &str,
    ) -> Result<Character, CharacterCreationError> {
        if feature_key.trim().is_empty() || value.trim().is_empty() {
            return Err(CharacterCreationError::invalid_argument(
                "feature key and value are required",
            ));
        }
        let mut character = load_character(self.characters.as_ref(), character_id).await?;
        let kind = character.record_feature_choice(feature_key, value, self.clock.now())?;
        self.characters.update(&character).await?;

        tracing::info!(
            character_id = %character_id,
            feature = %feature_key,
            kind = %kind,
            "Feature choice recorded"
        );
        Ok(character)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use charforge_domain::{
        DomainError, Feature, FeatureCategory, FeatureChoiceKind, OwnerId, RealmId,
    };

    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::MockCharacterRepo;

    fn fighter_with_style() -> Character {
        let mut c = Character::new_draft(
            OwnerId::new("user-1").unwrap(),
            RealmId::new("realm-1").unwrap(),
            Utc::now(),
        );
        c.synthesize_features([
            Feature::new("fighting-style", "Fighting Style", FeatureCategory::Class, 1, "fighter"),
            Feature::new("second-wind", "Second Wind", FeatureCategory::Class, 1, "fighter"),
        ]);
        c
    }

    fn repo_with(character: &Character) -> MockCharacterRepo {
        let mut characters = MockCharacterRepo::new();
        let stored = character.clone();
        characters
            .expect_get()
            .returning(move |_| Ok(Some(stored.clone())));
        characters
    }

    #[tokio::test]
    async fn lists_only_features_without_a_choice() {
        let character = fighter_with_style();
        let use_case = GetPendingFeatureChoices::new(Arc::new(repo_with(&character)));

        let pending = use_case.execute(character.id()).await.unwrap();

        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].feature_key, "fighting-style");
        assert_eq!(pending[0].kind, FeatureChoiceKind::FightingStyle);
        assert!(pending[0].options.contains(&"dueling".to_string()));
    }

    #[tokio::test]
    async fn records_choice_on_an_active_character() {
        let mut character = fighter_with_style();
        character.fill_missing_attributes();
        character.activate(Utc::now()).unwrap();
        let mut characters = repo_with(&character);
        characters
            .expect_update()
            .withf(|c: &Character| {
                c.feature("fighting-style")
                    .and_then(|f| f.recorded_choice())
                    == Some("defense")
            })
            .times(1)
            .returning(|_| Ok(()));
        let use_case =
            RecordFeatureChoice::new(Arc::new(characters), Arc::new(FixedClock(Utc::now())));

        let updated = use_case
            .execute(character.id(), "fighting-style", "Defense")
            .await
            .unwrap();

        assert!(updated.pending_feature_choices().is_empty());
    }

    #[tokio::test]
    async fn recorded_choice_is_not_overwritten() {
        let mut character = fighter_with_style();
        character
            .record_feature_choice("fighting-style", "archery", Utc::now())
            .unwrap();
        let mut characters = repo_with(&character);
        characters.expect_update().never();
        let use_case =
            RecordFeatureChoice::new(Arc::new(characters), Arc::new(FixedClock(Utc::now())));

        let err = use_case
            .execute(character.id(), "fighting-style", "dueling")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CharacterCreationError::Domain(DomainError::InvalidStateTransition(_))
        ));
    }

    #[tokio::test]
    async fn invalid_value_is_rejected() {
        let character = fighter_with_style();
        let mut characters = repo_with(&character);
        characters.expect_update().never();
        let use_case =
            RecordFeatureChoice::new(Arc::new(characters), Arc::new(FixedClock(Utc::now())));

        let err = use_case
            .execute(character.id(), "fighting-style", "juggling")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CharacterCreationError::Domain(DomainError::Validation(_))
        ));
    }
}
