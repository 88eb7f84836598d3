//! In-memory repository adapters.
//!
//! Process-local storage for characters and drafts. Each store is owned by the
//! `App` that builds it; nothing here is global.

use async_trait::async_trait;
use charforge_domain::{Character, CharacterDraft, CharacterId, DraftId, OwnerId, RealmId};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::infrastructure::ports::{CharacterRepo, DraftRepo, RepoError};

// =============================================================================
// Characters
// =============================================================================

#[derive(Default)]
pub struct InMemoryCharacterRepo {
    characters: DashMap<CharacterId, Character>,
}

impl InMemoryCharacterRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CharacterRepo for InMemoryCharacterRepo {
    async fn create(&self, character: &Character) -> Result<(), RepoError> {
        match self.characters.entry(character.id()) {
            Entry::Occupied(_) => Err(RepoError::constraint(format!(
                "character {} already exists",
                character.id()
            ))),
            Entry::Vacant(slot) => {
                slot.insert(character.clone());
                Ok(())
            }
        }
    }

    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError> {
        Ok(self.characters.get(&id).map(|c| c.value().clone()))
    }

    async fn update(&self, character: &Character) -> Result<(), RepoError> {
        match self.characters.get_mut(&character.id()) {
            Some(mut stored) => {
                *stored = character.clone();
                Ok(())
            }
            None => Err(RepoError::not_found("Character", character.id())),
        }
    }

    async fn delete(&self, id: CharacterId) -> Result<(), RepoError> {
        self.characters
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepoError::not_found("Character", id))
    }

    async fn get_by_owner(&self, owner_id: &OwnerId) -> Result<Vec<Character>, RepoError> {
        let mut found: Vec<Character> = self
            .characters
            .iter()
            .filter(|c| c.owner_id() == owner_id)
            .map(|c| c.value().clone())
            .collect();
        found.sort_by_key(|c| c.created_at());
        Ok(found)
    }

    async fn get_by_owner_and_realm(
        &self,
        owner_id: &OwnerId,
        realm_id: &RealmId,
    ) -> Result<Vec<Character>, RepoError> {
        let mut found: Vec<Character> = self
            .characters
            .iter()
            .filter(|c| c.owner_id() == owner_id && c.realm_id() == realm_id)
            .map(|c| c.value().clone())
            .collect();
        found.sort_by_key(|c| c.created_at());
        Ok(found)
    }
}

// =============================================================================
// Drafts
// =============================================================================

/// Drafts plus an (owner, realm) index that enforces one draft per pair.
#[derive(Default)]
pub struct InMemoryDraftRepo {
    drafts: DashMap<DraftId, CharacterDraft>,
    by_owner_realm: DashMap<(OwnerId, RealmId), DraftId>,
}

impl InMemoryDraftRepo {
    pub fn new() -> Self {
        Self::default()
    }

    fn owner_key(draft: &CharacterDraft) -> (OwnerId, RealmId) {
        (draft.owner_id().clone(), draft.realm_id().clone())
    }
}

#[async_trait]
impl DraftRepo for InMemoryDraftRepo {
    async fn create(&self, draft: &CharacterDraft) -> Result<(), RepoError> {
        match self.by_owner_realm.entry(Self::owner_key(draft)) {
            Entry::Occupied(existing) => Err(RepoError::constraint(format!(
                "owner {} already has draft {} in realm {}",
                draft.owner_id(),
                existing.get(),
                draft.realm_id()
            ))),
            Entry::Vacant(slot) => {
                slot.insert(draft.id());
                self.drafts.insert(draft.id(), draft.clone());
                Ok(())
            }
        }
    }

    async fn get(&self, id: DraftId) -> Result<Option<CharacterDraft>, RepoError> {
        Ok(self.drafts.get(&id).map(|d| d.value().clone()))
    }

    async fn update(&self, draft: &CharacterDraft) -> Result<(), RepoError> {
        match self.drafts.get_mut(&draft.id()) {
            Some(mut stored) => {
                *stored = draft.clone();
                Ok(())
            }
            None => Err(RepoError::not_found("Draft", draft.id())),
        }
    }

    async fn delete(&self, id: DraftId) -> Result<(), RepoError> {
        let (_, draft) = self
            .drafts
            .remove(&id)
            .ok_or_else(|| RepoError::not_found("Draft", id))?;
        self.by_owner_realm
            .remove_if(&Self::owner_key(&draft), |_, indexed| *indexed == id);
        Ok(())
    }

    async fn get_by_owner_and_realm(
        &self,
        owner_id: &OwnerId,
        realm_id: &RealmId,
    ) -> Result<Option<CharacterDraft>, RepoError> {
        let Some(id) = self
            .by_owner_realm
            .get(&(owner_id.clone(), realm_id.clone()))
            .map(|id| *id.value())
        else {
            return Ok(None);
        };
        Ok(self.drafts.get(&id).map(|d| d.value().clone()))
    }

    async fn get_by_character_id(
        &self,
        character_id: CharacterId,
    ) -> Result<Option<CharacterDraft>, RepoError> {
        Ok(self
            .drafts
            .iter()
            .find(|d| d.character_id() == character_id)
            .map(|d| d.value().clone()))
    }
}
