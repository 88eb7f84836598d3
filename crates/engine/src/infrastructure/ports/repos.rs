//! Repository port traits for character storage.

use async_trait::async_trait;
use charforge_domain::{Character, CharacterDraft, CharacterId, DraftId, OwnerId, RealmId};

use super::error::RepoError;

// =============================================================================
// Characters
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterRepo: Send + Sync {
    /// Store a new character. Fails with `ConstraintViolation` if the id is taken.
    async fn create(&self, character: &Character) -> Result<(), RepoError>;
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError>;
    /// Replace a stored character. Fails with `NotFound` if it does not exist.
    async fn update(&self, character: &Character) -> Result<(), RepoError>;
    async fn delete(&self, id: CharacterId) -> Result<(), RepoError>;

    // Queries
    async fn get_by_owner(&self, owner_id: &OwnerId) -> Result<Vec<Character>, RepoError>;
    async fn get_by_owner_and_realm(
        &self,
        owner_id: &OwnerId,
        realm_id: &RealmId,
    ) -> Result<Vec<Character>, RepoError>;
}

// =============================================================================
// Drafts
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DraftRepo: Send + Sync {
    /// Store a new draft. At most one draft may exist per (owner, realm).
    async fn create(&self, draft: &CharacterDraft) -> Result<(), RepoError>;
    async fn get(&self, id: DraftId) -> Result<Option<CharacterDraft>, RepoError>;
    async fn update(&self, draft: &CharacterDraft) -> Result<(), RepoError>;
    async fn delete(&self, id: DraftId) -> Result<(), RepoError>;

    // Queries
    async fn get_by_owner_and_realm(
        &self,
        owner_id: &OwnerId,
        realm_id: &RealmId,
    ) -> Result<Option<CharacterDraft>, RepoError>;
    async fn get_by_character_id(
        &self,
        character_id: CharacterId,
    ) -> Result<Option<CharacterDraft>, RepoError>;
}
