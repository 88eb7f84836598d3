//! Draft lifecycle: get-or-create, start over, cancel.
//!
//! One draft per (owner, realm). A draft wraps a character in `Draft` status
//! plus the flow state; both go away together on finalize or cancel.

use std::sync::Arc;

use charforge_domain::{Character, CharacterDraft, CharacterId, OwnerId, RealmId};

use super::types::DraftView;
use super::{load_character, parse_owner_realm, require_draft, CharacterCreationError};
use crate::infrastructure::ports::{
    CharacterRepo, ClockPort, CreationSession, CreationSessionPort, DraftRepo,
};

/// Shared draft bookkeeping used by the lifecycle use cases.
struct DraftLifecycle {
    characters: Arc<dyn CharacterRepo>,
    drafts: Arc<dyn DraftRepo>,
    sessions: Arc<dyn CreationSessionPort>,
    clock: Arc<dyn ClockPort>,
}

impl DraftLifecycle {
    /// Create a fresh draft character and its wrapper.
    async fn create(
        &self,
        owner_id: OwnerId,
        realm_id: RealmId,
    ) -> Result<DraftView, CharacterCreationError> {
        let now = self.clock.now();
        let character = Character::new_draft(owner_id.clone(), realm_id.clone(), now);
        let draft = CharacterDraft::new(owner_id, realm_id, character.id(), now);

        self.characters.create(&character).await?;
        if let Err(e) = self.drafts.create(&draft).await {
            // Without a wrapper the character is unreachable; undo it.
            if let Err(cleanup) = self.characters.delete(character.id()).await {
                tracing::error!(
                    character_id = %character.id(),
                    error = %cleanup,
                    "Failed to remove draft character after draft creation failed"
                );
            }
            return Err(e.into());
        }

        self.sessions
            .put(CreationSession::start(
                draft.owner_id().clone(),
                draft.realm_id().clone(),
                character.id(),
                draft.id(),
                now,
            ))
            .await;

        tracing::info!(
            character_id = %character.id(),
            draft_id = %draft.id(),
            owner_id = %draft.owner_id(),
            realm_id = %draft.realm_id(),
            "Draft character created"
        );

        Ok(DraftView {
            character,
            draft,
            created: true,
        })
    }

    /// Remove a draft wrapper, its character if still a draft, and its session.
    async fn discard(&self, draft: &CharacterDraft) -> Result<(), CharacterCreationError> {
        let character_id = draft.character_id();
        if let Some(character) = self.characters.get(character_id).await? {
            if character.is_draft() {
                self.characters.delete(character_id).await?;
            }
        }
        self.drafts.delete(draft.id()).await?;
        self.sessions.remove(character_id).await;

        tracing::info!(
            character_id = %character_id,
            draft_id = %draft.id(),
            "Draft discarded"
        );
        Ok(())
    }
}

// =============================================================================
// Get or create
// =============================================================================

/// Return the owner's draft in a realm, creating one if there is none.
pub struct GetOrCreateDraftCharacter {
    store: DraftLifecycle,
}

impl GetOrCreateDraftCharacter {
    pub fn new(
        characters: Arc<dyn CharacterRepo>,
        drafts: Arc<dyn DraftRepo>,
        sessions: Arc<dyn CreationSessionPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            store: DraftLifecycle {
                characters,
                drafts,
                sessions,
                clock,
            },
        }
    }

    pub async fn execute(
        &self,
        owner_id: &str,
        realm_id: &str,
    ) -> Result<DraftView, CharacterCreationError> {
        let (owner_id, realm_id) = parse_owner_realm(owner_id, realm_id)?;

        if let Some(draft) = self
            .store
            .drafts
            .get_by_owner_and_realm(&owner_id, &realm_id)
            .await?
        {
            match self.store.characters.get(draft.character_id()).await? {
                Some(character) if character.is_draft() => {
                    if self.store.sessions.get(character.id()).await.is_none() {
                        self.store
                            .sessions
                            .put(CreationSession::start(
                                owner_id.clone(),
                                realm_id.clone(),
                                character.id(),
                                draft.id(),
                                self.store.clock.now(),
                            ))
                            .await;
                    }
                    tracing::debug!(
                        character_id = %character.id(),
                        draft_id = %draft.id(),
                        "Resuming existing draft"
                    );
                    return Ok(DraftView {
                        character,
                        draft,
                        created: false,
                    });
                }
                stale => {
                    tracing::warn!(
                        character_id = %draft.character_id(),
                        draft_id = %draft.id(),
                        character_exists = stale.is_some(),
                        "Draft points at a missing or finalized character, replacing it"
                    );
                    self.store.discard(&draft).await?;
                }
            }
        }

        self.store.create(owner_id, realm_id).await
    }
}

// =============================================================================
// Start over
// =============================================================================

/// Throw away any existing draft for the pair and start a fresh one.
pub struct StartNewDraft {
    store: DraftLifecycle,
}

impl StartNewDraft {
    pub fn new(
        characters: Arc<dyn CharacterRepo>,
        drafts: Arc<dyn DraftRepo>,
        sessions: Arc<dyn CreationSessionPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            store: DraftLifecycle {
                characters,
                drafts,
                sessions,
                clock,
            },
        }
    }

    pub async fn execute(
        &self,
        owner_id: &str,
        realm_id: &str,
    ) -> Result<DraftView, CharacterCreationError> {
        let (owner_id, realm_id) = parse_owner_realm(owner_id, realm_id)?;

        if let Some(stale) = self
            .store
            .drafts
            .get_by_owner_and_realm(&owner_id, &realm_id)
            .await?
        {
            self.store.discard(&stale).await?;
        }

        self.store.create(owner_id, realm_id).await
    }
}

// =============================================================================
// Cancel
// =============================================================================

/// Delete a draft character along with its wrapper and session.
pub struct CancelDraft {
    store: DraftLifecycle,
}

impl CancelDraft {
    pub fn new(
        characters: Arc<dyn CharacterRepo>,
        drafts: Arc<dyn DraftRepo>,
        sessions: Arc<dyn CreationSessionPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            store: DraftLifecycle {
                characters,
                drafts,
                sessions,
                clock,
            },
        }
    }

    pub async fn execute(&self, character_id: CharacterId) -> Result<(), CharacterCreationError> {
        let character = load_character(self.store.characters.as_ref(), character_id).await?;
        require_draft(&character, "cancel")?;

        match self.store.drafts.get_by_character_id(character_id).await? {
            Some(draft) => self.store.discard(&draft).await,
            None => {
                tracing::warn!(
                    character_id = %character_id,
                    "Draft character has no draft wrapper, deleting character only"
                );
                self.store.characters.delete(character_id).await?;
                self.store.sessions.remove(character_id).await;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use charforge_domain::{Character, CharacterDraft, OwnerId, RealmId};

    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::{
        MockCharacterRepo, MockCreationSessionPort, MockDraftRepo, RepoError,
    };

    fn owner() -> OwnerId {
        OwnerId::new("user-1").unwrap()
    }

    fn realm() -> RealmId {
        RealmId::new("realm-1").unwrap()
    }

    fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock(Utc::now()))
    }

    #[tokio::test]
    async fn when_owner_is_blank_then_invalid_argument() {
        let use_case = GetOrCreateDraftCharacter::new(
            Arc::new(MockCharacterRepo::new()),
            Arc::new(MockDraftRepo::new()),
            Arc::new(MockCreationSessionPort::new()),
            clock(),
        );

        let err = use_case.execute("  ", "realm-1").await.unwrap_err();

        assert!(matches!(err, CharacterCreationError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn when_draft_exists_then_returns_it_without_writes() {
        let character = Character::new_draft(owner(), realm(), Utc::now());
        let draft = CharacterDraft::new(owner(), realm(), character.id(), Utc::now());
        let character_id = character.id();

        let mut drafts = MockDraftRepo::new();
        let found = draft.clone();
        drafts
            .expect_get_by_owner_and_realm()
            .returning(move |_, _| Ok(Some(found.clone())));
        drafts.expect_create().never();

        let mut characters = MockCharacterRepo::new();
        let stored = character.clone();
        characters
            .expect_get()
            .withf(move |id| *id == character_id)
            .returning(move |_| Ok(Some(stored.clone())));
        characters.expect_create().never();

        let mut sessions = MockCreationSessionPort::new();
        sessions.expect_get().returning(|_| None);
        sessions.expect_put().times(1).returning(|_| ());

        let use_case = GetOrCreateDraftCharacter::new(
            Arc::new(characters),
            Arc::new(drafts),
            Arc::new(sessions),
            clock(),
        );

        let view = use_case.execute("user-1", "realm-1").await.unwrap();

        assert!(!view.created);
        assert_eq!(view.character.id(), character_id);
        assert_eq!(view.draft.id(), draft.id());
    }

    #[tokio::test]
    async fn when_no_draft_then_creates_character_and_wrapper() {
        let mut drafts = MockDraftRepo::new();
        drafts
            .expect_get_by_owner_and_realm()
            .returning(|_, _| Ok(None));
        drafts.expect_create().times(1).returning(|_| Ok(()));

        let mut characters = MockCharacterRepo::new();
        characters
            .expect_create()
            .withf(|c: &Character| c.is_draft() && c.owner_id().as_str() == "user-1")
            .times(1)
            .returning(|_| Ok(()));

        let mut sessions = MockCreationSessionPort::new();
        sessions.expect_put().times(1).returning(|_| ());

        let use_case = GetOrCreateDraftCharacter::new(
            Arc::new(characters),
            Arc::new(drafts),
            Arc::new(sessions),
            clock(),
        );

        let view = use_case.execute("user-1", "realm-1").await.unwrap();

        assert!(view.created);
        assert_eq!(view.draft.character_id(), view.character.id());
    }

    #[tokio::test]
    async fn when_wrapper_creation_fails_then_character_is_removed() {
        let mut drafts = MockDraftRepo::new();
        drafts
            .expect_get_by_owner_and_realm()
            .returning(|_, _| Ok(None));
        drafts
            .expect_create()
            .returning(|_| Err(RepoError::constraint("owner already has a draft")));

        let mut characters = MockCharacterRepo::new();
        characters.expect_create().returning(|_| Ok(()));
        characters.expect_delete().times(1).returning(|_| Ok(()));

        let mut sessions = MockCreationSessionPort::new();
        sessions.expect_put().never();

        let use_case = GetOrCreateDraftCharacter::new(
            Arc::new(characters),
            Arc::new(drafts),
            Arc::new(sessions),
            clock(),
        );

        let err = use_case.execute("user-1", "realm-1").await.unwrap_err();

        assert!(matches!(err, CharacterCreationError::Repo(_)));
    }

    #[tokio::test]
    async fn when_cancelling_active_character_then_invalid_state() {
        let mut character = Character::new_draft(owner(), realm(), Utc::now());
        character.fill_missing_attributes();
        character.activate(Utc::now()).unwrap();
        let character_id = character.id();

        let mut characters = MockCharacterRepo::new();
        characters
            .expect_get()
            .returning(move |_| Ok(Some(character.clone())));
        characters.expect_delete().never();

        let use_case = CancelDraft::new(
            Arc::new(characters),
            Arc::new(MockDraftRepo::new()),
            Arc::new(MockCreationSessionPort::new()),
            clock(),
        );

        let err = use_case.execute(character_id).await.unwrap_err();

        assert!(matches!(err, CharacterCreationError::InvalidState { .. }));
    }
}
