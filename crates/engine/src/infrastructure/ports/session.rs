//! Creation-session port.
//!
//! A creation session is short-lived bookkeeping for an in-progress creation
//! flow, separate from the persisted draft. Sessions expire on their own.

use async_trait::async_trait;
use charforge_domain::{CharacterId, CreationStep, DraftId, OwnerId, RealmId, SessionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreationSession {
    pub id: SessionId,
    pub owner_id: OwnerId,
    pub realm_id: RealmId,
    pub character_id: CharacterId,
    pub draft_id: DraftId,
    pub current_step: CreationStep,
    pub started_at: DateTime<Utc>,
}

impl CreationSession {
    pub fn start(
        owner_id: OwnerId,
        realm_id: RealmId,
        character_id: CharacterId,
        draft_id: DraftId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: SessionId::new(),
            owner_id,
            realm_id,
            character_id,
            draft_id,
            current_step: CreationStep::Species,
            started_at: now,
        }
    }
}

/// Expiring storage for creation sessions, keyed by character.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CreationSessionPort: Send + Sync {
    /// Insert or replace the session and restart its expiry.
    async fn put(&self, session: CreationSession);
    /// Live session for the character. Expired sessions are purged here.
    async fn get(&self, character_id: CharacterId) -> Option<CreationSession>;
    async fn remove(&self, character_id: CharacterId) -> Option<CreationSession>;
    /// Purge every expired session, returning how many were removed.
    async fn cleanup_expired(&self) -> usize;
}
