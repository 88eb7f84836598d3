//! Creation-session storage for runtime state.
//!
//! TTL-based cache of in-progress creation flows keyed by character.
//! Sessions expire after the configured TTL (30 minutes by default) unless
//! the flow touches them again.

use std::time::Duration;

use async_trait::async_trait;
use charforge_domain::CharacterId;

use crate::infrastructure::cache::TtlCache;
use crate::infrastructure::config::DEFAULT_SESSION_TTL_SECS;
use crate::infrastructure::ports::{CreationSession, CreationSessionPort};

pub struct CreationSessionStore {
    inner: TtlCache<CharacterId, CreationSession>,
}

impl CreationSessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: TtlCache::new(ttl),
        }
    }

    /// Number of stored sessions, including expired ones not yet purged.
    pub async fn len(&self) -> usize {
        self.inner.len().await
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.is_empty().await
    }
}

impl Default for CreationSessionStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_SESSION_TTL_SECS))
    }
}

#[async_trait]
impl CreationSessionPort for CreationSessionStore {
    async fn put(&self, session: CreationSession) {
        self.inner.insert(session.character_id, session).await;
    }

    async fn get(&self, character_id: CharacterId) -> Option<CreationSession> {
        self.inner.get(&character_id).await
    }

    async fn remove(&self, character_id: CharacterId) -> Option<CreationSession> {
        self.inner.remove(&character_id).await
    }

    async fn cleanup_expired(&self) -> usize {
        self.inner.cleanup_expired().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charforge_domain::{CreationStep, DraftId, OwnerId, RealmId};
    use chrono::Utc;

    fn session() -> CreationSession {
        CreationSession::start(
            OwnerId::new("user-1").unwrap(),
            RealmId::new("realm-1").unwrap(),
            CharacterId::new(),
            DraftId::new(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn put_get_remove() {
        let store = CreationSessionStore::default();
        let session = session();
        let character_id = session.character_id;

        store.put(session.clone()).await;
        assert_eq!(store.get(character_id).await, Some(session.clone()));

        assert_eq!(store.remove(character_id).await, Some(session));
        assert_eq!(store.get(character_id).await, None);
    }

    #[tokio::test]
    async fn put_replaces_existing_session() {
        let store = CreationSessionStore::default();
        let mut session = session();
        store.put(session.clone()).await;

        session.current_step = CreationStep::Equipment;
        store.put(session.clone()).await;

        let stored = store.get(session.character_id).await.unwrap();
        assert_eq!(stored.current_step, CreationStep::Equipment);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn expired_sessions_are_gone() {
        let store = CreationSessionStore::new(Duration::ZERO);
        let first = session();
        let second = session();
        store.put(first.clone()).await;
        store.put(second.clone()).await;

        assert_eq!(store.get(first.character_id).await, None);
        assert_eq!(store.cleanup_expired().await, 1);
        assert!(store.is_empty().await);
    }
}
