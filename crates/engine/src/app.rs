//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    cached_rules::CachedRulesProvider,
    clock::{SystemClock, SystemRandom},
    config::EngineConfig,
    memory::{InMemoryCharacterRepo, InMemoryDraftRepo},
    ports::{
        CharacterRepo, ClockPort, CreationSessionPort, DraftRepo, RandomPort, RulesError,
        RulesProvider,
    },
    rules_catalog::JsonRulesCatalog,
};
use crate::stores::CreationSessionStore;
use crate::use_cases::character_creation::{
    CancelDraft, CharacterCreationUseCases, FinalizeDraftCharacter, GetOrCreateDraftCharacter,
    GetPendingFeatureChoices, ListCategoryOptions, RecordFeatureChoice, ResolveChoices,
    RollAbilityScores, StartNewDraft, UpdateDraftCharacter,
};

/// Main application state.
///
/// Holds the repositories, the use cases built on them, and the expiring
/// stores that need periodic cleanup.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
    pub sessions: Arc<CreationSessionStore>,
    pub rules_cache: Arc<CachedRulesProvider>,
}

/// Container for the storage and catalog ports.
pub struct Repositories {
    pub character: Arc<dyn CharacterRepo>,
    pub draft: Arc<dyn DraftRepo>,
    pub rules: Arc<dyn RulesProvider>,
}

/// Container for all use cases.
pub struct UseCases {
    pub character_creation: CharacterCreationUseCases,
}

impl App {
    /// Build the app from configuration: the rules catalog (bundled unless a
    /// path is configured) behind a TTL cache, with in-memory storage.
    pub async fn from_config(config: &EngineConfig) -> Result<Self, RulesError> {
        let catalog = match &config.rules_catalog_path {
            Some(path) => {
                tracing::info!(path = %path.display(), "Loading rules catalog");
                JsonRulesCatalog::load(path).await?
            }
            None => JsonRulesCatalog::bundled()?,
        };
        tracing::info!(
            species = catalog.species_keys().len(),
            classes = catalog.class_keys().len(),
            "Rules catalog ready"
        );

        Ok(Self::new(
            Arc::new(catalog),
            Arc::new(InMemoryCharacterRepo::new()),
            Arc::new(InMemoryDraftRepo::new()),
            config,
            Arc::new(SystemClock::new()),
            Arc::new(SystemRandom::new()),
        ))
    }

    /// Create a new App with all dependencies wired up.
    pub fn new(
        catalog: Arc<dyn RulesProvider>,
        character_repo: Arc<dyn CharacterRepo>,
        draft_repo: Arc<dyn DraftRepo>,
        config: &EngineConfig,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        let rules_cache = Arc::new(CachedRulesProvider::new(catalog, config.rules_cache_ttl));
        let rules: Arc<dyn RulesProvider> = rules_cache.clone();
        let sessions = Arc::new(CreationSessionStore::new(config.session_ttl));
        let session_port: Arc<dyn CreationSessionPort> = sessions.clone();

        let character_creation = CharacterCreationUseCases::new(
            Arc::new(GetOrCreateDraftCharacter::new(
                character_repo.clone(),
                draft_repo.clone(),
                session_port.clone(),
                clock.clone(),
            )),
            Arc::new(StartNewDraft::new(
                character_repo.clone(),
                draft_repo.clone(),
                session_port.clone(),
                clock.clone(),
            )),
            Arc::new(CancelDraft::new(
                character_repo.clone(),
                draft_repo.clone(),
                session_port.clone(),
                clock.clone(),
            )),
            Arc::new(UpdateDraftCharacter::new(
                character_repo.clone(),
                draft_repo.clone(),
                rules.clone(),
                session_port.clone(),
                clock.clone(),
            )),
            Arc::new(RollAbilityScores::new(
                character_repo.clone(),
                draft_repo.clone(),
                session_port.clone(),
                random,
                clock.clone(),
            )),
            Arc::new(FinalizeDraftCharacter::new(
                character_repo.clone(),
                draft_repo.clone(),
                rules.clone(),
                session_port,
                clock.clone(),
            )),
            Arc::new(ResolveChoices::new(rules.clone())),
            Arc::new(ListCategoryOptions::new(rules.clone())),
            Arc::new(GetPendingFeatureChoices::new(character_repo.clone())),
            Arc::new(RecordFeatureChoice::new(character_repo.clone(), clock)),
        );

        Self {
            repositories: Repositories {
                character: character_repo,
                draft: draft_repo,
                rules,
            },
            use_cases: UseCases { character_creation },
            sessions,
            rules_cache,
        }
    }

    /// Purge expired creation sessions and cached rule lookups.
    pub async fn cleanup_expired(&self) -> (usize, usize) {
        let sessions = self.sessions.cleanup_expired().await;
        let rules = self.rules_cache.cleanup_expired().await;
        (sessions, rules)
    }
}
