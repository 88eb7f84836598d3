//! Character creation errors.

use charforge_domain::{CharacterId, DomainError};

use serde::Serialize;

use crate::infrastructure::ports::{RepoError, RulesError};

/// Coarse classification callers use to decide how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed input or a missing identifier. Never retried.
    InvalidArgument,
    /// Unknown character, draft, or rule key.
    NotFound,
    /// The character is not in a state that allows the operation.
    InvalidState,
    /// Storage or catalog failure.
    Internal,
}

#[derive(Debug, thiserror::Error)]
pub enum CharacterCreationError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Character not found: {0}")]
    CharacterNotFound(CharacterId),

    #[error("No draft for character: {0}")]
    DraftNotFound(CharacterId),

    #[error("Unknown {kind}: {key}")]
    RuleNotFound { kind: &'static str, key: String },

    #[error("Invalid state for {operation} on character {character_id}: {reason}")]
    InvalidState {
        operation: &'static str,
        character_id: CharacterId,
        reason: String,
    },

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),

    #[error("Rules error: {0}")]
    Rules(RulesError),
}

impl From<RulesError> for CharacterCreationError {
    fn from(err: RulesError) -> Self {
        match err {
            RulesError::NotFound { kind, key } => Self::RuleNotFound { kind, key },
            other => Self::Rules(other),
        }
    }
}

impl CharacterCreationError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::CharacterNotFound(_) | Self::DraftNotFound(_) | Self::RuleNotFound { .. } => {
                ErrorKind::NotFound
            }
            Self::InvalidState { .. } => ErrorKind::InvalidState,
            Self::Domain(err) => match err {
                DomainError::Validation(_) | DomainError::Parse(_) => ErrorKind::InvalidArgument,
                DomainError::NotFound { .. } => ErrorKind::NotFound,
                DomainError::InvalidStateTransition(_) | DomainError::Constraint(_) => {
                    ErrorKind::InvalidState
                }
            },
            Self::Repo(err) if err.is_not_found() => ErrorKind::NotFound,
            Self::Repo(_) | Self::Rules(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_lookups_that_miss_are_not_found() {
        let err = CharacterCreationError::from(RulesError::not_found("Class", "artificer"));
        assert!(matches!(err, CharacterCreationError::RuleNotFound { .. }));
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "Unknown Class: artificer");
    }

    #[test]
    fn catalog_outage_is_internal() {
        let err = CharacterCreationError::from(RulesError::Unavailable("timeout".into()));
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn domain_errors_map_onto_the_taxonomy() {
        let cases = [
            (DomainError::validation("bad"), ErrorKind::InvalidArgument),
            (DomainError::parse("bad"), ErrorKind::InvalidArgument),
            (DomainError::not_found("Feature", "x"), ErrorKind::NotFound),
            (
                DomainError::invalid_state_transition("active"),
                ErrorKind::InvalidState,
            ),
        ];
        for (domain, kind) in cases {
            assert_eq!(CharacterCreationError::from(domain).kind(), kind);
        }
    }
}
