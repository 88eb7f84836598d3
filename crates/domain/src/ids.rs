use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            pub fn to_uuid(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

// Character lifecycle IDs
define_id!(CharacterId);
define_id!(DraftId);

// Creation-session bookkeeping
define_id!(SessionId);

/// Identity of a single rolled ability value.
///
/// Rolls keep this identity no matter which ability they end up assigned to,
/// so reassigning is a pure remapping of ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RollId(String);

impl RollId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RollId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RollId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RollId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Identifiers handed to us by the hosting platform (user and realm/guild ids).
///
/// They are opaque strings; the only rule is that they are present.
macro_rules! define_external_id {
    ($name:ident, $label:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
                let id = id.into();
                let trimmed = id.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::validation(concat!($label, " is required")));
                }
                Ok(Self(trimmed.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = DomainError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }
    };
}

define_external_id!(OwnerId, "owner id");
define_external_id!(RealmId, "realm id");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_ids_are_trimmed() {
        let owner = OwnerId::new("  user-1 ").unwrap();
        assert_eq!(owner.as_str(), "user-1");
    }

    #[test]
    fn empty_external_id_rejected() {
        let err = RealmId::new("   ").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(err.to_string().contains("realm id is required"));
    }

    #[test]
    fn external_id_deserialization_validates() {
        let result: Result<OwnerId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn uuid_ids_roundtrip_through_display() {
        let id = CharacterId::new();
        let parsed = CharacterId::from_uuid(Uuid::parse_str(&id.to_string()).unwrap());
        assert_eq!(id, parsed);
    }
}
