//! Character-builder domain: value objects, rule definitions, the character
//! aggregates, and the pure rules that derive a playable character.
//!
//! No I/O lives here. The engine crate supplies storage and rule lookups.

extern crate self as charforge_domain;

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod ids;
pub mod rules;
pub mod value_objects;

pub use aggregates::{Character, CharacterDraft, CharacterStatus, CreationStep, FlowState};
pub use entities::{
    ChoiceEntry, ChoiceSet, Class, EquipmentCategoryListing, OptionSet, ReferenceItem, Species,
    SpeciesTrait, StartingEquipment,
};
pub use error::DomainError;
pub use ids::{CharacterId, DraftId, OwnerId, RealmId, RollId, SessionId};
pub use value_objects::*;
