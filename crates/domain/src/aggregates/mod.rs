//! Aggregate roots - domain objects that own their related data
//!
//! Each aggregate:
//! - Has a unique identity
//! - Owns all its constituent parts (enforced by Rust ownership)
//! - Exposes behavior through methods, not public fields
//! - Reports what a mutation skipped or changed through its return value

pub mod character;
pub mod draft;

pub use character::{Character, CharacterStatus};
pub use draft::{CharacterDraft, CreationStep, FlowState};
