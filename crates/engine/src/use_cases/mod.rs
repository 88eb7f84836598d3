//! Use cases - User story orchestration.
//!
//! Use cases orchestrate domain rules and ports to fulfill user stories.

pub mod character_creation;

pub use character_creation::CharacterCreationUseCases;
