//! In-memory state storage modules.
//!
//! Stores manage runtime state that doesn't belong in the character store:
//! - `CreationSessionStore` - in-progress creation flows (TTL expiry)

pub mod creation_session;

pub use creation_session::CreationSessionStore;
