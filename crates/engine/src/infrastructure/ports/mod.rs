//! Port traits for infrastructure boundaries.
//!
//! These are the only abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Character and draft storage (in-memory today, any keyed store later)
//! - The rules catalog (bundled JSON, or a remote catalog behind a cache)
//! - Creation-session bookkeeping
//! - Clock/Random (for testing)

mod error;
mod external;
mod repos;
mod session;
mod testing;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{CharacterRepo, DraftRepo};

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::RulesProvider;
pub use session::{CreationSession, CreationSessionPort};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use external::MockRulesProvider;
#[cfg(test)]
pub use repos::{MockCharacterRepo, MockDraftRepo};
#[cfg(test)]
pub use session::MockCreationSessionPort;
#[cfg(test)]
pub use testing::{MockClockPort, MockRandomPort};

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::{ClockPort, RandomPort};

// =============================================================================
// Error Types
// =============================================================================
pub use error::{RepoError, RulesError};
