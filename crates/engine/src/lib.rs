//! Charforge Engine library.
//!
//! Character creation for a 5e-style rules set: drafts, step-by-step updates,
//! and finalization into a playable character.
//!
//! ## Structure
//!
//! - `use_cases/` - User story orchestration over the domain rules
//! - `infrastructure/` - Ports plus adapters (rules catalog, cache, storage, config)
//! - `stores/` - Expiring in-memory stores
//! - `api/` - Line-delimited JSON entry point
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod stores;
pub mod use_cases;

/// End-to-end tests over the in-memory adapters and the bundled catalog.
#[cfg(test)]
mod e2e_tests;

pub use app::App;
