//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod cache;
pub mod cached_rules;
pub mod clock;
pub mod config;
pub mod memory;
pub mod ports;
pub mod rules_catalog;
