//! API layer - the line-delimited JSON entry point.

pub mod error_sanitizer;
pub mod jsonl;

pub use jsonl::serve;
