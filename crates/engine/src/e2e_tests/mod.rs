//! End-to-end tests over a fully wired `App`.
//!
//! Everything runs in memory against the bundled rules catalog, so no
//! external services are needed:
//!
//! ```bash
//! cargo test -p charforge-engine --lib e2e_tests
//! ```

mod creation_flow;
mod e2e_helpers;
mod self_heal_props;

pub use e2e_helpers::*;
