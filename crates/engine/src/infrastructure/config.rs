//! Engine configuration from environment variables.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SESSION_TTL_SECS: u64 = 1800;
pub const DEFAULT_RULES_CACHE_TTL_SECS: u64 = 3600;
pub const DEFAULT_SESSION_CLEANUP_INTERVAL_SECS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Rules catalog JSON file. `None` uses the bundled sample catalog.
    pub rules_catalog_path: Option<PathBuf>,
    pub session_ttl: Duration,
    pub rules_cache_ttl: Duration,
    pub session_cleanup_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rules_catalog_path: None,
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            rules_cache_ttl: Duration::from_secs(DEFAULT_RULES_CACHE_TTL_SECS),
            session_cleanup_interval: Duration::from_secs(DEFAULT_SESSION_CLEANUP_INTERVAL_SECS),
        }
    }
}

impl EngineConfig {
    /// Read configuration from the process environment.
    ///
    /// Call after the `.env` files have been loaded.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from any variable source. Unparseable numbers fall
    /// back to their defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let rules_catalog_path = lookup("RULES_CATALOG_PATH")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        Self {
            rules_catalog_path,
            session_ttl: secs(&lookup, "CREATION_SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS),
            rules_cache_ttl: secs(&lookup, "RULES_CACHE_TTL_SECS", DEFAULT_RULES_CACHE_TTL_SECS),
            session_cleanup_interval: secs(
                &lookup,
                "SESSION_CLEANUP_INTERVAL_SECS",
                DEFAULT_SESSION_CLEANUP_INTERVAL_SECS,
            ),
        }
    }
}

fn secs(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: u64) -> Duration {
    let Some(raw) = lookup(name) else {
        return Duration::from_secs(default);
    };
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => Duration::from_secs(value),
        _ => {
            tracing::warn!(
                variable = name,
                value = %raw,
                default,
                "Invalid duration in environment, using default"
            );
            Duration::from_secs(default)
        }
    }
}
