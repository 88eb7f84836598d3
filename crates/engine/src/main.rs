//! Charforge Engine - Main entry point.
//!
//! Reads JSON requests from stdin, one per line, and writes one response line
//! per request to stdout. Logs go to stderr.

use std::sync::Arc;

use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use charforge_engine::api;
use charforge_engine::infrastructure::config::EngineConfig;
use charforge_engine::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the binary may run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "charforge_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Charforge Engine");

    let config = EngineConfig::from_env();
    let app = Arc::new(App::from_config(&config).await?);

    // Spawn expiry sweeper
    let cleanup_app = app.clone();
    let cleanup_interval = config.session_cleanup_interval;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(cleanup_interval);
        loop {
            interval.tick().await;
            let (sessions, rules) = cleanup_app.cleanup_expired().await;
            if sessions > 0 || rules > 0 {
                tracing::debug!(sessions, rules, "Expired entries purged");
            }
        }
    });

    let stdin = BufReader::new(tokio::io::stdin());
    api::serve(app, stdin, tokio::io::stdout()).await?;

    tracing::info!("Input closed, shutting down");
    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
