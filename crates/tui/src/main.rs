mod app;

use std::{
    fs::{self, OpenOptions},
    path::Path,
    sync::Mutex,
};

use anyhow::{Context, Result};
use nexus_core::{
    config::{self, AppConfig},
    BrowseSession, Catalog, FavoritesManager, FileStore,
};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = config::ensure_default_config()?;
    let config = AppConfig::load_from(&config_path)?;
    init_logging(&config.log_dir()?)?;
    tracing::info!(config = %config_path.display(), "Configuration loaded");

    let store = FileStore::new(config.storage_root.clone());
    let favorites = FavoritesManager::with_key(store, config.favorites_key.clone());
    let session = BrowseSession::new(Catalog::builtin(), favorites, config.browse.clone());

    let mut app = app::NexusApp::new(session);
    app.run().await
}

fn init_logging(log_dir: &Path) -> Result<()> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create {}", log_dir.display()))?;
    let log_path = log_dir.join("nexus.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open {}", log_path.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // The terminal owns stdout, so logs only go to the file.
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Mutex::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
