//! Layered application configuration.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use config::{Config, Environment, File, Map};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{favorites::DEFAULT_FAVORITES_KEY, session::BrowseOptions, storage::FileStore};

/// Directory under the user's config dir holding `config.toml`.
pub const CONFIG_DIR: &str = "nexus";
/// Configuration file name.
pub const CONFIG_FILE: &str = "config.toml";
/// Prefix for environment overrides, e.g. `NEXUS_BROWSE__SHOW_HERO=false`.
pub const ENV_PREFIX: &str = "NEXUS";

const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Nexus arcade configuration.
# Every value is optional; environment variables prefixed NEXUS_ override
# this file (use "__" between nested keys, e.g. NEXUS_BROWSE__SHOW_HERO=false).

# Directory holding persisted values such as favorites.
# storage_root = "/path/to/storage"

# Storage key for the favorites list.
# favorites_key = "nexus-favorites"

# Directory for nexus.log (defaults to ./logs).
# log_dir = "/path/to/logs"

[browse]
# "title" or "title_and_description"
# search_fields = "title_and_description"
# show_featured_badge = true
# show_hero = true
# show_how_to_play = true
# hero_game_id = "5"
# related_limit = 6
"#;

/// Runtime configuration for the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root directory of the file-backed key-value store.
    pub storage_root: PathBuf,
    /// Key the favorites list is stored under.
    pub favorites_key: String,
    /// Directory receiving log files; `None` means `./logs`.
    pub log_dir: Option<PathBuf>,
    /// Variant switches for the browse session.
    pub browse: BrowseOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_root: FileStore::default_root(),
            favorites_key: DEFAULT_FAVORITES_KEY.to_string(),
            log_dir: None,
            browse: BrowseOptions::default(),
        }
    }
}

impl AppConfig {
    /// Load from the default file location plus environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from `path` (optional) plus environment overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_layered(path.as_ref(), None)
    }

    /// `env` replaces the process environment when given.
    fn load_layered(path: &Path, env: Option<Map<String, String>>) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .source(env),
            )
            .build()
            .with_context(|| format!("failed to read configuration {}", path.display()))?;
        let config: AppConfig = settings
            .try_deserialize()
            .with_context(|| format!("invalid configuration in {}", path.display()))?;
        Ok(config)
    }

    /// Directory for log files.
    pub fn log_dir(&self) -> Result<PathBuf> {
        match &self.log_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(std::env::current_dir()
                .context("failed to resolve working directory")?
                .join("logs")),
        }
    }
}

/// `<config dir>/nexus/config.toml`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(CONFIG_FILE)
}

/// Write the commented template to the default location if nothing is there.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = default_config_path();
    write_default_config(&path)?;
    Ok(path)
}

/// Write the commented template to `path` unless the file already exists.
pub fn write_default_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG_TEMPLATE)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "Wrote default configuration");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::SearchFields;
    use tempfile::tempdir;

    /// Load with an empty environment so tests don't see each other's variables.
    fn load_isolated(path: &Path) -> Result<AppConfig> {
        AppConfig::load_layered(path, Some(Map::new()))
    }

    #[test]
    fn missing_file_yields_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = load_isolated(&dir.path().join("absent.toml"))?;
        assert_eq!(config.favorites_key, DEFAULT_FAVORITES_KEY);
        assert_eq!(config.browse, BrowseOptions::default());
        Ok(())
    }

    #[test]
    fn template_parses_to_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nexus").join(CONFIG_FILE);
        assert!(write_default_config(&path)?);
        assert!(!write_default_config(&path)?);

        let config = load_isolated(&path)?;
        assert_eq!(config.browse, BrowseOptions::default());
        Ok(())
    }

    #[test]
    fn file_values_override_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"
favorites_key = "my-favs"
storage_root = "/tmp/nexus-store"

[browse]
search_fields = "title"
show_hero = false
related_limit = 3
"#,
        )?;

        let config = load_isolated(&path)?;
        assert_eq!(config.favorites_key, "my-favs");
        assert_eq!(config.storage_root, PathBuf::from("/tmp/nexus-store"));
        assert_eq!(config.browse.search_fields, SearchFields::Title);
        assert!(!config.browse.show_hero);
        assert!(config.browse.show_featured_badge);
        assert_eq!(config.browse.related_limit, 3);
        assert_eq!(config.browse.hero_game_id, "5");
        Ok(())
    }

    fn env(pairs: &[(&str, &str)]) -> Map<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn environment_overrides_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::load_layered(
            &dir.path().join("absent.toml"),
            Some(env(&[
                ("NEXUS_BROWSE__SHOW_HERO", "false"),
                ("NEXUS_BROWSE__RELATED_LIMIT", "2"),
                ("NEXUS_FAVORITES_KEY", "env-key"),
                ("OTHER_FAVORITES_KEY", "ignored"),
            ])),
        )?;
        assert!(!config.browse.show_hero);
        assert_eq!(config.browse.related_limit, 2);
        assert_eq!(config.favorites_key, "env-key");
        assert!(config.browse.show_featured_badge);
        Ok(())
    }

    #[test]
    fn environment_wins_over_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "favorites_key = \"from-file\"\n[browse]\nshow_hero = true\n")?;

        let config = AppConfig::load_layered(
            &path,
            Some(env(&[
                ("NEXUS_FAVORITES_KEY", "from-env"),
                ("NEXUS_BROWSE__SHOW_HERO", "false"),
            ])),
        )?;
        assert_eq!(config.favorites_key, "from-env");
        assert!(!config.browse.show_hero);
        Ok(())
    }

    #[test]
    fn process_environment_is_read() -> Result<()> {
        const VAR: &str = "NEXUS_BROWSE__HERO_GAME_ID";
        let dir = tempdir()?;
        let previous = std::env::var_os(VAR);
        std::env::set_var(VAR, "7");
        let loaded = AppConfig::load_from(dir.path().join("absent.toml"));
        match previous {
            Some(value) => std::env::set_var(VAR, value),
            None => std::env::remove_var(VAR),
        }
        assert_eq!(loaded?.browse.hero_game_id, "7");
        Ok(())
    }

    #[test]
    fn invalid_values_are_reported() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[browse]\nsearch_fields = \"everything\"\n")?;
        assert!(load_isolated(&path).is_err());
        Ok(())
    }
}
