//! Configuration management for daggers

pub mod schema;

pub use schema::Config;

use crate::error::{DaggersError, DaggersResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Project-local config file name
pub const LOCAL_CONFIG_FILE: &str = ".daggers.toml";

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("daggers")
            .join("config.toml")
    }

    /// Directory caching files downloaded into containers
    pub fn download_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("daggers")
            .join("downloads")
    }

    /// Find the nearest `.daggers.toml` in `start` or its ancestors
    ///
    /// `start` is resolved first, so a relative path walks the directory's
    /// real parents rather than stopping at the current directory.
    pub fn find_local_config(start: &Path) -> Option<PathBuf> {
        let start = match start.canonicalize() {
            Ok(dir) => dir,
            Err(e) => {
                debug!("Skipping local config lookup from {}: {}", start.display(), e);
                return None;
            }
        };
        start
            .ancestors()
            .map(|dir| dir.join(LOCAL_CONFIG_FILE))
            .find(|candidate| candidate.is_file())
    }

    /// Load configuration, using defaults if the file does not exist
    pub async fn load(&self) -> DaggersResult<Config> {
        self.load_merged(None).await
    }

    /// Load the global file with `local` merged over it
    ///
    /// Tables merge key by key; any other value in `local` replaces the
    /// global one.
    pub async fn load_merged(&self, local: Option<&Path>) -> DaggersResult<Config> {
        let mut merged = if self.config_path.exists() {
            Self::read_value(&self.config_path).await?
        } else {
            debug!("Config file not found, using defaults");
            toml::Value::Table(toml::map::Map::new())
        };

        if let Some(path) = local {
            debug!("Merging local config {}", path.display());
            let overlay = Self::read_value(path).await?;
            merge_values(&mut merged, overlay);
        }

        merged.try_into().map_err(|e: toml::de::Error| DaggersError::ConfigInvalid {
            path: local.unwrap_or(&self.config_path).to_path_buf(),
            reason: e.to_string(),
        })
    }

    async fn read_value(path: &Path) -> DaggersResult<toml::Value> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| DaggersError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| DaggersError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
