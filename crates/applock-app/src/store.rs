//! Config repositories - TOML-file-backed and in-memory

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use applock_core::prelude::*;
use applock_core::{AppLockConfig, AppLockConfigRepository, Error};

const CONFIG_FILENAME: &str = "applock.toml";

/// File-backed repository persisting the config as TOML.
///
/// The file is read once at construction; a missing or unparsable file
/// falls back to defaults. `set_config` writes through to disk, last write
/// wins. Both the settings UI and the coordinator's auto-disable path share
/// one instance so reads always see the latest write.
pub struct TomlConfigRepository {
    path: PathBuf,
    cached: Mutex<AppLockConfig>,
}

impl TomlConfigRepository {
    /// Repository rooted at the platform data directory
    /// (`<data_local_dir>/applock/applock.toml`).
    pub fn new() -> Self {
        let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::at_path(base.join("applock").join(CONFIG_FILENAME))
    }

    /// Repository backed by an explicit file path.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let config = load_config(&path);
        Self {
            path,
            cached: Mutex::new(config),
        }
    }

    fn save(&self, config: &AppLockConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(config).map_err(|e| Error::ConfigSerialize(e.to_string()))?;
        std::fs::write(&self.path, content)?;
        debug!("Saved app lock config to {:?}", self.path);
        Ok(())
    }
}

impl Default for TomlConfigRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl AppLockConfigRepository for TomlConfigRepository {
    fn get_config(&self) -> AppLockConfig {
        *self
            .cached
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn set_config(&self, config: AppLockConfig) {
        *self
            .cached
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = config;

        // The contract is last-write-wins without failure propagation; a
        // write error leaves the in-memory config authoritative for this
        // process.
        if let Err(e) = self.save(&config) {
            warn!("Failed to persist app lock config: {e}");
        }
    }
}

fn load_config(path: &Path) -> AppLockConfig {
    if !path.exists() {
        debug!("No config file at {:?}, using defaults", path);
        return AppLockConfig::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                debug!("Loaded app lock config from {:?}", path);
                config
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", path, e);
                AppLockConfig::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", path, e);
            AppLockConfig::default()
        }
    }
}

/// In-memory repository for tests and hosts that manage persistence
/// themselves.
pub struct MemoryConfigRepository {
    config: Mutex<AppLockConfig>,
}

impl MemoryConfigRepository {
    pub fn new(config: AppLockConfig) -> Self {
        Self {
            config: Mutex::new(config),
        }
    }
}

impl Default for MemoryConfigRepository {
    fn default() -> Self {
        Self::new(AppLockConfig::default())
    }
}

impl AppLockConfigRepository for MemoryConfigRepository {
    fn get_config(&self) -> AppLockConfig {
        *self
            .config
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn set_config(&self, config: AppLockConfig) {
        *self
            .config
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = config;
    }
}
