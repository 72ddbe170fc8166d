//! Configuration service backed by `config.toml`.

use std::path::{Path, PathBuf};

use festcard_core::config::RootConfig;
use festcard_core::error::Result;
use version_migrate::{FileStorage, FileStorageStrategy, FormatStrategy, LoadBehavior};

use crate::dto::create_config_root_migrator;
use crate::paths::{FestPaths, ServiceType};

const CONFIG_ENTITY: &str = "config_root";

/// Loads and saves `RootConfig`.
///
/// A missing file is created and seeded with defaults on first load.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// `base_path` overrides the config directory.
    pub fn new(base_path: Option<&Path>) -> Result<Self> {
        let path = FestPaths::new(base_path).get_path(ServiceType::Config)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn storage(&self) -> Result<FileStorage> {
        let strategy = FileStorageStrategy::new()
            .with_format(FormatStrategy::Toml)
            .with_load_behavior(LoadBehavior::CreateIfMissing);
        Ok(FileStorage::new(
            self.path.clone(),
            create_config_root_migrator(),
            strategy,
        )?)
    }

    /// Reads the configuration, writing defaults if nothing is stored yet.
    pub fn load(&self) -> Result<RootConfig> {
        let mut storage = self.storage()?;
        let configs: Vec<RootConfig> = storage.query(CONFIG_ENTITY)?;

        match configs.into_iter().next() {
            Some(config) => Ok(config),
            None => {
                let default_config = RootConfig::default();
                tracing::info!(
                    "[ConfigService] writing default config to {}",
                    self.path.display()
                );
                storage.update_and_save(CONFIG_ENTITY, vec![default_config.clone()])?;
                Ok(default_config)
            }
        }
    }

    pub fn save(&self, config: &RootConfig) -> Result<()> {
        let mut storage = self.storage()?;
        storage.update_and_save(CONFIG_ENTITY, vec![config.clone()])?;
        Ok(())
    }
}
