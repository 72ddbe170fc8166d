//! ConfigRoot DTOs and migrations
//!
//! - V1.0.0: generator settings and log level

use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, Versioned};

use festcard_core::config::{GeneratorSettings, RootConfig};

/// Root configuration structure V1.0.0 for `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct ConfigRootV1_0_0 {
    #[serde(default)]
    pub generator: GeneratorSettings,
    #[serde(default)]
    pub log_level: Option<String>,
}

/// Type alias for the latest ConfigRoot version.
pub type ConfigRoot = ConfigRootV1_0_0;

impl Default for ConfigRootV1_0_0 {
    fn default() -> Self {
        Self::from_domain(RootConfig::default())
    }
}

impl IntoDomain<RootConfig> for ConfigRootV1_0_0 {
    fn into_domain(self) -> RootConfig {
        let defaults = RootConfig::default();
        RootConfig {
            generator: self.generator,
            log_level: self.log_level.unwrap_or(defaults.log_level),
        }
    }
}

impl FromDomain<RootConfig> for ConfigRootV1_0_0 {
    fn from_domain(config: RootConfig) -> Self {
        ConfigRootV1_0_0 {
            generator: config.generator,
            log_level: Some(config.log_level),
        }
    }
}

/// Creates and configures a Migrator instance for ConfigRoot.
pub fn create_config_root_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();

    let config_path = version_migrate::Migrator::define("config_root")
        .from::<ConfigRootV1_0_0>()
        .into_with_save::<RootConfig>();

    migrator
        .register(config_path)
        .expect("Failed to register config_root migration path");

    migrator
}
