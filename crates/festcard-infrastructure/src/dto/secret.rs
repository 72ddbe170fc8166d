//! Secret configuration DTOs and migrator.

use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, Versioned};

use festcard_core::config::{GeminiConfig, SecretConfig};

/// Secret configuration schema V1.0.0.
///
/// Stores provider API keys in `secret.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct SecretConfigV1_0_0 {
    /// Gemini API configuration
    #[serde(default)]
    pub gemini: Option<GeminiConfig>,
}

impl IntoDomain<SecretConfig> for SecretConfigV1_0_0 {
    fn into_domain(self) -> SecretConfig {
        SecretConfig {
            gemini: self.gemini,
        }
    }
}

impl FromDomain<SecretConfig> for SecretConfigV1_0_0 {
    fn from_domain(config: SecretConfig) -> Self {
        SecretConfigV1_0_0 {
            gemini: config.gemini,
        }
    }
}

/// Creates a migrator for secret configuration entities.
pub fn create_secret_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();
    let path = version_migrate::Migrator::define("secret")
        .from::<SecretConfigV1_0_0>()
        .into_with_save::<SecretConfig>();
    migrator
        .register(path)
        .expect("Failed to create secret migrator");
    migrator
}
