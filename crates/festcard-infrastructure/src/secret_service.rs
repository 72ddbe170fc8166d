//! Secret service implementation.
//!
//! Reads API keys from `secret.json`; the `GEMINI_API_KEY` environment
//! variable takes precedence over the stored key.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use festcard_core::config::{GeminiConfig, SecretConfig};
use festcard_core::error::{FestcardError, Result};
use festcard_core::secret::SecretService;
use version_migrate::{FileStorage, FileStorageStrategy, FormatStrategy, LoadBehavior};

use crate::dto::create_secret_migrator;
use crate::paths::{FestPaths, ServiceType};

pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Service for managing secret configuration.
///
/// Caches the loaded config after the first successful read.
#[derive(Clone)]
pub struct SecretServiceImpl {
    path: PathBuf,
    secrets: Arc<RwLock<Option<SecretConfig>>>,
    env_override: Option<String>,
}

impl SecretServiceImpl {
    /// `base_path` overrides the config directory.
    pub fn new(base_path: Option<&Path>) -> Result<Self> {
        let path = FestPaths::new(base_path).get_path(ServiceType::Secret)?;
        Ok(Self {
            path,
            secrets: Arc::new(RwLock::new(None)),
            env_override: std::env::var(GEMINI_API_KEY_ENV).ok(),
        })
    }

    /// Replaces the environment override (tests, explicit `--api-key`).
    pub fn with_env_override(mut self, key: Option<String>) -> Self {
        self.env_override = key;
        self
    }

    fn load_from_file(&self) -> Result<SecretConfig> {
        if !self.path.exists() {
            return Ok(SecretConfig::default());
        }
        let strategy = FileStorageStrategy::new()
            .with_format(FormatStrategy::Json)
            .with_load_behavior(LoadBehavior::CreateIfMissing);
        let storage = FileStorage::new(self.path.clone(), create_secret_migrator(), strategy)?;
        let secrets: Vec<SecretConfig> = storage.query("secret")?;
        Ok(secrets.into_iter().next().unwrap_or_default())
    }

    fn load_secrets_internal(&self) -> Result<SecretConfig> {
        {
            let read_lock = self
                .secrets
                .read()
                .map_err(|e| FestcardError::internal(format!("secret cache poisoned: {e}")))?;
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let mut loaded = self.load_from_file()?;
        if let Some(key) = self.env_override.as_deref().filter(|k| !k.trim().is_empty()) {
            let model_name = loaded.gemini.as_ref().and_then(|g| g.model_name.clone());
            loaded.gemini = Some(GeminiConfig {
                api_key: key.trim().to_string(),
                model_name,
            });
        }

        {
            let mut write_lock = self
                .secrets
                .write()
                .map_err(|e| FestcardError::internal(format!("secret cache poisoned: {e}")))?;
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }
}

#[async_trait::async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> Result<SecretConfig> {
        self.load_secrets_internal()
    }

    async fn secret_file_exists(&self) -> bool {
        self.path.exists()
    }
}
