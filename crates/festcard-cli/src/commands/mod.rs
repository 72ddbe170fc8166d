pub mod account;
pub mod cards;
pub mod persona;
pub mod render;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use festcard_application::FestSession;
use festcard_core::config::{GeneratorBackend, RootConfig};
use festcard_core::secret::SecretService;
use festcard_infrastructure::{FileSessionStore, SecretServiceImpl};
use festcard_interaction::build_generator;

/// Wires the file-backed store and the configured generator into a session.
pub async fn open_session(
    data_dir: Option<&Path>,
    offline: bool,
    config: &RootConfig,
) -> Result<FestSession> {
    let mut settings = config.generator.clone();
    if offline {
        settings.backend = GeneratorBackend::Offline;
    }

    let secrets = SecretServiceImpl::new(data_dir)?
        .load_secrets()
        .await
        .context("Failed to load secret.json")?;
    let generator = build_generator(&settings, &secrets)?;

    let store = Arc::new(FileSessionStore::new(data_dir).context("Failed to open session store")?);
    Ok(FestSession::with_store(store, generator)?)
}
