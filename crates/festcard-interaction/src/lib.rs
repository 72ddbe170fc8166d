//! Profile generator backends.
//!
//! - `GeminiProfileGenerator`: Gemini REST API
//! - `OfflineProfileGenerator`: canned profiles, no network

pub mod gemini_api_generator;
pub mod offline_generator;
pub mod prompts;

use std::sync::Arc;
use std::time::Duration;

use festcard_core::config::{GeneratorBackend, GeneratorSettings, SecretConfig};
use festcard_core::{ProfileGenerator, Result};

pub use gemini_api_generator::GeminiProfileGenerator;
pub use offline_generator::OfflineProfileGenerator;

/// Picks the generator for the configured backend.
///
/// A Gemini backend without an API key falls back to the offline generator.
pub fn build_generator(
    settings: &GeneratorSettings,
    secrets: &SecretConfig,
) -> Result<Arc<dyn ProfileGenerator>> {
    match settings.backend {
        GeneratorBackend::Offline => Ok(Arc::new(OfflineProfileGenerator::new())),
        GeneratorBackend::GeminiApi => {
            let Some(api_key) = secrets.gemini_api_key() else {
                tracing::warn!("no Gemini API key configured, using offline profiles");
                return Ok(Arc::new(OfflineProfileGenerator::new()));
            };
            let model = secrets
                .gemini
                .as_ref()
                .and_then(|g| g.model_name.clone())
                .unwrap_or_else(|| settings.model.clone());
            let generator = GeminiProfileGenerator::new(api_key, model)
                .with_timeout(Duration::from_secs(settings.request_timeout_secs))?;
            tracing::info!(model = generator.model(), "using Gemini profile generator");
            Ok(Arc::new(generator))
        }
    }
}
