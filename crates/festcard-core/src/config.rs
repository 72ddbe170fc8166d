//! Application configuration domain models.
//!
//! `RootConfig` lives in `config.toml`; API keys live separately in
//! `secret.json` as `SecretConfig`.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use version_migrate::DeriveQueryable as Queryable;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_LOG_LEVEL: &str = "warn";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Which profile generator backs the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GeneratorBackend {
    /// Google Gemini REST API
    #[default]
    GeminiApi,
    /// Canned local profiles, no network
    Offline,
}

/// Profile generator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorSettings {
    #[serde(default)]
    pub backend: GeneratorBackend,
    #[serde(default = "default_model")]
    pub model: String,
    /// HTTP request timeout for remote backends.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            backend: GeneratorBackend::default(),
            model: default_model(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Root of `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Queryable)]
#[queryable(entity = "config_root")]
pub struct RootConfig {
    #[serde(default)]
    pub generator: GeneratorSettings,
    /// Fallback tracing filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorSettings::default(),
            log_level: default_log_level(),
        }
    }
}

/// Gemini API credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

/// Root of `secret.json`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Queryable)]
#[queryable(entity = "secret")]
pub struct SecretConfig {
    #[serde(default)]
    pub gemini: Option<GeminiConfig>,
}

impl SecretConfig {
    /// The Gemini key, if one is configured and non-blank.
    pub fn gemini_api_key(&self) -> Option<&str> {
        self.gemini
            .as_ref()
            .map(|g| g.api_key.trim())
            .filter(|key| !key.is_empty())
    }
}
