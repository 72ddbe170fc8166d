//! Unified path management for festcard files.
//!
//! Paths are resolved via `AppPaths` from the version-migrate crate unless a
//! base directory override is given (tests, `--data-dir`).
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/festcard/          # Config directory
//! ├── config.toml              # Application configuration
//! └── secret.json              # API keys
//!
//! ~/.local/share/festcard/     # Data directory
//! ├── users.json               # Every registered user record
//! └── session.json             # Pointer to the logged-in user
//! ```
//!
//! With an override, all four files live directly in the base directory.

use std::path::{Path, PathBuf};
use version_migrate::AppPaths;

use festcard_core::FestcardError;

const APP_NAME: &str = "festcard";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for FestcardError {
    fn from(err: PathError) -> Self {
        FestcardError::config(err.to_string())
    }
}

/// The files festcard persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    Config,
    Secret,
    Users,
    Session,
}

impl ServiceType {
    fn file_name(self) -> &'static str {
        match self {
            ServiceType::Config => "config.toml",
            ServiceType::Secret => "secret.json",
            ServiceType::Users => "users.json",
            ServiceType::Session => "session.json",
        }
    }
}

/// Resolves where festcard keeps its files.
#[derive(Debug, Clone, Default)]
pub struct FestPaths {
    base: Option<PathBuf>,
}

impl FestPaths {
    /// Creates a resolver; `base` overrides the platform directories.
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    fn app_paths() -> AppPaths {
        AppPaths::new(APP_NAME)
    }

    /// Directory holding `config.toml` and `secret.json`.
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => Self::app_paths()
                .config_dir()
                .map_err(|_| PathError::HomeDirNotFound),
        }
    }

    /// Directory holding user and session records.
    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => Self::app_paths()
                .data_dir()
                .map_err(|_| PathError::HomeDirNotFound),
        }
    }

    /// Full path of the file backing `service`.
    pub fn get_path(&self, service: ServiceType) -> Result<PathBuf, PathError> {
        let dir = match service {
            ServiceType::Config | ServiceType::Secret => self.config_dir()?,
            ServiceType::Users | ServiceType::Session => self.data_dir()?,
        };
        Ok(dir.join(service.file_name()))
    }
}
