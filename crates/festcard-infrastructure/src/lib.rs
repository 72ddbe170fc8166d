pub mod config_service;
pub mod dto;
pub mod file_session_store;
pub mod memory_session_store;
pub mod paths;
pub mod secret_service;

pub use crate::config_service::ConfigService;
pub use crate::file_session_store::FileSessionStore;
pub use crate::memory_session_store::InMemorySessionStore;
pub use crate::paths::FestPaths;
pub use crate::secret_service::SecretServiceImpl;
