//! Versioned DTOs for everything festcard writes to disk.
//!
//! Each DTO has a `create_*_migrator` factory used by the file-backed
//! services; domain models never touch the on-disk layout directly.

mod config_root;
mod secret;
mod session;
mod user;

pub use config_root::{ConfigRoot, ConfigRootV1_0_0, create_config_root_migrator};
pub use secret::{SecretConfigV1_0_0, create_secret_migrator};
pub use session::{ActiveSession, ActiveSessionV1_0_0, create_active_session_migrator};
pub use user::{UserDTO, UserV1_0_0, UserV1_1_0, create_user_migrator};
