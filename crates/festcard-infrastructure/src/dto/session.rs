//! Active session DTOs and migrator

use serde::{Deserialize, Serialize};
use version_migrate::DeriveQueryable as Queryable;
use version_migrate::{FromDomain, IntoDomain, Versioned};

/// Pointer from `session.json` to the logged-in user's record in `users.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Queryable)]
#[queryable(entity = "active_session")]
pub struct ActiveSession {
    pub username: String,
}

/// Active session V1.0.0
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct ActiveSessionV1_0_0 {
    pub username: String,
}

impl IntoDomain<ActiveSession> for ActiveSessionV1_0_0 {
    fn into_domain(self) -> ActiveSession {
        ActiveSession {
            username: self.username,
        }
    }
}

impl FromDomain<ActiveSession> for ActiveSessionV1_0_0 {
    fn from_domain(session: ActiveSession) -> Self {
        ActiveSessionV1_0_0 {
            username: session.username,
        }
    }
}

/// Creates a Migrator for the active session pointer.
pub fn create_active_session_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();
    let path = version_migrate::Migrator::define("active_session")
        .from::<ActiveSessionV1_0_0>()
        .into_with_save::<ActiveSession>();
    migrator
        .register(path)
        .expect("Failed to register active_session migration path");
    migrator
}
