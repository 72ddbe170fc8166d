//! File-backed session and account store.
//!
//! Mirrors what a browser app keeps in local storage: a list of every user
//! record (`users.json`) and a pointer to who is logged in (`session.json`).
//! Both documents go through `version_migrate::FileStorage`, so older layouts
//! are migrated on load.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use festcard_core::error::{FestcardError, Result};
use festcard_core::user::{AccountStore, SessionStore, User};
use version_migrate::{FileStorage, FileStorageStrategy, FormatStrategy, LoadBehavior};

use crate::dto::{ActiveSession, create_active_session_migrator, create_user_migrator};
use crate::paths::{FestPaths, ServiceType};

const USER_ENTITY: &str = "user";
const SESSION_ENTITY: &str = "active_session";

/// Session store persisting to JSON files under the festcard data directory.
///
/// # Example
///
/// ```ignore
/// use festcard_infrastructure::FileSessionStore;
/// use festcard_core::SessionStore;
///
/// let store = FileSessionStore::new(None)?;
/// let user = store.get_current_user()?;
/// ```
#[derive(Clone)]
pub struct FileSessionStore {
    users: Arc<Mutex<FileStorage>>,
    session: Arc<Mutex<FileStorage>>,
}

impl FileSessionStore {
    /// Opens (or creates) the store. `base_path` overrides the data directory.
    pub fn new(base_path: Option<&Path>) -> Result<Self> {
        let paths = FestPaths::new(base_path);
        let users_path = paths.get_path(ServiceType::Users)?;
        let session_path = paths.get_path(ServiceType::Session)?;

        tracing::debug!(
            "[FileSessionStore] users={}, session={}",
            users_path.display(),
            session_path.display()
        );

        let users = FileStorage::new(users_path, create_user_migrator(), Self::strategy())?;
        let session = FileStorage::new(
            session_path,
            create_active_session_migrator(),
            Self::strategy(),
        )?;

        Ok(Self {
            users: Arc::new(Mutex::new(users)),
            session: Arc::new(Mutex::new(session)),
        })
    }

    fn strategy() -> FileStorageStrategy {
        FileStorageStrategy::new()
            .with_format(FormatStrategy::Json)
            .with_load_behavior(LoadBehavior::CreateIfMissing)
    }

    fn lock(storage: &Mutex<FileStorage>) -> Result<MutexGuard<'_, FileStorage>> {
        storage
            .lock()
            .map_err(|e| FestcardError::internal(format!("storage lock poisoned: {e}")))
    }

    fn load_users(&self) -> Result<Vec<User>> {
        let storage = Self::lock(&self.users)?;
        let users: Vec<User> = storage.query(USER_ENTITY)?;
        Ok(users)
    }

    fn active_username(&self) -> Result<Option<String>> {
        let storage = Self::lock(&self.session)?;
        let sessions: Vec<ActiveSession> = storage.query(SESSION_ENTITY)?;
        Ok(sessions.into_iter().next().map(|s| s.username))
    }

    fn upsert_user(&self, user: &User) -> Result<()> {
        let mut storage = Self::lock(&self.users)?;
        let mut users: Vec<User> = storage.query(USER_ENTITY)?;
        match users.iter_mut().find(|u| u.username == user.username) {
            Some(existing) => *existing = user.clone(),
            None => users.push(user.clone()),
        }
        tracing::debug!(
            "[FileSessionStore] saving user '{}' ({} connections)",
            user.username,
            user.connections.len()
        );
        storage.update_and_save(USER_ENTITY, users)?;
        Ok(())
    }

    fn write_session(&self, sessions: Vec<ActiveSession>) -> Result<()> {
        let mut storage = Self::lock(&self.session)?;
        storage.update_and_save(SESSION_ENTITY, sessions)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get_current_user(&self) -> Result<Option<User>> {
        let Some(username) = self.active_username()? else {
            return Ok(None);
        };
        let user = self.find_account(&username)?;
        if user.is_none() {
            tracing::warn!(
                "[FileSessionStore] session points at unknown user '{}'",
                username
            );
        }
        Ok(user)
    }

    fn update_current_user(&self, user: &User) -> Result<()> {
        self.upsert_user(user)?;
        self.write_session(vec![ActiveSession {
            username: user.username.clone(),
        }])
    }

    fn logout(&self) -> Result<()> {
        tracing::debug!("[FileSessionStore] clearing active session");
        self.write_session(Vec::new())
    }
}

impl AccountStore for FileSessionStore {
    fn find_account(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .load_users()?
            .into_iter()
            .find(|u| u.username == username))
    }
}
