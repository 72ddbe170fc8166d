//! In-memory session and account store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use festcard_core::error::{FestcardError, Result};
use festcard_core::user::{AccountStore, SessionStore, User};

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<String, User>,
    current: Option<String>,
}

/// Keeps everything in process memory. Used by tests.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    state: Mutex<MemoryState>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|e| FestcardError::internal(format!("memory store lock poisoned: {e}")))
    }
}

impl SessionStore for InMemorySessionStore {
    fn get_current_user(&self) -> Result<Option<User>> {
        let state = self.state()?;
        Ok(state
            .current
            .as_ref()
            .and_then(|name| state.users.get(name))
            .cloned())
    }

    fn update_current_user(&self, user: &User) -> Result<()> {
        let mut state = self.state()?;
        state.users.insert(user.username.clone(), user.clone());
        state.current = Some(user.username.clone());
        Ok(())
    }

    fn logout(&self) -> Result<()> {
        self.state()?.current = None;
        Ok(())
    }
}

impl AccountStore for InMemorySessionStore {
    fn find_account(&self, username: &str) -> Result<Option<User>> {
        Ok(self.state()?.users.get(username).cloned())
    }
}
