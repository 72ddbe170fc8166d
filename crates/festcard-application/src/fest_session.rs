//! The festcard session context.
//!
//! `FestSession` owns the current user for the lifetime of the app and is the
//! only place that mutates it. Every mutation is applied to the latest user
//! value and persisted before the in-memory copy is replaced, so a slow
//! generator call never overwrites changes made while it was in flight.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use festcard_core::connection::INTERRUPTED_REASON;
use festcard_core::{
    AccountStore, Connection, ConnectionId, FestcardError, Persona, Profile, ProfileGenerator,
    Result, SessionStore, User,
};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Clears a busy flag when dropped.
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool, operation: &'static str) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| FestcardError::Busy(operation))?;
        Ok(Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Session context shared by every view of the app.
///
/// # Thread Safety
///
/// Cheap to share behind an `Arc`. The current user sits behind a tokio
/// `RwLock`; generator calls never hold it.
pub struct FestSession {
    sessions: Arc<dyn SessionStore>,
    accounts: Arc<dyn AccountStore>,
    generator: Arc<dyn ProfileGenerator>,
    current: RwLock<Option<User>>,
    profile_loading: AtomicBool,
    adding_connection: AtomicBool,
}

impl FestSession {
    /// Restores whatever session the store holds.
    ///
    /// Pending slots left by an earlier run are failed and written back,
    /// since no tap of this process can be waiting on them.
    pub fn bootstrap(
        sessions: Arc<dyn SessionStore>,
        accounts: Arc<dyn AccountStore>,
        generator: Arc<dyn ProfileGenerator>,
    ) -> Result<Self> {
        let mut current = sessions.get_current_user()?;
        if let Some(user) = current.as_mut() {
            if settle_interrupted(user) > 0 {
                sessions.update_current_user(user)?;
            }
        }
        match &current {
            Some(user) => info!(
                "[FestSession] restored session for '{}' ({} connections)",
                user.username,
                user.connections.len()
            ),
            None => info!("[FestSession] no stored session"),
        }
        Ok(Self {
            sessions,
            accounts,
            generator,
            current: RwLock::new(current),
            profile_loading: AtomicBool::new(false),
            adding_connection: AtomicBool::new(false),
        })
    }

    /// `bootstrap` for a backend that serves both store traits.
    pub fn with_store<S>(store: Arc<S>, generator: Arc<dyn ProfileGenerator>) -> Result<Self>
    where
        S: SessionStore + AccountStore + 'static,
    {
        Self::bootstrap(store.clone(), store, generator)
    }

    /// Snapshot of the current user.
    pub async fn current_user(&self) -> Option<User> {
        self.current.read().await.clone()
    }

    pub fn is_profile_loading(&self) -> bool {
        self.profile_loading.load(Ordering::Acquire)
    }

    pub fn is_adding_connection(&self) -> bool {
        self.adding_connection.load(Ordering::Acquire)
    }

    /// Creates an account and signs it in.
    pub async fn register(&self, username: &str, password: Option<&str>) -> Result<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(FestcardError::security("Username must not be empty"));
        }

        // Held across the lookup so two registrations cannot both pass it.
        let mut current = self.current.write().await;
        if self.accounts.find_account(username)?.is_some() {
            return Err(FestcardError::security(format!(
                "Username '{username}' is already taken"
            )));
        }

        let user = User::new(username, password.map(str::to_string));
        self.sessions.update_current_user(&user)?;
        *current = Some(user.clone());
        info!("[FestSession] registered '{}'", username);
        Ok(user)
    }

    /// Signs an existing account in, replacing any current session.
    ///
    /// Taps still pending in the stored record are failed on the way in.
    pub async fn login(&self, username: &str, password: Option<&str>) -> Result<User> {
        let mut current = self.current.write().await;
        let mut user = self
            .accounts
            .find_account(username.trim())?
            .filter(|user| user.password_matches(password))
            .ok_or_else(|| FestcardError::security("Unknown user or wrong password"))?;

        // Only the signed-in user can have a tap in flight.
        let signed_in = current.as_ref().map(|active| active.username.as_str());
        if signed_in != Some(user.username.as_str()) {
            settle_interrupted(&mut user);
        }
        self.sessions.update_current_user(&user)?;
        *current = Some(user.clone());
        info!("[FestSession] '{}' logged in", user.username);
        Ok(user)
    }

    /// Clears the session. The account itself is kept.
    pub async fn logout(&self) -> Result<()> {
        let mut current = self.current.write().await;
        self.sessions.logout()?;
        if let Some(user) = current.take() {
            info!("[FestSession] '{}' logged out", user.username);
        }
        Ok(())
    }

    /// Switches the presented persona and fetches a fresh profile for it.
    ///
    /// The selection is persisted before the fetch starts. A generator error
    /// leaves the selection in place and the previous profile untouched.
    pub async fn select_persona(&self, persona: Persona) -> Result<Profile> {
        let persona = persona.ensure_selectable()?;
        let _busy = BusyGuard::acquire(&self.profile_loading, "profile loading")?;

        let username = self
            .mutate_current(|user| {
                user.select_persona(persona)?;
                Ok(user.username.clone())
            })
            .await?;
        self.fetch_profile(&username, persona).await
    }

    /// Fetches a new profile for the persona already selected.
    pub async fn refresh_profile(&self) -> Result<Profile> {
        let _busy = BusyGuard::acquire(&self.profile_loading, "profile loading")?;
        let (username, persona) = {
            let current = self.current.read().await;
            let user = current.as_ref().ok_or(FestcardError::NotLoggedIn)?;
            (user.username.clone(), user.selected_persona())
        };
        self.fetch_profile(&username, persona).await
    }

    async fn fetch_profile(&self, username: &str, persona: Persona) -> Result<Profile> {
        debug!("[FestSession] fetching {} profile for '{}'", persona, username);
        let profile = self
            .generator
            .generate_persona_profile(persona)
            .await
            .inspect_err(|e| warn!("[FestSession] profile fetch failed: {}", e))?;

        let applied = self
            .update_if_current(username, |user| {
                user.profile = Some(profile.clone());
                Some(())
            })
            .await?;
        if applied.is_none() {
            warn!(
                "[FestSession] '{}' is no longer current, discarding fetched profile",
                username
            );
        }
        Ok(profile)
    }

    /// Simulates an NFC tap.
    ///
    /// A pending placeholder is inserted at the top of the list and persisted
    /// at once. When the generator answers, the placeholder is resolved in
    /// place, or marked failed if the generator errored. Only one tap runs at
    /// a time; a second one gets `FestcardError::Busy`.
    pub async fn add_simulated_connection(&self) -> Result<Connection> {
        let _busy = BusyGuard::acquire(&self.adding_connection, "adding connection")?;
        let requested_at = Utc::now();

        let (username, id) = self
            .mutate_current(|user| {
                let id = user
                    .connections
                    .unused_id(ConnectionId::temporary(requested_at));
                user.connections
                    .push_front(Connection::pending(id.clone(), requested_at))?;
                Ok((user.username.clone(), id))
            })
            .await?;
        info!("[FestSession] tap started, placeholder {}", id);

        let persona = Persona::random_selectable(&mut rand::thread_rng());
        let outcome = self.generator.generate_persona_profile(persona).await;
        if let Err(e) = &outcome {
            warn!("[FestSession] tap {} failed: {}", id, e);
        }

        let settled = self
            .update_if_current(&username, |user| {
                let applied = match &outcome {
                    Ok(profile) => user.connections.resolve(&id, profile.clone()),
                    Err(e) => user.connections.fail(&id, e.to_string(), Utc::now()),
                };
                if applied {
                    user.connections.get(&id).cloned()
                } else {
                    None
                }
            })
            .await?;

        match settled {
            Some(connection) => Ok(connection),
            None => {
                warn!(
                    "[FestSession] placeholder {} is gone, dropping tap result",
                    id
                );
                Ok(match outcome {
                    Ok(profile) => Connection::resolved(id, profile),
                    Err(e) => Connection::failed(id, e.to_string(), requested_at),
                })
            }
        }
    }

    /// Looks up a public profile and adds it as a resolved connection.
    ///
    /// Returns `false` for an empty query or when nobody matched; neither
    /// touches the user. Generator errors propagate.
    pub async fn search_and_add_connection(&self, query: &str) -> Result<bool> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(false);
        }
        let username = self
            .current
            .read()
            .await
            .as_ref()
            .map(|user| user.username.clone())
            .ok_or(FestcardError::NotLoggedIn)?;

        let Some(profile) = self.generator.search_public_profile(query).await? else {
            info!("[FestSession] no match for '{}'", query);
            return Ok(false);
        };

        let added = self
            .update_if_current(&username, |user| {
                let id = user.connections.unused_id(ConnectionId::searched(Utc::now()));
                user.connections
                    .push_front(Connection::resolved(id.clone(), profile))
                    .ok()?;
                Some(id)
            })
            .await?;
        match added {
            Some(id) => {
                info!("[FestSession] added search result '{}' as {}", query, id);
                Ok(true)
            }
            None => {
                warn!("[FestSession] '{}' is no longer current, dropping search result", username);
                Ok(false)
            }
        }
    }

    /// Applies `f` to a copy of the current user, persists, then publishes.
    async fn mutate_current<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut User) -> Result<T>,
    {
        let mut current = self.current.write().await;
        let user = current.as_mut().ok_or(FestcardError::NotLoggedIn)?;
        let mut updated = user.clone();
        let out = f(&mut updated)?;
        self.sessions.update_current_user(&updated)?;
        *user = updated;
        Ok(out)
    }

    /// Like `mutate_current`, but only while `username` is still signed in.
    ///
    /// Returns `None` without writing when the user changed or `f` declined.
    async fn update_if_current<T, F>(&self, username: &str, f: F) -> Result<Option<T>>
    where
        F: FnOnce(&mut User) -> Option<T>,
    {
        let mut current = self.current.write().await;
        let Some(user) = current.as_mut().filter(|user| user.username == username) else {
            return Ok(None);
        };
        let mut updated = user.clone();
        let Some(out) = f(&mut updated) else {
            return Ok(None);
        };
        self.sessions.update_current_user(&updated)?;
        *user = updated;
        Ok(Some(out))
    }
}

/// Fails the pending slots of a user loaded from storage.
fn settle_interrupted(user: &mut User) -> usize {
    let settled = user
        .connections
        .fail_pending(INTERRUPTED_REASON, Utc::now());
    if settled > 0 {
        warn!(
            "[FestSession] '{}' had {} interrupted tap(s), marked failed",
            user.username, settled
        );
    }
    settled
}
