//! Session and account store traits.
//!
//! Both contracts are synchronous from the caller's point of view: backends
//! are local (files, memory) and never touch the network.

use super::model::User;
use crate::error::Result;

/// Holds the record of whoever is currently logged in.
///
/// # Implementation Notes
///
/// - All operations must be idempotent.
/// - `update_current_user` overwrites the stored record wholesale.
/// - The only "error" on first run is an absent user (`Ok(None)`).
pub trait SessionStore: Send + Sync {
    /// Returns the logged-in user, if any.
    fn get_current_user(&self) -> Result<Option<User>>;

    /// Replaces the stored record for `user` and makes it current.
    ///
    /// The record must afterwards be visible through
    /// `AccountStore::find_account` on the same backend.
    fn update_current_user(&self, user: &User) -> Result<()>;

    /// Clears the current session. Account records are left intact.
    fn logout(&self) -> Result<()>;
}

/// Registry of known users, keyed by username.
///
/// Records are written through `SessionStore::update_current_user`.
pub trait AccountStore: Send + Sync {
    /// Looks up a stored user by exact username.
    fn find_account(&self, username: &str) -> Result<Option<User>>;
}
