//! Connection domain model.
//!
//! A connection is a slot in the user's card collection. A slot is created
//! pending when a tap starts and is later settled as resolved or failed; its
//! id never changes across that transition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::persona::Persona;
use crate::profile::{Profile, Socials};

pub const PENDING_NAME: &str = "Connecting...";
pub const PENDING_BIO: &str = "Receiving profile via NFC tap.";
pub const FAILED_NAME: &str = "Connection failed";
/// Failure reason for slots whose tap never finished.
pub const INTERRUPTED_REASON: &str = "Interrupted before the profile arrived";

/// Stable identifier of a connection slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id for a slot created by an NFC tap.
    pub fn temporary(at: DateTime<Utc>) -> Self {
        Self(format!("temp_{}", at.timestamp_millis()))
    }

    /// Id for a profile added through the directory search.
    pub fn searched(at: DateTime<Utc>) -> Self {
        Self(format!("search_{}", at.timestamp_millis()))
    }

    /// Same id with a numeric suffix, used to break collisions.
    pub fn with_suffix(&self, n: u32) -> Self {
        Self(format!("{}_{}", self.0, n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConnectionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One entry in a user's connection list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Connection {
    /// A tap is in flight and the profile has not arrived yet.
    Pending {
        id: ConnectionId,
        requested_at: DateTime<Utc>,
    },
    /// The profile arrived; `profile.id` mirrors `id`.
    Resolved { id: ConnectionId, profile: Profile },
    /// The generator gave up on this slot.
    Failed {
        id: ConnectionId,
        reason: String,
        requested_at: DateTime<Utc>,
    },
}

impl Connection {
    pub fn pending(id: ConnectionId, requested_at: DateTime<Utc>) -> Self {
        Connection::Pending { id, requested_at }
    }

    /// Builds a resolved entry, stamping the slot id onto the profile.
    pub fn resolved(id: ConnectionId, mut profile: Profile) -> Self {
        profile.id = Some(id.to_string());
        profile.is_loading = false;
        Connection::Resolved { id, profile }
    }

    pub fn failed(id: ConnectionId, reason: impl Into<String>, requested_at: DateTime<Utc>) -> Self {
        Connection::Failed {
            id,
            reason: reason.into(),
            requested_at,
        }
    }

    pub fn id(&self) -> &ConnectionId {
        match self {
            Connection::Pending { id, .. }
            | Connection::Resolved { id, .. }
            | Connection::Failed { id, .. } => id,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Connection::Pending { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Connection::Failed { .. })
    }

    pub fn profile(&self) -> Option<&Profile> {
        match self {
            Connection::Resolved { profile, .. } => Some(profile),
            _ => None,
        }
    }

    /// The card to render for this slot.
    ///
    /// Pending and failed slots project to placeholder profiles carrying the
    /// slot id, so a list keyed by id stays stable while entries settle.
    pub fn display_profile(&self) -> Profile {
        match self {
            Connection::Resolved { profile, .. } => profile.clone(),
            Connection::Pending { id, .. } => Profile {
                id: Some(id.to_string()),
                name: PENDING_NAME.to_string(),
                bio: PENDING_BIO.to_string(),
                socials: Socials::default(),
                sources: Vec::new(),
                // cosmetic while loading
                persona: Persona::Socialite,
                is_loading: true,
            },
            Connection::Failed { id, reason, .. } => Profile {
                id: Some(id.to_string()),
                name: FAILED_NAME.to_string(),
                bio: reason.clone(),
                socials: Socials::default(),
                sources: Vec::new(),
                persona: Persona::Socialite,
                is_loading: false,
            },
        }
    }
}
