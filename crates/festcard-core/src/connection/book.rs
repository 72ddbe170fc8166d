//! Ordered connection storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::model::{Connection, ConnectionId};
use crate::error::{FestcardError, Result};
use crate::profile::Profile;

/// A user's connections, newest first, addressable by slot id.
///
/// Entries are kept in a `BTreeMap` keyed by an insertion sequence number and
/// indexed by id, so settling a pending slot is a lookup instead of a scan and
/// never moves the entry. Serialized as a plain newest-first list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Connection>", into = "Vec<Connection>")]
pub struct ConnectionBook {
    entries: BTreeMap<u64, Connection>,
    slots: HashMap<ConnectionId, u64>,
    next_seq: u64,
}

impl ConnectionBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.slots.contains_key(id)
    }

    pub fn get(&self, id: &ConnectionId) -> Option<&Connection> {
        self.slots.get(id).and_then(|seq| self.entries.get(seq))
    }

    /// Newest entry, i.e. index 0 in display order.
    pub fn first(&self) -> Option<&Connection> {
        self.entries.values().next_back()
    }

    /// Iterates newest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Connection> {
        self.entries.values().rev()
    }

    /// Resolved profiles in display order.
    pub fn resolved_profiles(&self) -> impl Iterator<Item = &Profile> {
        self.iter().filter_map(Connection::profile)
    }

    /// Returns `candidate`, or the first suffixed variant not yet in the book.
    pub fn unused_id(&self, candidate: ConnectionId) -> ConnectionId {
        if !self.contains(&candidate) {
            return candidate;
        }
        let mut n = 1;
        loop {
            let next = candidate.with_suffix(n);
            if !self.contains(&next) {
                return next;
            }
            n += 1;
        }
    }

    /// Inserts an entry at the front.
    pub fn push_front(&mut self, connection: Connection) -> Result<()> {
        let id = connection.id().clone();
        if self.contains(&id) {
            return Err(FestcardError::data_access(format!(
                "connection '{id}' already exists"
            )));
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.slots.insert(id, seq);
        self.entries.insert(seq, connection);
        Ok(())
    }

    /// Replaces the entry with the same id in place.
    ///
    /// Returns `false` when the slot no longer exists.
    pub fn replace(&mut self, connection: Connection) -> bool {
        let Some(seq) = self.slots.get(connection.id()).copied() else {
            return false;
        };
        self.entries.insert(seq, connection);
        true
    }

    /// Settles slot `id` with a generated profile.
    pub fn resolve(&mut self, id: &ConnectionId, profile: Profile) -> bool {
        self.replace(Connection::resolved(id.clone(), profile))
    }

    /// Marks slot `id` as failed, keeping its original request time when known.
    pub fn fail(&mut self, id: &ConnectionId, reason: impl Into<String>, now: DateTime<Utc>) -> bool {
        let requested_at = match self.get(id) {
            Some(Connection::Pending { requested_at, .. })
            | Some(Connection::Failed { requested_at, .. }) => *requested_at,
            Some(Connection::Resolved { .. }) => now,
            None => return false,
        };
        self.replace(Connection::failed(id.clone(), reason, requested_at))
    }

    /// Fails every pending slot in place and returns how many were settled.
    ///
    /// Used when a record is loaded by a process that cannot have a tap in
    /// flight, so any pending slot is left over from an interrupted one.
    pub fn fail_pending(&mut self, reason: &str, now: DateTime<Utc>) -> usize {
        let stale: Vec<ConnectionId> = self
            .iter()
            .filter(|c| c.is_loading())
            .map(|c| c.id().clone())
            .collect();
        let mut settled = 0;
        for id in stale {
            if self.fail(&id, reason, now) {
                settled += 1;
            }
        }
        settled
    }
}

/// Two books are equal when they list the same entries in the same order.
impl PartialEq for ConnectionBook {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl From<Vec<Connection>> for ConnectionBook {
    /// Builds a book from a newest-first list. Later duplicates of an id are dropped.
    fn from(list: Vec<Connection>) -> Self {
        let mut book = ConnectionBook::new();
        let mut seen = std::collections::HashSet::new();
        let unique: Vec<Connection> = list
            .into_iter()
            .filter(|c| {
                let fresh = seen.insert(c.id().clone());
                if !fresh {
                    tracing::warn!(
                        "[ConnectionBook] dropping duplicate connection '{}' while loading",
                        c.id()
                    );
                }
                fresh
            })
            .collect();
        for connection in unique.into_iter().rev() {
            // ids are unique after filtering
            let _ = book.push_front(connection);
        }
        book
    }
}

impl From<ConnectionBook> for Vec<Connection> {
    fn from(book: ConnectionBook) -> Self {
        book.entries.into_values().rev().collect()
    }
}

impl<'a> IntoIterator for &'a ConnectionBook {
    type Item = &'a Connection;
    type IntoIter = std::iter::Rev<std::collections::btree_map::Values<'a, u64, Connection>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values().rev()
    }
}
