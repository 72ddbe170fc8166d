//! User domain model.
//!
//! The `User` is the whole session record: credentials, the user's own card,
//! the cards they collected, and the persona they currently present.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use version_migrate::DeriveQueryable as Queryable;

use crate::connection::ConnectionBook;
use crate::error::Result;
use crate::persona::Persona;
use crate::profile::Profile;

/// The authenticated session record.
///
/// `password` is stored in plain text. This is a prototype shortcut and
/// provides no security whatsoever.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable)]
#[queryable(entity = "user")]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub profile: Option<Profile>,
    #[serde(default)]
    pub connections: ConnectionBook,
    selected_persona: Persona,
}

impl User {
    /// Creates a fresh user with no profile and no connections.
    pub fn new(username: impl Into<String>, password: Option<String>) -> Self {
        Self {
            username: username.into(),
            password,
            profile: None,
            connections: ConnectionBook::new(),
            selected_persona: Persona::Socialite,
        }
    }

    /// Rebuilds a user from stored parts. A Celebrity persona is reset to the default.
    pub fn from_parts(
        username: String,
        password: Option<String>,
        profile: Option<Profile>,
        connections: ConnectionBook,
        selected_persona: Persona,
    ) -> Self {
        let selected_persona = selected_persona
            .ensure_selectable()
            .unwrap_or_default();
        Self {
            username,
            password,
            profile,
            connections,
            selected_persona,
        }
    }

    pub fn selected_persona(&self) -> Persona {
        self.selected_persona
    }

    /// Changes the presented persona; Celebrity is rejected.
    pub fn select_persona(&mut self, persona: Persona) -> Result<()> {
        self.selected_persona = persona.ensure_selectable()?;
        Ok(())
    }

    /// Whether `password` matches the stored one. Users without a password accept any.
    pub fn password_matches(&self, password: Option<&str>) -> bool {
        match self.password.as_deref() {
            None => true,
            Some(stored) => password == Some(stored),
        }
    }

    /// Summary of the cards collected so far.
    pub fn afterparty(&self) -> Afterparty<'_> {
        let mut by_persona = BTreeMap::new();
        let cards: Vec<&Profile> = self.connections.resolved_profiles().collect();
        for card in &cards {
            *by_persona.entry(card.persona.to_string()).or_insert(0usize) += 1;
        }
        Afterparty {
            cards,
            by_persona,
            pending: self.connections.iter().filter(|c| c.is_loading()).count(),
            failed: self.connections.iter().filter(|c| c.is_failed()).count(),
        }
    }
}

/// Post-event digest of a user's connections.
#[derive(Debug, Clone)]
pub struct Afterparty<'a> {
    /// Resolved cards, newest first.
    pub cards: Vec<&'a Profile>,
    /// Card count per persona name.
    pub by_persona: BTreeMap<String, usize>,
    pub pending: usize,
    pub failed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::{Connection, ConnectionId};
    use chrono::Utc;

    #[test]
    fn test_new_user_defaults() {
        let user = User::new("aiko", Some("pw".into()));
        assert_eq!(user.selected_persona(), Persona::Socialite);
        assert!(user.profile.is_none());
        assert!(user.connections.is_empty());
    }

    #[test]
    fn test_select_persona_rejects_celebrity() {
        let mut user = User::new("aiko", None);
        user.select_persona(Persona::Techie).unwrap();
        assert!(user.select_persona(Persona::Celebrity).is_err());
        assert_eq!(user.selected_persona(), Persona::Techie);
    }

    #[test]
    fn test_from_parts_resets_celebrity() {
        let user = User::from_parts(
            "x".into(),
            None,
            None,
            ConnectionBook::new(),
            Persona::Celebrity,
        );
        assert_eq!(user.selected_persona(), Persona::Socialite);
    }

    #[test]
    fn test_password_matches() {
        let user = User::new("aiko", Some("secret".into()));
        assert!(user.password_matches(Some("secret")));
        assert!(!user.password_matches(Some("nope")));
        assert!(!user.password_matches(None));
        assert!(User::new("open", None).password_matches(Some("anything")));
    }

    #[test]
    fn test_afterparty_counts() {
        let mut user = User::new("aiko", None);
        let now = Utc::now();
        user.connections
            .push_front(Connection::resolved(
                ConnectionId::from("a"),
                Profile::new("Ann", "bio", Persona::Artist),
            ))
            .unwrap();
        user.connections
            .push_front(Connection::resolved(
                ConnectionId::from("b"),
                Profile::new("Ben", "bio", Persona::Artist),
            ))
            .unwrap();
        user.connections
            .push_front(Connection::pending(ConnectionId::from("c"), now))
            .unwrap();
        user.connections
            .push_front(Connection::failed(ConnectionId::from("d"), "nope", now))
            .unwrap();

        let digest = user.afterparty();
        assert_eq!(digest.cards.len(), 2);
        assert_eq!(digest.cards[0].name, "Ben");
        assert_eq!(digest.by_persona.get("Artist"), Some(&2));
        assert_eq!(digest.pending, 1);
        assert_eq!(digest.failed, 1);
    }

    #[test]
    fn test_serde_uses_camel_case() {
        let user = User::new("aiko", None);
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["selectedPersona"], "Socialite");
        assert!(json["connections"].as_array().unwrap().is_empty());
    }
}
