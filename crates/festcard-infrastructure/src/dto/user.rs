//! User DTOs and migrations

use chrono::Utc;
use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, MigratesTo, Versioned};

use festcard_core::connection::{Connection, ConnectionBook, ConnectionId, INTERRUPTED_REASON};
use festcard_core::{Persona, Profile, User};

/// User record V1.0.0 (legacy flat layout).
///
/// Connections are plain profiles; in-flight taps were stored as profiles
/// with `isLoading` set and a `temp_` id.
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
#[serde(rename_all = "camelCase")]
pub struct UserV1_0_0 {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub profile: Option<Profile>,
    #[serde(default)]
    pub connections: Vec<Profile>,
    #[serde(default)]
    pub selected_persona: Persona,
}

/// User record V1.1.0 (tagged connections).
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.1.0")]
#[serde(rename_all = "camelCase")]
pub struct UserV1_1_0 {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub profile: Option<Profile>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub selected_persona: Persona,
}

/// Type alias for the latest User version.
pub type UserDTO = UserV1_1_0;

// ============================================================================
// Migration implementations
// ============================================================================

/// Migration from UserV1_0_0 to UserV1_1_0.
///
/// Loading placeholders can never settle after a restart, so they become
/// failed slots. Profiles without an id get a positional `legacy_` id.
impl MigratesTo<UserV1_1_0> for UserV1_0_0 {
    fn migrate(self) -> UserV1_1_0 {
        let now = Utc::now();
        let connections = self
            .connections
            .into_iter()
            .enumerate()
            .map(|(index, profile)| {
                let id = profile
                    .id
                    .clone()
                    .map(ConnectionId::new)
                    .unwrap_or_else(|| ConnectionId::new(format!("legacy_{index}")));
                if profile.is_loading {
                    Connection::failed(id, INTERRUPTED_REASON, now)
                } else {
                    Connection::resolved(id, profile)
                }
            })
            .collect();

        UserV1_1_0 {
            username: self.username,
            password: self.password,
            profile: self.profile,
            connections,
            selected_persona: self.selected_persona,
        }
    }
}

// ============================================================================
// Domain model conversions
// ============================================================================

impl IntoDomain<User> for UserV1_1_0 {
    fn into_domain(self) -> User {
        User::from_parts(
            self.username,
            self.password,
            self.profile,
            ConnectionBook::from(self.connections),
            self.selected_persona,
        )
    }
}

impl FromDomain<User> for UserV1_1_0 {
    fn from_domain(user: User) -> Self {
        let selected_persona = user.selected_persona();
        UserV1_1_0 {
            username: user.username,
            password: user.password,
            profile: user.profile,
            connections: user.connections.into(),
            selected_persona,
        }
    }
}

// ============================================================================
// Migrator factory
// ============================================================================

/// Creates and configures a Migrator instance for User entities.
///
/// # Migration Path
///
/// - V1.0.0 → V1.1.0: Flat profile list becomes tagged connections
/// - V1.1.0 → User: Converts DTO to domain model
pub fn create_user_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();

    let user_path = version_migrate::Migrator::define("user")
        .from::<UserV1_0_0>()
        .step::<UserV1_1_0>()
        .into_with_save::<User>();

    migrator
        .register(user_path)
        .expect("Failed to register user migration path");

    migrator
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy_user() -> UserV1_0_0 {
        UserV1_0_0 {
            username: "aiko".into(),
            password: Some("pw".into()),
            profile: None,
            connections: vec![
                Profile {
                    is_loading: true,
                    ..Profile::new("Connecting...", "Receiving profile via NFC tap.", Persona::Socialite)
                }
                .with_id("temp_2"),
                Profile::new("DJ Nova", "Spins on the main stage.", Persona::Celebrity)
                    .with_id("search_1"),
                Profile::new("No Id", "From an old export.", Persona::Artist),
            ],
            selected_persona: Persona::Techie,
        }
    }

    #[test]
    fn test_migrate_converts_placeholders_to_failures() {
        let migrated = legacy_user().migrate();
        assert_eq!(migrated.connections.len(), 3);
        assert!(matches!(
            &migrated.connections[0],
            Connection::Failed { id, reason, .. } if id.as_str() == "temp_2" && reason == INTERRUPTED_REASON
        ));
        assert_eq!(
            migrated.connections[1].profile().unwrap().name,
            "DJ Nova"
        );
        assert_eq!(migrated.connections[2].id().as_str(), "legacy_2");
    }

    #[test]
    fn test_domain_round_trip_keeps_order_and_persona() {
        let user = legacy_user().migrate().into_domain();
        assert_eq!(user.selected_persona(), Persona::Techie);
        let ids: Vec<String> = user.connections.iter().map(|c| c.id().to_string()).collect();
        assert_eq!(ids, vec!["temp_2", "search_1", "legacy_2"]);

        let dto = UserV1_1_0::from_domain(user.clone());
        assert_eq!(dto.into_domain(), user);
    }
}
