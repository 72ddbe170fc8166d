//! Domain layer for festcard.
//!
//! Holds the persona/profile/connection models, the `User` session record,
//! and the traits the application layer drives: `SessionStore`,
//! `AccountStore` and `ProfileGenerator`.

pub mod config;
pub mod connection;
pub mod error;
pub mod generator;
pub mod persona;
pub mod profile;
pub mod secret;
pub mod user;

// Re-export common types
pub use connection::{Connection, ConnectionBook, ConnectionId};
pub use error::{FestcardError, Result};
pub use generator::ProfileGenerator;
pub use persona::Persona;
pub use profile::{Profile, Socials, Source};
pub use user::{AccountStore, SessionStore, User};
