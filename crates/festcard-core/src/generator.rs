//! Profile generator trait.

use crate::error::Result;
use crate::persona::Persona;
use crate::profile::Profile;

/// An abstract source of AI-generated profiles.
///
/// Decouples the session logic from the concrete backend (Gemini REST API,
/// canned offline profiles, test doubles).
///
/// # Implementation Notes
///
/// - Returned profiles carry no `id`; the caller assigns one.
/// - `generate_persona_profile` must tag the result with the requested persona.
/// - `search_public_profile` returns `Ok(None)` for "not found"; errors are
///   reserved for backend failures.
#[async_trait::async_trait]
pub trait ProfileGenerator: Send + Sync {
    /// Invents a plausible attendee matching `persona`.
    async fn generate_persona_profile(&self, persona: Persona) -> Result<Profile>;

    /// Looks up a public figure by free-text query.
    async fn search_public_profile(&self, query: &str) -> Result<Option<Profile>>;
}
